//! GeoJSON rendering of an assessed route.

use floodroute_core::models::{PathGeometry, Sample};
use geo::BoundingRect;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, Value as JsonValue};

/// Build a FeatureCollection with the route line followed by one point per sample
///
/// Sample properties mirror what a map would style markers by: `has_water`,
/// `rain_mm` and `checked` (false when either check fell back to a default).
pub fn route_feature_collection(path: &PathGeometry, samples: &[Sample]) -> FeatureCollection {
    let mut features = Vec::with_capacity(samples.len() + 1);

    if !path.is_empty() {
        let line: Vec<Vec<f64>> = path.vertices().iter().map(|c| c.to_lon_lat().to_vec()).collect();

        let mut properties = Map::new();
        properties.insert("kind".to_string(), JsonValue::from("route"));
        properties.insert("vertices".to_string(), JsonValue::from(path.len()));
        properties.insert(
            "length_m".to_string(),
            JsonValue::from(crate::distance::path_length_m(path).round()),
        );

        features.push(Feature {
            geometry: Some(Geometry::new(Value::LineString(line))),
            properties: Some(properties),
            id: None,
            bbox: None,
            foreign_members: None,
        });
    }

    for (index, sample) in samples.iter().enumerate() {
        let mut properties = Map::new();
        properties.insert("kind".to_string(), JsonValue::from("sample"));
        properties.insert("index".to_string(), JsonValue::from(index));
        properties.insert(
            "has_water".to_string(),
            sample.water.map(|w| JsonValue::from(w.value)).unwrap_or(JsonValue::Null),
        );
        properties.insert(
            "rain_mm".to_string(),
            sample.rain_mm.map(|r| JsonValue::from(r.value)).unwrap_or(JsonValue::Null),
        );
        properties.insert("checked".to_string(), JsonValue::from(sample.fully_checked()));

        features.push(Feature {
            geometry: Some(Geometry::new(Value::Point(sample.coordinate.to_lon_lat().to_vec()))),
            properties: Some(properties),
            id: None,
            bbox: None,
            foreign_members: None,
        });
    }

    let bbox = path
        .to_line_string()
        .bounding_rect()
        .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

    FeatureCollection { features, bbox, foreign_members: None }
}
