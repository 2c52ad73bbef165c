//! FloodRoute Providers - HTTP adapters for the core ports
//!
//! Each adapter wraps one public service:
//! Nominatim (geocoding), OSRM (routing), Overpass (water features) and
//! Open-Meteo (hourly precipitation).

pub mod http;
pub mod nominatim;
pub mod open_meteo;
pub mod osrm;
pub mod overpass;

pub use http::{build_client, Providers};
pub use nominatim::NominatimGeocoder;
pub use open_meteo::OpenMeteoPrecipitation;
pub use osrm::OsrmRouter;
pub use overpass::OverpassWaterSource;
