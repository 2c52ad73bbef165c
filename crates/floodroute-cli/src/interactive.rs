use anyhow::Result;
use dialoguer::{Input, Select};
use floodroute_core::models::{Coordinate, LocationInput};

/// Prompt for one route endpoint, either as an address or a pinned coordinate
pub fn prompt_location(label: &str) -> Result<LocationInput> {
    let kinds = vec!["Address - search by name", "Pin - enter latitude,longitude"];
    let kind = Select::new()
        .with_prompt(format!("{} location", label))
        .items(&kinds)
        .default(0)
        .interact()?;

    let location = if kind == 0 {
        let text: String = Input::new()
            .with_prompt(format!("{} address", label))
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("Address cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?;
        LocationInput::Address(text.trim().to_string())
    } else {
        let pin: String = Input::new()
            .with_prompt(format!("{} coordinate (lat,lon)", label))
            .validate_with(|input: &String| {
                input.parse::<Coordinate>().map(|_| ()).map_err(|e| e.to_string())
            })
            .interact_text()?;
        LocationInput::Pinned(pin.parse()?)
    };

    Ok(location)
}

/// Use what was given on the command line, prompting only for what is missing
pub fn complete_endpoints(
    origin: Option<LocationInput>,
    destination: Option<LocationInput>,
) -> Result<(LocationInput, LocationInput)> {
    eprintln!("\n🌧  FloodRoute Assessment\n");

    let origin = match origin {
        Some(origin) => origin,
        None => prompt_location("Origin")?,
    };
    let destination = match destination {
        Some(destination) => destination,
        None => prompt_location("Destination")?,
    };

    Ok((origin, destination))
}
