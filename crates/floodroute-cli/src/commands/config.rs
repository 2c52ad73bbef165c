use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tabled::Tabled;

#[derive(Tabled)]
struct ConfigRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Source")]
    source: String,
}

#[derive(Serialize)]
struct ConfigEntry {
    value: String,
    source: String,
}

pub fn execute(config_path: Option<&Path>, output: &OutputWriter) -> Result<()> {
    let config = load_config(config_path)?;

    // Sorted for stable output
    let entries: BTreeMap<String, ConfigEntry> = config
        .to_inspection_map()
        .into_iter()
        .map(|(key, (value, source))| {
            (key, ConfigEntry { value, source: format!("{:?}", source) })
        })
        .collect();

    if output.is_json() {
        return output.result(&entries);
    }

    output.section("Configuration");
    output.table(
        entries
            .into_iter()
            .map(|(key, entry)| ConfigRow { key, value: entry.value, source: entry.source })
            .collect(),
    );

    if let Err(e) = config.validate() {
        output.warning(format!("Configuration is not valid: {}", e));
    }

    Ok(())
}
