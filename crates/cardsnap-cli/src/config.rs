use cardsnap_core::CardConfig;
use std::error::Error;
use std::fs;

const BASE_CONFIG: &str = include_str!("../configurations/base.json");
const SQUARE_CONFIG: &str = include_str!("../configurations/square.json");

pub(crate) fn load_config(config_arg: Option<&str>) -> Result<CardConfig, Box<dyn Error>> {
    let name = config_arg.unwrap_or("default");
    let config = match name {
        "default" | "base" => serde_json::from_str(BASE_CONFIG)?,
        "square" => serde_json::from_str(SQUARE_CONFIG)?,
        _ => {
            let contents = fs::read_to_string(name)
                .map_err(|err| format!("unable to read config {name}: {err}"))?;
            serde_json::from_str(&contents)
                .map_err(|err| format!("invalid config {name}: {err}"))?
        }
    };
    Ok(config)
}
