use std::fs;
use std::path::Path;

use dialectics_kernel::config::SimulationConfig;

#[derive(Debug)]
pub enum ConfigError {
    UnknownExtension,
    Read(std::io::Error),
    Toml(toml::de::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::UnknownExtension => {
                write!(f, "configuration file must end in .toml or .json")
            }
            ConfigError::Read(e) => write!(f, "could not read configuration file: {e}"),
            ConfigError::Toml(e) => write!(f, "invalid TOML configuration: {e}"),
            ConfigError::Json(e) => write!(f, "invalid JSON configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a [SimulationConfig] from `path`, dispatching on its extension.
pub fn load_simulation_config(path: &Path) -> Result<SimulationConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Read)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&contents).map_err(ConfigError::Toml),
        Some("json") => serde_json::from_str(&contents).map_err(ConfigError::Json),
        _ => Err(ConfigError::UnknownExtension),
    }
}
