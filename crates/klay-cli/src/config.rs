//! CLI configuration management

use std::path::{Path, PathBuf};

use klay_gateway::GatewayConfig;

use crate::CliError;

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".klay"))
}

/// Get the default config file path
pub fn default_config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Load the gateway configuration.
///
/// An explicit path must exist. The default path is optional; defaults are
/// used when it is missing.
pub fn load(explicit: Option<&Path>) -> Result<GatewayConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(GatewayConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))?;
    GatewayConfig::from_toml_str(&content)
        .map_err(|e| CliError::Config(format!("{}: {}", path.display(), e)))
}
