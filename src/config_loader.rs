// Configuration file loader for the transcription intake service
//
// Seeds unset environment variables from an optional flat TOML file, so a
// deployment can ship one config file instead of exporting variables.
// Environment variables that are already set always win.

use std::env;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use toml::Value;

const CONFIG_FILE_PATH: &str = "transcription_intake.conf";

/// Loads configuration from the TOML file into the environment
///
/// Precedence (highest to lowest):
/// 1. Environment variables already set
/// 2. Configuration file values
/// 3. Application defaults (handled in config)
///
/// # Returns
///
/// Returns true if the config file was successfully loaded, false otherwise
pub fn load_config() -> bool {
    let config_path = Path::new(CONFIG_FILE_PATH);

    if !config_path.exists() {
        debug!("Configuration file not found at: {}", CONFIG_FILE_PATH);
        return false;
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read configuration file: {}", e);
            return false;
        }
    };

    let table: toml::Table = match content.parse() {
        Ok(table) => table,
        Err(e) => {
            warn!("Failed to parse configuration file: {}", e);
            return false;
        }
    };

    // The file is expected to be flat key = value pairs
    for (key, value) in table {
        let rendered = match value {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(b) => b.to_string(),
            _ => {
                warn!("Skipping unsupported TOML value type for key: {}", key);
                continue;
            }
        };

        if env::var(&key).is_err() {
            debug!("Setting env var from config file: {} = {}", key, rendered);
            env::set_var(key, rendered);
        } else {
            debug!("Env var already exists, skipping: {}", key);
        }
    }

    info!("Configuration loaded from {}", CONFIG_FILE_PATH);
    true
}
