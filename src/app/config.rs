// src/app/config.rs
// Defines configuration structures, constants, loading/saving logic, and initial setup for ModelDeck settings.

use chrono_tz::Tz;
use dotenvy::dotenv;
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::{env, str::FromStr};

// --- Global Configuration Block ---
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "ModelDeck";
pub const DEFAULT_TZ: &str = "UTC";
pub const DEFAULT_LOG_LEVEL: &str = "INFO";
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1:8080";

// --- Configuration Structs ---

/// Runtime configuration derived from AppSettings.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub tz: Tz,
}

/// Configuration loaded initially from environment/.env for logger setup and defaults.
#[derive(Clone, Debug)]
pub struct InitialConfig {
    pub server_host: String,
    pub log_level: LevelFilter,
    pub tz: Tz,
}

/// Persistently stored application settings using confy.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub server_host: String,
    pub log_level: String,
    pub tz: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        let initial_config = load_initial_config();
        AppSettings {
            server_host: initial_config.server_host,
            log_level: initial_config.log_level.to_string(),
            tz: initial_config.tz.name().to_string(),
        }
    }
}

// --- Configuration Loading Functions ---

/// Loads the *initial* configuration settings.
/// Priority: Environment Variables > .env file > Hardcoded Defaults.
/// This is primarily used for setting up the logger and providing defaults
/// before the main persistent settings (`AppSettings`) are loaded by `confy`.
pub fn load_initial_config() -> InitialConfig {
    dotenv().ok();

    // Load Timezone (TZ)
    let tz_str = env::var("TZ").unwrap_or_else(|_| DEFAULT_TZ.to_string());
    let tz = Tz::from_str(&tz_str).unwrap_or_else(|err| {
        // Use eprintln for early logging before the logger is initialized
        eprintln!(
            "WARN: Invalid TZ '{}' from env/default. Falling back to UTC. Error: {}",
            tz_str, err
        );
        Tz::UTC
    });

    // Load Log Level (LOG_LEVEL)
    let log_level_str = env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let log_level = LevelFilter::from_str(&log_level_str).unwrap_or_else(|err| {
        eprintln!(
            "WARN: Invalid LOG_LEVEL '{}' from env/default. Falling back to {}. Error: {}",
            log_level_str, DEFAULT_LOG_LEVEL, err
        );
        LevelFilter::from_str(DEFAULT_LOG_LEVEL).expect("Default log level is invalid")
    });

    // Load the annotation server host (MODELDECK_HOST)
    let server_host = env::var("MODELDECK_HOST").unwrap_or_else(|_| {
        warn!(
            "MODELDECK_HOST environment variable not set, using default: {}",
            DEFAULT_SERVER_HOST
        );
        DEFAULT_SERVER_HOST.to_string()
    });

    InitialConfig {
        server_host,
        log_level,
        tz,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_deserialize_with_missing_fields_uses_defaults() {
        // Config files written by older versions may lack fields; serde(default) must cover them.
        let settings: AppSettings = serde_json::from_str(r#"{ "tz": "Europe/Vienna" }"#).unwrap();
        assert_eq!(settings.tz, "Europe/Vienna");
        assert_eq!(settings.log_level, AppSettings::default().log_level);
    }

    #[test]
    fn default_log_level_parses() {
        assert!(LevelFilter::from_str(DEFAULT_LOG_LEVEL).is_ok());
    }
}
