use std::path::PathBuf;

use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Identity provider realm (authorization, login-actions and token
    /// endpoints live under it).
    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    /// Profile gateway used as the token validity probe.
    #[serde(default = "default_profile_url")]
    pub profile_url: String,

    /// Commerce backend for catalog, basket and order calls.
    #[serde(default = "default_commerce_url")]
    pub commerce_url: String,

    /// Override for the persisted token file location.
    #[serde(default)]
    pub token_path: Option<PathBuf>,
}

fn default_identity_url() -> String {
    "https://id.x5.ru/auth/realms/ssox5id".to_string()
}

fn default_profile_url() -> String {
    "https://gw-el5.x5.ru/api".to_string()
}

fn default_commerce_url() -> String {
    "https://5d.5ka.ru/api".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            identity_url: default_identity_url(),
            profile_url: default_profile_url(),
            commerce_url: default_commerce_url(),
            token_path: None,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("FIVEY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let settings = Config::builder()
            .add_source(File::with_name(&config_path).required(false))
            .add_source(config::Environment::with_prefix("FIVEY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("identity_url", &self.identity_url),
            ("profile_url", &self.profile_url),
            ("commerce_url", &self.commerce_url),
        ] {
            if value.is_empty() {
                return Err(format!("{name} is required"));
            }
            if !value.starts_with("http") {
                return Err(format!("{name} must be a valid HTTP(S) URL"));
            }
        }
        Ok(())
    }
}
