use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub database: DatabaseConfig,
    pub provider: ProviderSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendMode {
    Local,
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub mode: BackendMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Populate demo flights (and one sample booking) at startup.
    #[serde(default)]
    pub seed: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file (optional)
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `FARELINK__PROVIDER__CLIENT_ID=...` sets provider.client_id
            .add_source(config::Environment::with_prefix("FARELINK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
