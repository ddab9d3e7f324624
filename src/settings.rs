use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "./chain-console.toml";
const ENV_PREFIX: &str = "CHAIN_CONSOLE";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    /// Backend API root, e.g. `http://localhost:5001/console/api`
    pub base_url: String,
    /// Bearer token for the console API
    #[serde(default)]
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    pub block_page_size: u32,
    /// Offset used to bucket block timestamps into calendar days
    pub utc_offset_minutes: i32,
    pub host: String,
    pub port: u16,
}

impl Settings {
    /// Layered load: defaults, then the settings file, then `CHAIN_CONSOLE_*`
    /// environment variables.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("base_url", "http://localhost:5001/console/api")?
            .set_default("timeout_secs", 30)?
            .set_default("block_page_size", 10)?
            .set_default("utc_offset_minutes", 0)?
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8090)?;

        let builder = match path {
            Some(path) => builder.add_source(config::File::with_name(path).required(true)),
            None => builder.add_source(config::File::with_name(DEFAULT_CONFIG_PATH).required(false)),
        };

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()
    }

    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001/console/api".to_string(),
            api_token: None,
            timeout_secs: 30,
            block_page_size: 10,
            utc_offset_minutes: 0,
            host: "0.0.0.0".to_string(),
            port: 8090,
        }
    }
}
