use config::{Config, File, FileFormat};
use dotenv::dotenv;
use eyre::{eyre, Result};
use serde::{de::DeserializeOwned, Deserialize};

use crate::indexer::DEFAULT_SOURCE;

fn config_from_env() -> Result<AppConfig> {
    dotenv().ok();

    let settings = Config::builder()
        .add_source(File::with_name("config.yaml").required(false))
        .add_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize().map_err(eyre::Error::from)
}

pub trait LoadFromEnv: Sized + DeserializeOwned {
    fn from_env() -> Result<Self>;
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub indexer: Option<IndexerConfig>,
}

impl AppConfig {
    /// Parses a YAML document with the same shape as `config.yaml`.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        Config::builder()
            .add_source(File::from_str(raw, FileFormat::Yaml))
            .build()?
            .try_deserialize()
            .map_err(eyre::Error::from)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EthConfig {
    pub ws_url: String,
    pub contract_address: String,
    /// Logical role of the contract, used as the checkpoint key prefix.
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub start_block: u64,
    #[serde(default)]
    pub confirmations: u64,
    /// Scheduler period in whole seconds.
    #[serde(default)]
    pub interval: u64,
}

fn default_source() -> String {
    DEFAULT_SOURCE.to_string()
}

#[derive(Deserialize, Debug, Clone)]
pub struct IndexerConfig {
    pub database: DatabaseConfig,
    pub eth: EthConfig,
}

impl LoadFromEnv for IndexerConfig {
    fn from_env() -> Result<Self> {
        config_from_env()?
            .indexer
            .ok_or_else(|| eyre!("Configuration for the 'indexer' service is missing."))
    }
}
