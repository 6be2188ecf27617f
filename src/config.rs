use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::error::ScivaultError;

pub const DEFAULT_GRAPHQL_URL: &str = "https://uploader.irys.xyz/graphql";
pub const DEFAULT_GATEWAY_URL: &str = "https://gateway.irys.xyz";
pub const DEFAULT_CHUNK_DIR: &str = "split_files";
pub const DEFAULT_CHUNK_COUNT: u32 = 122;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub graphql_url: Option<String>,
    #[serde(default)]
    pub gateway_url: Option<String>,
    #[serde(default)]
    pub chunk_dir: Option<String>,
    #[serde(default)]
    pub chunk_count: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub graphql_url: String,
    pub gateway_url: String,
    pub chunk_dir: Utf8PathBuf,
    pub chunk_count: u32,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, ScivaultError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from("scivault.json"),
        };

        if path.is_none() && !config_path.exists() {
            return Ok(Self::resolve_config(Config::default()));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| ScivaultError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| ScivaultError::ConfigParse(err.to_string()))?;

        Ok(Self::resolve_config(config))
    }

    pub fn resolve_config(config: Config) -> ResolvedConfig {
        ResolvedConfig {
            graphql_url: config
                .graphql_url
                .unwrap_or_else(|| DEFAULT_GRAPHQL_URL.to_string()),
            gateway_url: config
                .gateway_url
                .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string()),
            chunk_dir: Utf8PathBuf::from(
                config
                    .chunk_dir
                    .unwrap_or_else(|| DEFAULT_CHUNK_DIR.to_string()),
            ),
            chunk_count: config.chunk_count.unwrap_or(DEFAULT_CHUNK_COUNT),
        }
    }
}

pub fn wallet_key_from_env() -> Result<String, ScivaultError> {
    for name in ["SCIVAULT_PRIVATE_KEY", "PRIVATE_KEY"] {
        if let Ok(value) = std::env::var(name) {
            if !value.trim().is_empty() {
                return Ok(value.trim().to_string());
            }
        }
    }
    Err(ScivaultError::MissingPrivateKey)
}
