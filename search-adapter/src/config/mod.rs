//! Configuration loading for the search adapter.
//!
//! The adapter configuration comes from a JSON file when one is given,
//! otherwise from environment variables (after `.env` has been loaded).

mod dependencies;

pub use dependencies::Dependencies;

use std::env;
use std::fs;
use std::path::Path;

use search_adapter_repository::config::DEFAULT_HOST;
use search_adapter_repository::{AdapterConfig, IndexSettings};

use crate::AppError;

/// Backend URL variable.
pub const ELASTICSEARCH_URL: &str = "ELASTICSEARCH_URL";

/// Index name variable.
pub const SEARCH_INDEX: &str = "SEARCH_INDEX";

/// Primary shard count variable.
pub const SEARCH_SHARDS: &str = "SEARCH_SHARDS";

/// Replica count variable.
pub const SEARCH_REPLICAS: &str = "SEARCH_REPLICAS";

/// Log level variable.
pub const SEARCH_LOG: &str = "SEARCH_LOG";

/// Load the adapter configuration.
///
/// # Arguments
///
/// * `path` - Optional JSON config file; environment variables are used without one
///
/// # Returns
///
/// * `Ok(AdapterConfig)` - The loaded configuration
/// * `Err(AppError)` - If the file cannot be read or a value is invalid
pub fn load_config(path: Option<&Path>) -> Result<AdapterConfig, AppError> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path)?;
            config_from_json(&contents)
        }
        None => config_from_vars(|key| env::var(key).ok()),
    }
}

/// Parse a JSON configuration document.
pub fn config_from_json(contents: &str) -> Result<AdapterConfig, AppError> {
    serde_json::from_str(contents)
        .map_err(|e| AppError::config(format!("Invalid config file: {}", e)))
}

/// Build the configuration from variables resolved through `lookup`.
pub fn config_from_vars<F>(lookup: F) -> Result<AdapterConfig, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    let host = lookup(ELASTICSEARCH_URL).unwrap_or_else(|| DEFAULT_HOST.to_string());
    let index = lookup(SEARCH_INDEX)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| AppError::config(format!("{} must be set", SEARCH_INDEX)))?;

    let mut settings = IndexSettings::new(index);
    if let Some(shards) = parse_count(&lookup, SEARCH_SHARDS)? {
        settings = settings.with_shards(shards);
    }
    if let Some(replicas) = parse_count(&lookup, SEARCH_REPLICAS)? {
        settings = settings.with_replicas(replicas);
    }

    let mut config = AdapterConfig::new(host, settings);
    config.log = lookup(SEARCH_LOG);
    Ok(config)
}

fn parse_count<F>(lookup: &F, key: &str) -> Result<Option<u32>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| AppError::config(format!("{} must be a number, got {:?}", key, raw)))
        })
        .transpose()
}
