//! Configuration types for the SearchAdapter.
//!
//! The recognized options mirror what an ORM adapter configuration carries:
//! `{host, log, index, number_of_shards, number_of_replicas, analysis,
//! mappings}`, plus a few client-side knobs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default backend URL.
pub const DEFAULT_HOST: &str = "http://localhost:9200";

/// Default number of primary shards for a newly created index.
pub const DEFAULT_SHARDS: u32 = 2;

/// Default number of replicas for a newly created index.
pub const DEFAULT_REPLICAS: u32 = 1;

/// Configuration for the SearchAdapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Backend URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Log level for the embedding application (e.g. "debug").
    #[serde(default)]
    pub log: Option<String>,
    /// The single index all collections live in.
    #[serde(flatten)]
    pub index: IndexSettings,
    /// Annotate search hits with `_score`.
    #[serde(default = "default_include_score")]
    pub include_score: bool,
    /// Transport-level request timeout. None leaves the client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl AdapterConfig {
    /// Create a config for the given host and index with defaults elsewhere.
    pub fn new(host: impl Into<String>, index: IndexSettings) -> Self {
        Self {
            host: host.into(),
            log: None,
            index,
            include_score: true,
            request_timeout_secs: None,
        }
    }

    /// Disable `_score` annotation on search results.
    pub fn without_scores(mut self) -> Self {
        self.include_score = false;
        self
    }
}

/// Settings and mappings of the target index.
///
/// The name is fixed for the adapter's lifetime. Analysis and mappings are
/// re-applied on every startup when the index already exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Index name.
    #[serde(rename = "index")]
    pub name: String,
    #[serde(default = "default_shards")]
    pub number_of_shards: u32,
    #[serde(default = "default_replicas")]
    pub number_of_replicas: u32,
    /// Analysis settings (analyzers, tokenizers, filters).
    #[serde(default)]
    pub analysis: Option<Value>,
    /// Mapping definition per type name, in application order.
    #[serde(default)]
    pub mappings: Map<String, Value>,
}

impl IndexSettings {
    /// Create settings for the named index with default shards and replicas.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number_of_shards: DEFAULT_SHARDS,
            number_of_replicas: DEFAULT_REPLICAS,
            analysis: None,
            mappings: Map::new(),
        }
    }

    pub fn with_shards(mut self, shards: u32) -> Self {
        self.number_of_shards = shards;
        self
    }

    pub fn with_replicas(mut self, replicas: u32) -> Self {
        self.number_of_replicas = replicas;
        self
    }

    pub fn with_analysis(mut self, analysis: Value) -> Self {
        self.analysis = Some(analysis);
        self
    }

    /// Add the mapping definition of one type.
    pub fn with_mapping(mut self, type_name: impl Into<String>, mapping: Value) -> Self {
        self.mappings.insert(type_name.into(), mapping);
        self
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_shards() -> u32 {
    DEFAULT_SHARDS
}

fn default_replicas() -> u32 {
    DEFAULT_REPLICAS
}

fn default_include_score() -> bool {
    true
}
