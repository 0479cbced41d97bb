//! OpenSearch implementation of the search backend.
//!
//! This module provides a concrete implementation of the backend interfaces
//! using OpenSearch (and Elasticsearch 7, which shares the REST surface), plus
//! the request bodies and response mapping for that wire format.

mod client;
pub mod index_config;
pub mod queries;
pub mod responses;

pub use client::OpenSearchClient;
pub use queries::{
    build_count_body, build_query, build_search_request, build_upsert_body, document_id,
    MODEL_FIELD,
};
pub use responses::{map_count_response, map_get_response, map_search_response};
