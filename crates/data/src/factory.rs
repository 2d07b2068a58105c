//! Index client factory.
//!
//! Builds the network client described by a [`ClientConfig`], checking
//! that the required settings are present first.

use crate::client::IndexClient;
use crate::providers::HttpIndexClient;
use pinecone_core::{ClientConfig, PineconeError, PineconeResult};
use std::sync::Arc;

/// Create an index client from configuration.
///
/// # Errors
/// Returns [`PineconeError::Config`] if the API key or host is missing or
/// `pool_threads` is zero.
pub fn create_client(config: &ClientConfig) -> PineconeResult<Arc<dyn IndexClient>> {
    config.validate()?;

    let api_key = config
        .api_key
        .as_deref()
        .ok_or_else(|| PineconeError::Config("API key is required".to_string()))?;

    tracing::debug!(host = %config.host, api_version = %config.api_version, "Creating index client");

    let client = HttpIndexClient::with_api_version(&config.host, api_key, &config.api_version);
    Ok(Arc::new(client))
}
