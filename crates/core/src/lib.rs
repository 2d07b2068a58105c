//! Pinecone Client Core Library
//!
//! This crate provides the foundational utilities shared by the Pinecone
//! client crates:
//! - Error handling (`PineconeError`, `PineconeResult`)
//! - Logging infrastructure
//! - Client configuration management

pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{PineconeError, PineconeResult};
