//! Command handlers for the Pinecone CLI.
//!
//! This module organizes all CLI commands into separate submodules.

pub mod query;
pub mod query_namespaces;

// Re-export command types for convenience
pub use query::QueryCommand;
pub use query_namespaces::QueryNamespacesCommand;
