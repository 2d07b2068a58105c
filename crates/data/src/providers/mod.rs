//! Index client implementations.

pub mod http;
pub mod mock;

pub use http::HttpIndexClient;
pub use mock::MockIndexClient;
