//! Adapters to the outside world: the HTTP completion client and the
//! configuration loader.

pub mod config;
pub mod http_completion_client;

pub use http_completion_client::HttpCompletionClient;
