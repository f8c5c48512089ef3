//! Connectors for external services
//!
//! API clients for the DirectAdmin panel and the decoding of its
//! URL-encoded responses.

pub mod directadmin;
pub mod response;

pub use directadmin::ApiConnector;
pub use response::{ApiResponse, HtmlErrorRule, ResponseDecoder};
