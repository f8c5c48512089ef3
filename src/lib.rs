//! Lite client for the DirectAdmin control panel Web API.
//!
//! ```no_run
//! use directadmin::{Api, ConnectionConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConnectionConfig::new("admin", "secret")
//!         .hostname("panel.example.com")
//!         .https(true);
//!     let api = Api::new(config)?;
//!
//!     let users = api.execute("CMD_API_SHOW_USERS", None, None).await?;
//!     println!("{:?}", users.as_list());
//!
//!     api.execute(
//!         "CMD_API_SELECT_USERS",
//!         Some(&[("location", "CMD_SELECT_USERS"), ("suspend", "Suspend"), ("select0", "bob")][..]),
//!         None,
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod connectors;
pub mod error;
pub mod utils;

pub use api::Api;
pub use config::ConnectionConfig;
pub use connectors::{ApiConnector, ApiResponse, HtmlErrorRule};
pub use error::{ApiError, Result};

// Crate version exposed for runtime queries
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
