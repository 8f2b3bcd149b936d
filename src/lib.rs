//! # TravelBook
//!
//! Client library and command-line storefront for the TravelBook travel
//! booking API. Customers browse packages, book trips and manage their
//! bookings; administrators maintain the package inventory and move
//! bookings through their lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! CLI commands → Forms (state, validator, array sync) → API client → TravelBook API
//!      ↓                                                    ↓
//! Output / pagination window                         Session + token store
//! ```
//!
//! All persistence and business rules live behind the remote API. This
//! crate holds the form state, client-side validation, request routing and
//! the presentation helpers.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use travelbook::api::{ClientConfig, PackageQuery, TravelBookClient};
//! use travelbook::session::MemoryTokenStore;
//!
//! #[tokio::main]
//! async fn main() -> travelbook::Result<()> {
//!     let client = TravelBookClient::new(ClientConfig::default(), Arc::new(MemoryTokenStore::new()))?;
//!     let list = client.list_packages(&PackageQuery::listing(1)).await?;
//!     println!("{} packages", list.pagination.total_items());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod observability;
pub mod pagination;
pub mod session;
pub mod stats;
pub mod utils;

pub use errors::{Error, Result, TravelBookError};
pub use session::Session;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_available() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "travelbook");
    }
}
