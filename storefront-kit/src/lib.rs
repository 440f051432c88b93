//! # Storefront Kit
//!
//! Storefront Kit is the client-side contract layer for an app-catalog storefront backend:
//! typed resource addresses, HTTP clients for the catalog, wallet and vending APIs, and
//! stale-while-revalidate page data.
//!
//! ## Related Crates
//!
//! - **`storefront-core`**: addresses, amounts and lifecycle state machines. No I/O.
//! - **`storefront-regen`**: the regeneration cache, re-exported here as [`regen`] with the
//!   `regen` feature.
//!
//! ## Core Components Overview
//!
//! ### Contract
//!
//! - **[`address`]**: The [`Resource`](address::Resource) enum and the addresses it resolves to.
//! - **[`config`]**: [`StorefrontConfig`](config::StorefrontConfig), built explicitly or from the environment.
//! - **[`contract`]**: Transaction and vending lifecycles.
//! - **[`types`]**: Catalog records, [`PaymentAmount`](types::PaymentAmount) and [`Currency`](types::Currency).
//!
//! ### Clients (feature `client`)
//!
//! - **[`transport`]**: The shared `reqwest` transport.
//! - **[`catalog_client`]**: Collections, app metadata, auth and purchases.
//! - **[`wallet_client`]**: Wallet reads and the payment transaction flow.
//! - **[`vending_client`]**: Vending accounts, revenue splits and tokens.
//!
//! ## Building Addresses
//!
//! Addresses never depend on ambient state. The same resource and configuration always
//! yield the same address, and path segments are percent-encoded:
//!
//! ```
//! use storefront_kit::{address::Resource, config::StorefrontConfig};
//! use url_macro::url;
//!
//! let config = StorefrontConfig::builder()
//!     .api_base(url!("https://backend.example.com"))
//!     .site_base(url!("https://store.example.com"))
//!     .build();
//!
//! let address = Resource::Developer("Jane Doe/Apps").address(&config).unwrap();
//! assert_eq!(address.as_str(), "https://backend.example.com/developer/Jane%20Doe%2FApps");
//! ```
//!
//! ## Regenerated Pages
//!
//! ```no_run
//! use storefront_kit::{
//!     catalog_client::RemoteCatalogClient,
//!     config::StorefrontConfig,
//!     regen::{cache::RegenCache, page::{CollectionLoader, CollectionPage}},
//!     types::Collection,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RemoteCatalogClient::new(StorefrontConfig::from_env()?)?;
//! let cache = RegenCache::new(CollectionLoader(client));
//!
//! let page = CollectionPage::builder()
//!     .collection(Collection::Popular)
//!     .cache(cache)
//!     .build();
//!
//! let props = page.props("en").await?;
//! # Ok(())
//! # }
//! ```

pub mod address {
    pub use storefront_core::address::*;
}

pub mod config {
    pub use storefront_core::config::*;
}

pub mod contract {
    pub use storefront_core::contract::*;
}

pub mod types {
    pub use storefront_core::types::*;
}

pub mod fetcher {
    pub use storefront_core::fetcher::*;
}

#[cfg(feature = "client")]
pub mod errors;

#[cfg(feature = "client")]
pub mod transport;

#[cfg(feature = "client")]
pub mod catalog_client;

#[cfg(feature = "client")]
pub mod wallet_client;

#[cfg(feature = "client")]
pub mod vending_client;

#[cfg(feature = "regen")]
pub mod regen {
    pub use storefront_regen::*;
}
