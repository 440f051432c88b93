//! Storefront core library.
//!
//! This library holds the client-side contract with the storefront backend: resource
//! addressing, payment bounds and the wallet/vending lifecycles. It performs no I/O.
//!
//! - [`config`]: explicitly constructed origins and flags.
//! - [`address`]: the [`Resource`](address::Resource) enum and its addresses.
//! - [`contract`]: transaction and vending state machines.
//! - [`types`]: catalog records, payment amounts and currencies.
//! - [`fetcher`]: the seam between collection fetching and caching.

pub mod address;
pub mod config;
pub mod contract;
pub mod errors;
pub mod fetcher;
pub mod types;
