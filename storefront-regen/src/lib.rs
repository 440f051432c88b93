//! # Storefront Regen
//!
//! Stale-while-revalidate data for statically regenerated storefront pages.
//!
//! [`RegenCache`](cache::RegenCache) serves the last loaded value for a key and, once the
//! revalidation window has passed, refreshes it in the background. At most one refresh per
//! key is in flight at any time, and concurrent cold requests share a single load.
//!
//! ## Quick Start
//!
//! ```no_run
//! use storefront_core::{fetcher::CollectionFetcher, types::Collection};
//! use storefront_regen::{
//!     cache::RegenCache,
//!     page::{CollectionLoader, CollectionPage},
//! };
//!
//! # async fn page<F: CollectionFetcher + 'static>(fetcher: F) -> Result<(), F::Error> {
//! let cache = RegenCache::new(CollectionLoader(fetcher));
//!
//! let page = CollectionPage::builder()
//!     .collection(Collection::RecentlyUpdated)
//!     .cache(cache.clone())
//!     .build();
//!
//! let props = page.props("en").await?;
//! println!("{} apps", props.applications.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`cache`]: The generic [`RegenCache`](cache::RegenCache) and its [`Loader`](cache::Loader) trait.
//! - [`page`]: Collection page props built on top of the cache.
//!
//! ## Failure Handling
//!
//! Only a failed load of a key with no cached value is returned to the caller. A failed
//! background refresh keeps the old value, is logged (with the `tracing` feature) and counted
//! in [`CacheStats`](cache::CacheStats); the next attempt happens one window later.

pub mod cache;
pub mod page;
