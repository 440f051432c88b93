//! Collection fetcher interface.
//!
//! The remote HTTP client lives in `storefront-kit`; the regeneration cache in
//! `storefront-regen` only depends on this trait.

use crate::types::{AppListItem, Collection};

/// Fetches the app list backing a [`Collection`].
///
/// Implementations perform exactly one attempt per call. Retrying is left to the
/// caller (in practice, the next revalidation window of the regeneration cache).
pub trait CollectionFetcher: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_collection(
        &self,
        collection: &Collection,
    ) -> impl Future<Output = Result<Vec<AppListItem>, Self::Error>> + Send;
}
