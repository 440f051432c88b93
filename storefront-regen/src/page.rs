//! Page data for statically regenerated collection pages.
//!
//! A [`CollectionPage`] resolves its app list through a shared [`RegenCache`], so many
//! pages (and many requests for the same page) share one backend fetch per window.

use std::{sync::Arc, time::Duration};

use bon::Builder;
use serde::{Serialize, Serializer};
use storefront_core::{
    fetcher::CollectionFetcher,
    types::{APPS_IN_PREVIEW_COUNT, AppListItem, Collection},
};

use crate::cache::{Loader, RegenCache};

/// Adapts a [`CollectionFetcher`] into a cache [`Loader`] keyed by [`Collection`].
#[derive(Debug, Clone)]
pub struct CollectionLoader<F>(pub F);

impl<F> Loader for CollectionLoader<F>
where
    F: CollectionFetcher + 'static,
{
    type Key = Collection;
    type Value = Vec<AppListItem>;
    type Error = F::Error;

    async fn load(&self, key: &Collection) -> Result<Vec<AppListItem>, F::Error> {
        self.0.fetch_collection(key).await
    }
}

/// Cache of collection app lists.
pub type CollectionCache<F> = RegenCache<CollectionLoader<F>>;

/// Translation namespaces a page needs for one locale. Loading them is up to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationBundle {
    pub locale: String,
    pub namespaces: Vec<String>,
}

/// Props handed to the page renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProps<T> {
    pub translations: TranslationBundle,
    pub applications: Arc<T>,
    /// The cache's revalidation window, serialized as whole seconds.
    #[serde(serialize_with = "serialize_secs")]
    pub revalidate: Duration,
}

impl PageProps<Vec<AppListItem>> {
    /// The first apps of the list, as shown in a collection preview row.
    pub fn preview(&self) -> &[AppListItem] {
        let end = self.applications.len().min(APPS_IN_PREVIEW_COUNT);
        &self.applications[..end]
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_secs())
}

/// A page listing one [`Collection`].
#[derive(Builder)]
pub struct CollectionPage<F: CollectionFetcher + 'static> {
    pub collection: Collection,
    pub cache: CollectionCache<F>,
    #[builder(default = vec!["common".to_string()])]
    pub namespaces: Vec<String>,
}

impl<F: CollectionFetcher + 'static> CollectionPage<F> {
    /// Resolve the page props for `locale`.
    ///
    /// Serves cached data whenever some exists, even if stale. Only a failed load of a
    /// cold collection is returned as an error.
    pub async fn props(&self, locale: &str) -> Result<PageProps<Vec<AppListItem>>, F::Error> {
        let applications = self.cache.get(&self.collection).await?;

        Ok(PageProps {
            translations: TranslationBundle {
                locale: locale.to_string(),
                namespaces: self.namespaces.clone(),
            },
            applications,
            revalidate: self.cache.window(),
        })
    }
}
