use http::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use storefront_core::{
    address::{Resource, StatsWindow},
    config::StorefrontConfig,
    fetcher::CollectionFetcher,
    types::{AnyJson, AppListItem, Category, Collection, Picks},
};

use crate::{errors::FetchError, transport::Transport};

/// A remote catalog client that reads collections and app metadata over HTTP.
///
/// Implements [`CollectionFetcher`], so it can back a regeneration cache directly.
#[derive(Debug, Clone)]
pub struct RemoteCatalogClient {
    pub transport: Transport,
}

/// A login provider offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginProvider {
    pub method: String,
    pub name: String,
}

impl RemoteCatalogClient {
    pub fn new(config: StorefrontConfig) -> Result<Self, FetchError> {
        Ok(RemoteCatalogClient {
            transport: Transport::new(config)?,
        })
    }

    pub fn from_transport(transport: Transport) -> Self {
        RemoteCatalogClient { transport }
    }

    pub fn header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.transport = self.transport.header(key, value);
        self
    }

    /// Fetch the list backing `collection`.
    pub async fn fetch(&self, collection: &Collection) -> Result<Vec<AppListItem>, FetchError> {
        let items: Vec<AppListItem> = self.transport.get(collection.resource()).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Fetched {} apps for {:?}", items.len(), collection);

        Ok(items)
    }

    /// All app ids known to the catalog.
    pub async fn app_ids(&self) -> Result<Vec<String>, FetchError> {
        self.transport.get(Resource::AppstreamList).await
    }

    /// Full appstream metadata of one app.
    pub async fn app_details(&self, app_id: &str) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::AppDetails(app_id)).await
    }

    pub async fn summary(&self, app_id: &str) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::Summary(app_id)).await
    }

    pub async fn stats(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::Stats).await
    }

    pub async fn app_stats(&self, app_id: &str) -> Result<AnyJson, FetchError> {
        self.transport
            .get(Resource::AppStats {
                app_id,
                window: None,
            })
            .await
    }

    /// Install statistics of one app over an explicit window.
    pub async fn app_stats_window(
        &self,
        app_id: &str,
        window: StatsWindow,
    ) -> Result<AnyJson, FetchError> {
        self.transport
            .get(Resource::AppStats {
                app_id,
                window: Some(window),
            })
            .await
    }

    /// All-time popular apps.
    pub async fn popular_all_time(&self, limit: Option<u32>) -> Result<Vec<AppListItem>, FetchError> {
        self.transport.get(Resource::PopularAllTime { limit }).await
    }

    pub async fn picks(&self, picks: Picks) -> Result<Vec<AppListItem>, FetchError> {
        self.transport.get(Resource::Picks(picks)).await
    }

    pub async fn developers(&self) -> Result<Vec<String>, FetchError> {
        self.transport.get(Resource::Developers).await
    }

    pub async fn project_groups(&self) -> Result<Vec<String>, FetchError> {
        self.transport.get(Resource::ProjectGroups).await
    }

    /// RSS feed of recently updated apps.
    pub async fn feed_recently_updated(&self) -> Result<String, FetchError> {
        self.transport.get_text(Resource::FeedRecentlyUpdated).await
    }

    /// RSS feed of newly added apps.
    pub async fn feed_new(&self) -> Result<String, FetchError> {
        self.transport.get_text(Resource::FeedNew).await
    }

    /// Platforms the backend recognises, keyed by org name.
    pub async fn platforms(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::Platforms).await
    }

    /// Build exceptions registered for an app.
    pub async fn exceptions(&self, app_id: &str) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::Exceptions(app_id)).await
    }

    /// Plain-text sitemap, one URL per line.
    pub async fn sitemap(&self) -> Result<String, FetchError> {
        self.transport.get_text(Resource::Sitemap).await
    }

    /// Backend health check. Succeeds when the backend answers with a success status.
    pub async fn health(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::Health).await
    }

    pub async fn compat_apps(&self) -> Result<Vec<AnyJson>, FetchError> {
        self.transport.get(Resource::CompatApps).await
    }

    pub async fn compat_app(&self, app_id: &str) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::CompatApp(app_id)).await
    }

    pub async fn compat_category(&self, category: Category) -> Result<Vec<AnyJson>, FetchError> {
        self.transport.get(Resource::CompatCategory(category)).await
    }

    pub async fn compat_recently_updated(
        &self,
        limit: Option<u32>,
    ) -> Result<Vec<AnyJson>, FetchError> {
        self.transport
            .get(Resource::CompatRecentlyUpdated { limit })
            .await
    }

    pub async fn compat_search(&self, query: &str) -> Result<Vec<AnyJson>, FetchError> {
        self.transport.get(Resource::CompatSearch(query)).await
    }

    pub async fn login_providers(&self) -> Result<Vec<LoginProvider>, FetchError> {
        self.transport.get(Resource::LoginProviders).await
    }

    pub async fn user_info(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::UserInfo).await
    }

    pub async fn logout(&self) -> Result<(), FetchError> {
        self.transport
            .post_empty::<serde::de::IgnoredAny>(Resource::Logout)
            .await?;
        Ok(())
    }

    /// First half of account deletion: returns the backend's confirmation token.
    pub async fn request_user_deletion(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::DeleteUser).await
    }

    /// Second half of account deletion, echoing the confirmation token.
    pub async fn confirm_user_deletion(&self, token: &AnyJson) -> Result<AnyJson, FetchError> {
        self.transport.post(Resource::DeleteUser, token).await
    }

    /// Check which of the given app ids the current user may install.
    pub async fn check_purchases(&self, app_ids: &[String]) -> Result<AnyJson, FetchError> {
        self.transport.post(Resource::CheckPurchases, app_ids).await
    }

    pub async fn generate_update_token(&self) -> Result<AnyJson, FetchError> {
        self.transport
            .post_empty(Resource::GenerateUpdateToken)
            .await
    }
}

impl CollectionFetcher for RemoteCatalogClient {
    type Error = FetchError;

    async fn fetch_collection(
        &self,
        collection: &Collection,
    ) -> Result<Vec<AppListItem>, Self::Error> {
        self.fetch(collection).await
    }
}
