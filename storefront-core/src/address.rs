//! Resource addressing for the storefront backend.
//!
//! Every endpoint the client can reach is a variant of [`Resource`], and
//! [`Resource::address`] is the only place a variant becomes a concrete
//! [`ResourceAddress`]. Adding an endpoint means adding a variant, and the exhaustive
//! `match` in [`Resource::path`] makes the compiler point at the missing mapping.
//!
//! Free-form parameters (search queries, developer and project-group names, app and
//! transaction ids, currencies, tokens) are percent-encoded as single path segments.
//! Numeric and enum parameters are typed and embedded as-is. An identifier that is
//! empty, `.` or `..` is rejected, since it would not stay inside its own segment.
//!
//! ```
//! use storefront_core::{address::Resource, config::StorefrontConfig};
//! use url::Url;
//!
//! let config = StorefrontConfig::builder()
//!     .api_base(Url::parse("https://flathub.org/api/v1").unwrap())
//!     .site_base(Url::parse("https://flathub.org").unwrap())
//!     .build();
//!
//! let address = Resource::Search("photo editor").address(&config).unwrap();
//! assert_eq!(address.as_str(), "https://flathub.org/api/v1/search/photo%20editor");
//! ```

use std::{borrow::Cow, fmt::Display};

use url::Url;

use crate::{
    config::StorefrontConfig,
    contract::transaction::TransactionStep,
    errors::AddressError,
    types::{Category, Collection, Currency, POPULAR_DAYS, PaymentAmount, Picks},
};

/// A fully-formed, immutable endpoint locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceAddress(Url);

impl ResourceAddress {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn into_url(self) -> Url {
        self.0
    }
}

impl Display for ResourceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ResourceAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Sub-resources of a single vending app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendingAppPath<'a> {
    /// Account status of the app.
    Status,
    Setup,
    /// How a payment of `amount` in `currency` is split between the developer and the store.
    Split {
        currency: &'a Currency,
        amount: PaymentAmount,
    },
    /// The token collection: listing (`GET`) and issuing (`POST`).
    Tokens,
    /// Cancels the app's whole token set. Deliberately takes no token.
    CancelTokens,
    /// Redeems a single token.
    Redeem { token: &'a str },
}

/// How much install history [`Resource::AppStats`] asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsWindow {
    /// The last `n` days of per-day installs.
    Days(u32),
    /// The complete history.
    All,
}

/// Every addressable backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    // Catalog
    AppstreamList,
    AppDetails(&'a str),
    Summary(&'a str),
    Stats,
    /// Install statistics of one app. Without a window the backend returns its default range.
    AppStats {
        app_id: &'a str,
        window: Option<StatsWindow>,
    },
    Search(&'a str),
    Popular {
        days: u32,
    },
    /// All-time popularity, optionally capped to `limit` apps.
    PopularAllTime {
        limit: Option<u32>,
    },
    Picks(Picks),
    RecentlyUpdated {
        limit: Option<u32>,
    },
    RecentlyAdded {
        limit: Option<u32>,
    },
    Category {
        category: Category,
        page: Option<u32>,
        per_page: Option<u32>,
    },
    Developers,
    Developer(&'a str),
    ProjectGroups,
    ProjectGroup(&'a str),
    FeedRecentlyUpdated,
    FeedNew,
    Platforms,
    Exceptions(&'a str),
    Sitemap,
    /// Backend health check.
    Health,

    // Legacy listing endpoints, served under `/compat`
    CompatApps,
    CompatApp(&'a str),
    CompatCategory(Category),
    CompatRecentlyUpdated {
        limit: Option<u32>,
    },
    CompatSearch(&'a str),

    // Auth
    LoginProviders,
    UserInfo,
    Logout,
    DeleteUser,

    // Purchases
    CheckPurchases,
    GenerateUpdateToken,

    // Wallet
    Wallet,
    RemoveCard,
    WalletInfo,
    Transactions,
    StripeData,
    Transaction {
        id: &'a str,
        step: TransactionStep,
    },

    // Vending
    VendingConfig,
    VendingStatus,
    VendingOnboarding,
    VendingDashboardLink,
    VendingApp {
        app_id: &'a str,
        path: VendingAppPath<'a>,
    },
}

/// Percent-encode a free-form value as a single path segment.
fn segment<'v>(kind: &'static str, value: &'v str) -> Result<Cow<'v, str>, AddressError> {
    match value {
        "" => Err(AddressError::EmptyIdentifier(kind)),
        "." | ".." => Err(AddressError::DotSegment(kind)),
        _ => Ok(urlencoding::encode(value)),
    }
}

impl Resource<'_> {
    /// Build the concrete address of this resource against the configured API origin.
    pub fn address(&self, config: &StorefrontConfig) -> Result<ResourceAddress, AddressError> {
        let path = self.path()?;
        Ok(ResourceAddress(config.api_url(&path)?))
    }

    /// The encoded path (and query) of this resource, relative to the API origin.
    pub fn path(&self) -> Result<String, AddressError> {
        let path = match self {
            Resource::AppstreamList => "/appstream".to_string(),
            Resource::AppDetails(id) => format!("/appstream/{}", segment("app", id)?),
            Resource::Summary(id) => format!("/summary/{}", segment("app", id)?),
            Resource::Stats => "/stats".to_string(),
            Resource::AppStats { app_id, window } => {
                let base = format!("/stats/{}", segment("app", app_id)?);
                match window {
                    None => base,
                    Some(StatsWindow::Days(days)) => format!("{base}?days={days}"),
                    Some(StatsWindow::All) => format!("{base}?all=true"),
                }
            }
            Resource::Search(query) => format!("/search/{}", segment("search query", query)?),
            Resource::Popular { days } => format!("/popular/{days}"),
            Resource::PopularAllTime { limit: None } => "/popular".to_string(),
            Resource::PopularAllTime { limit: Some(limit) } => format!("/popular?limit={limit}"),
            Resource::Picks(picks) => format!("/picks/{}", picks.as_str()),
            Resource::RecentlyUpdated { limit } => with_limit("/collection/recently-updated", *limit),
            Resource::RecentlyAdded { limit } => with_limit("/collection/recently-added", *limit),
            Resource::Category {
                category,
                page,
                per_page,
            } => category_path(*category, *page, *per_page),
            Resource::Developers => "/developer".to_string(),
            Resource::Developer(name) => format!("/developer/{}", segment("developer", name)?),
            Resource::ProjectGroups => "/projectgroup".to_string(),
            Resource::ProjectGroup(name) => {
                format!("/projectgroup/{}", segment("project group", name)?)
            }
            Resource::FeedRecentlyUpdated => "/feed/recently-updated".to_string(),
            Resource::FeedNew => "/feed/new".to_string(),
            Resource::Platforms => "/platforms".to_string(),
            Resource::Exceptions(id) => format!("/exceptions/{}", segment("app", id)?),
            Resource::Sitemap => "/sitemap/text".to_string(),
            Resource::Health => "/status".to_string(),

            Resource::CompatApps => "/compat/apps".to_string(),
            Resource::CompatApp(id) => format!("/compat/apps/{}", segment("app", id)?),
            Resource::CompatCategory(category) => format!("/compat/apps/category/{category}"),
            Resource::CompatRecentlyUpdated { limit } => {
                with_limit("/compat/apps/collection/recently-updated", *limit)
            }
            Resource::CompatSearch(query) => {
                format!("/compat/apps/search/{}", segment("search query", query)?)
            }

            Resource::LoginProviders => "/auth/login".to_string(),
            Resource::UserInfo => "/auth/userinfo".to_string(),
            Resource::Logout => "/auth/logout".to_string(),
            Resource::DeleteUser => "/auth/deleteuser".to_string(),

            Resource::CheckPurchases => "/purchases/check-purchases".to_string(),
            Resource::GenerateUpdateToken => "/purchases/generate-update-token".to_string(),

            Resource::Wallet => "/wallet".to_string(),
            Resource::RemoveCard => "/wallet/removecard".to_string(),
            Resource::WalletInfo => "/wallet/walletinfo".to_string(),
            Resource::Transactions => "/wallet/transactions".to_string(),
            Resource::StripeData => "/wallet/stripedata".to_string(),
            Resource::Transaction { id, step } => {
                let base = format!("/wallet/transactions/{}", segment("transaction", id)?);
                match step.sub_resource() {
                    Some(sub) => format!("{base}/{sub}"),
                    None => base,
                }
            }

            Resource::VendingConfig => "/vending/config".to_string(),
            Resource::VendingStatus => "/vending/status".to_string(),
            Resource::VendingOnboarding => "/vending/status/onboarding".to_string(),
            Resource::VendingDashboardLink => "/vending/status/dashboardlink".to_string(),
            Resource::VendingApp { app_id, path } => {
                let base = format!("/vendingapp/{}", segment("app", app_id)?);
                match path {
                    VendingAppPath::Status => base,
                    VendingAppPath::Setup => format!("{base}/setup"),
                    VendingAppPath::Split { currency, amount } => {
                        format!("{base}/{}/{}", currency.as_str(), amount.cents())
                    }
                    VendingAppPath::Tokens => format!("{base}/tokens"),
                    VendingAppPath::CancelTokens => format!("{base}/tokens/cancel"),
                    VendingAppPath::Redeem { token } => {
                        format!("{base}/tokens/redeem/{}", segment("token", token)?)
                    }
                }
            }
        };

        Ok(path)
    }
}

fn with_limit(base: &str, limit: Option<u32>) -> String {
    match limit {
        Some(limit) => format!("{base}/{limit}"),
        None => base.to_string(),
    }
}

fn category_path(category: Category, page: Option<u32>, per_page: Option<u32>) -> String {
    match (page, per_page) {
        (Some(page), Some(per_page)) if page > 0 && per_page > 0 => {
            format!("/category/{category}?page={page}&per_page={per_page}")
        }
        (None, None) => format!("/category/{category}"),
        _ => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "Partial pagination for category {category} (page={page:?}, per_page={per_page:?}); addressing the unpaginated listing"
            );
            format!("/category/{category}")
        }
    }
}

/// Build the address of `resource` against `config`.
pub fn address_for(
    resource: &Resource<'_>,
    config: &StorefrontConfig,
) -> Result<ResourceAddress, AddressError> {
    resource.address(config)
}

impl Collection {
    /// The resource backing this collection.
    pub fn resource(&self) -> Resource<'_> {
        match self {
            Collection::RecentlyUpdated => Resource::RecentlyUpdated { limit: None },
            Collection::RecentlyAdded => Resource::RecentlyAdded { limit: None },
            Collection::Popular => Resource::Popular { days: POPULAR_DAYS },
            Collection::EditorsPicks => Resource::Picks(Picks::Apps),
            Collection::Category {
                category,
                page,
                per_page,
            } => Resource::Category {
                category: *category,
                page: *page,
                per_page: *per_page,
            },
            Collection::Developer(name) => Resource::Developer(name),
            Collection::ProjectGroup(name) => Resource::ProjectGroup(name),
            Collection::Search(query) => Resource::Search(query),
        }
    }

    pub fn address(&self, config: &StorefrontConfig) -> Result<ResourceAddress, AddressError> {
        self.resource().address(config)
    }
}
