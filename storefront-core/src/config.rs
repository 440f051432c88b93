//! Process-wide storefront configuration.
//!
//! The configuration is resolved once at startup and handed explicitly to whatever
//! needs an origin. Nothing in the kit reads the environment on its own.

use std::time::Duration;

use bon::Builder;
use url::Url;

use crate::errors::ConfigError;

pub const API_BASE_URI_VAR: &str = "STOREFRONT_API_BASE_URI";
pub const SITE_BASE_URI_VAR: &str = "STOREFRONT_SITE_BASE_URI";
pub const IS_PRODUCTION_VAR: &str = "STOREFRONT_IS_PRODUCTION";
pub const REQUEST_TIMEOUT_VAR: &str = "STOREFRONT_REQUEST_TIMEOUT_SECS";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Origins and flags the storefront client runs against.
///
/// ```
/// use storefront_core::config::StorefrontConfig;
/// use url::Url;
///
/// let config = StorefrontConfig::builder()
///     .api_base(Url::parse("https://flathub.org/api/v1").unwrap())
///     .site_base(Url::parse("https://flathub.org").unwrap())
///     .build();
///
/// assert!(!config.is_production);
/// assert_eq!(
///     config.image_url("flathub-logo.png").unwrap().as_str(),
///     "https://flathub.org/img/flathub-logo.png"
/// );
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Origin (optionally with a path prefix) of the backend API.
    pub api_base: Url,
    /// Origin of the public site, used for static image assets.
    pub site_base: Url,
    #[builder(default)]
    pub is_production: bool,
    /// Upper bound on a single backend request.
    #[builder(default = Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))]
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Resolve the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Resolve the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url_var = |var: &'static str| -> Result<Url, ConfigError> {
            let raw = lookup(var).ok_or(ConfigError::Missing(var))?;
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { var, source })
        };

        let api_base = url_var(API_BASE_URI_VAR)?;
        let site_base = url_var(SITE_BASE_URI_VAR)?;
        let is_production = lookup(IS_PRODUCTION_VAR).is_some_and(|v| v == "true");

        let request_timeout = match lookup(REQUEST_TIMEOUT_VAR) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::InvalidTimeout {
                    var: REQUEST_TIMEOUT_VAR,
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        Ok(StorefrontConfig {
            api_base,
            site_base,
            is_production,
            request_timeout,
        })
    }

    /// Join an already-encoded path onto the API origin.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}{}",
            self.api_base.as_str().trim_end_matches('/'),
            path
        ))
    }

    /// Base URL for static image assets: `{site_base}/img/`.
    pub fn image_base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/img/",
            self.site_base.as_str().trim_end_matches('/')
        ))
    }

    /// URL of a single static image asset.
    pub fn image_url(&self, name: &str) -> Result<Url, url::ParseError> {
        self.image_base_url()?.join(name.trim_start_matches('/'))
    }
}
