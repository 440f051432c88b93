//! Error types for storefront core operations.
//!
//! Everything in this module surfaces synchronously: none of these errors
//! involve a network round-trip.

use crate::types::PaymentAmount;

/// Errors raised while building a [`ResourceAddress`](crate::address::ResourceAddress).
///
/// These are programmer errors and are never degraded into a best-effort address.
#[derive(Debug, thiserror::Error)]
pub enum AddressError {
    /// A category name that is not part of the known category set.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// A picks name that is not part of the known picks set.
    #[error("Unknown picks collection: {0}")]
    UnknownPicks(String),

    /// A currency code that is not three ASCII letters.
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    /// A required identifier was empty.
    #[error("Empty {0} identifier")]
    EmptyIdentifier(&'static str),

    /// An identifier of `.` or `..`, which would be resolved as a relative path step.
    #[error("The {0} identifier must not be a dot segment")]
    DotSegment(&'static str),

    /// The joined origin and path did not form a valid URL.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
}

/// A payment amount outside `[FLATHUB_MIN_PAYMENT, STRIPE_MAX_PAYMENT]`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentRangeError {
    #[error("Amount {0} is below the minimum payment of {min}", min = PaymentAmount::MIN)]
    BelowMinimum(String),

    #[error("Amount {0} exceeds the maximum payment of {max}", max = PaymentAmount::MAX)]
    AboveMaximum(String),

    #[error("Amount {0:?} is not a valid decimal amount")]
    Malformed(String),
}

/// A lifecycle step was attempted from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Cannot {step} while {entity} is {state}")]
pub struct LifecycleError {
    pub entity: &'static str,
    pub step: &'static str,
    pub state: &'static str,
}

/// Errors raised while resolving [`StorefrontConfig`](crate::config::StorefrontConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable `{0}`")]
    Missing(&'static str),

    #[error("`{var}` is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("`{var}` is not a valid number of seconds: {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

/// Umbrella error for storefront core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    PaymentRange(#[from] PaymentRangeError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// JSON serialization/deserialization errors.
    #[error("Serde JSON error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

/// A specialized `Result` type for storefront core operations.
pub type Result<T> = std::result::Result<T, Error>;
