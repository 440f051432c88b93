//! Error types for the storefront HTTP clients.

pub use storefront_core::errors::{AddressError, ConfigError, LifecycleError, PaymentRangeError};

/// A single request to the storefront backend failed.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The resource address could not be built. Nothing was sent.
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Transport failure or timeout.
    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Unexpected status {status} from {address}")]
    Status {
        status: reqwest::StatusCode,
        address: String,
    },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response from {address}: {source}")]
    Decode {
        address: String,
        #[source]
        source: serde_json::Error,
    },
}

impl FetchError {
    /// Whether the failure happened before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(self, FetchError::Address(_))
    }
}

/// Errors from the wallet and vending clients.
///
/// Lifecycle and range errors are raised locally, before any request is issued.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    PaymentRange(#[from] PaymentRangeError),

    #[error("Invalid vending setup: {0}")]
    InvalidSetup(&'static str),
}

impl From<AddressError> for ClientError {
    fn from(err: AddressError) -> Self {
        ClientError::Fetch(FetchError::Address(err))
    }
}
