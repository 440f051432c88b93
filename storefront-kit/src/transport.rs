//! HTTP transport shared by the storefront clients.

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};
use storefront_core::{
    address::{Resource, ResourceAddress},
    config::StorefrontConfig,
};

use crate::errors::FetchError;

/// A configured HTTP client bound to one storefront backend.
///
/// Every request is one attempt, bounded by the configured request timeout.
/// Headers added with [`Transport::header`] (e.g. a session cookie) are sent with
/// every request.
#[derive(Debug, Clone)]
pub struct Transport {
    pub config: StorefrontConfig,
    pub client: reqwest::Client,
    pub headers: HeaderMap,
}

impl Transport {
    /// Build a transport with a fresh `reqwest` client using the configured timeout.
    pub fn new(config: StorefrontConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self::with_client(config, client))
    }

    pub fn with_client(config: StorefrontConfig, client: reqwest::Client) -> Self {
        Transport {
            config,
            client,
            headers: HeaderMap::new(),
        }
    }

    pub fn header(mut self, key: &HeaderName, value: &HeaderValue) -> Self {
        self.headers.insert(key, value.to_owned());
        self
    }

    pub fn address(&self, resource: &Resource<'_>) -> Result<ResourceAddress, FetchError> {
        Ok(resource.address(&self.config)?)
    }

    /// `GET` a resource and decode its JSON body.
    pub async fn get<T: DeserializeOwned>(&self, resource: Resource<'_>) -> Result<T, FetchError> {
        let address = self.address(&resource)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("GET {address}");

        let response = self
            .client
            .get(address.as_url().clone())
            .headers(self.headers.clone())
            .send()
            .await?;

        decode(&address, response).await
    }

    /// `GET` a resource as text, e.g. a syndication feed.
    pub async fn get_text(&self, resource: Resource<'_>) -> Result<String, FetchError> {
        let address = self.address(&resource)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("GET {address}");

        let response = self
            .client
            .get(address.as_url().clone())
            .headers(self.headers.clone())
            .send()
            .await?;

        let response = check_status(&address, response)?;
        Ok(response.text().await?)
    }

    /// `POST` a JSON body to a resource and decode the JSON response.
    pub async fn post<B, T>(&self, resource: Resource<'_>, body: &B) -> Result<T, FetchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let address = self.address(&resource)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("POST {address}");

        let response = self
            .client
            .post(address.as_url().clone())
            .headers(self.headers.clone())
            .json(body)
            .send()
            .await?;

        decode(&address, response).await
    }

    /// `POST` to a resource without a body.
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        resource: Resource<'_>,
    ) -> Result<T, FetchError> {
        let address = self.address(&resource)?;

        #[cfg(feature = "tracing")]
        tracing::debug!("POST {address}");

        let response = self
            .client
            .post(address.as_url().clone())
            .headers(self.headers.clone())
            .send()
            .await?;

        decode(&address, response).await
    }
}

fn check_status(
    address: &ResourceAddress,
    response: reqwest::Response,
) -> Result<reqwest::Response, FetchError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        #[cfg(feature = "tracing")]
        tracing::warn!("{address} answered with status {status}");

        Err(FetchError::Status {
            status,
            address: address.to_string(),
        })
    }
}

/// Decode a JSON body. An empty body decodes as `null`.
async fn decode<T: DeserializeOwned>(
    address: &ResourceAddress,
    response: reqwest::Response,
) -> Result<T, FetchError> {
    let response = check_status(address, response)?;
    let bytes = response.bytes().await?;
    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };

    serde_json::from_slice(body).map_err(|source| FetchError::Decode {
        address: address.to_string(),
        source,
    })
}
