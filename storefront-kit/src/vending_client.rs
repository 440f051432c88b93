//! Vending (developer revenue-share) client.
//!
//! [`VendingAppHandle`] tracks one app's account state and the tokens this client has
//! seen, and checks every step locally before sending it. Token redemption goes
//! through the exact same address on every attempt, so retrying a failed redeem with
//! the same token is safe.

use std::collections::HashMap;

use bon::Builder;
use serde::{Deserialize, Serialize, de::IgnoredAny};
use storefront_core::{
    address::{Resource, VendingAppPath},
    contract::vending::{TokenState, VendingAccountState, VendingStep, VendingToken},
    types::{AnyJson, Currency, PaymentAmount, cents},
};
use url::Url;

use crate::{
    errors::{ClientError, FetchError},
    transport::Transport,
};

#[derive(Debug, Clone)]
pub struct VendingClient {
    pub transport: Transport,
}

/// A link into the payment provider's hosted onboarding or dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendingRedirect {
    pub target_url: String,
}

#[derive(Debug, Clone, Serialize)]
struct OnboardingRequest<'a> {
    return_url: &'a str,
}

/// Revenue-share configuration for one app.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendingSetup {
    pub currency: Currency,
    /// Percentage of each payment kept by the developer, `0..=100`.
    pub appshare: u8,
    /// Serialized in minor units.
    #[serde(with = "cents")]
    pub recommended_donation: PaymentAmount,
    /// Serialized in minor units.
    #[serde(with = "cents")]
    pub minimum_payment: PaymentAmount,
}

impl VendingSetup {
    fn validate(&self) -> Result<(), ClientError> {
        if self.appshare > 100 {
            return Err(ClientError::InvalidSetup("appshare must be at most 100"));
        }
        if self.minimum_payment > self.recommended_donation {
            return Err(ClientError::InvalidSetup(
                "minimum payment must not exceed the recommended donation",
            ));
        }
        Ok(())
    }
}

impl VendingClient {
    pub fn new(transport: Transport) -> Self {
        VendingClient { transport }
    }

    pub async fn config(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::VendingConfig).await
    }

    /// Status of the current user's vending account.
    pub async fn status(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::VendingStatus).await
    }

    pub async fn onboarding(&self, return_url: &Url) -> Result<VendingRedirect, FetchError> {
        self.transport
            .post(
                Resource::VendingOnboarding,
                &OnboardingRequest {
                    return_url: return_url.as_str(),
                },
            )
            .await
    }

    pub async fn dashboard_link(&self) -> Result<VendingRedirect, FetchError> {
        self.transport.get(Resource::VendingDashboardLink).await
    }

    /// Handle for an app whose account has not been configured yet.
    pub fn app(&self, app_id: impl Into<String>) -> VendingAppHandle<'_> {
        self.app_in(app_id, VendingAccountState::Unconfigured)
    }

    /// Handle for an app whose account state is already known.
    pub fn app_in(&self, app_id: impl Into<String>, state: VendingAccountState) -> VendingAppHandle<'_> {
        VendingAppHandle {
            vending: self,
            app_id: app_id.into(),
            state,
            tokens: HashMap::new(),
        }
    }
}

/// Drives one vending app's account and tokens.
#[derive(Debug)]
pub struct VendingAppHandle<'v> {
    vending: &'v VendingClient,
    app_id: String,
    state: VendingAccountState,
    tokens: HashMap<String, TokenState>,
}

impl VendingAppHandle<'_> {
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn state(&self) -> VendingAccountState {
        self.state
    }

    /// Locally known state of a token, if this handle has seen it.
    pub fn token_state(&self, token: &str) -> Option<TokenState> {
        self.tokens.get(token).copied()
    }

    fn resource<'a>(&'a self, path: VendingAppPath<'a>) -> Resource<'a> {
        Resource::VendingApp {
            app_id: &self.app_id,
            path,
        }
    }

    pub async fn status(&self) -> Result<AnyJson, ClientError> {
        self.state.apply(VendingStep::Status)?;
        Ok(self
            .vending
            .transport
            .get(self.resource(VendingAppPath::Status))
            .await?)
    }

    /// Record that the backend reports the account as live.
    pub fn mark_active(&mut self) -> Result<(), ClientError> {
        self.state = self.state.activate()?;
        Ok(())
    }

    pub async fn setup(&mut self, setup: &VendingSetup) -> Result<AnyJson, ClientError> {
        let next = self.state.apply(VendingStep::Setup)?;
        setup.validate()?;

        let response = self
            .vending
            .transport
            .post(self.resource(VendingAppPath::Setup), setup)
            .await?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Vending app '{}' set up: {} -> {}", self.app_id, self.state, next);

        self.state = next;
        Ok(response)
    }

    /// How a payment of `amount` in `currency` would be split.
    pub async fn split(
        &self,
        currency: &Currency,
        amount: PaymentAmount,
    ) -> Result<AnyJson, ClientError> {
        self.state.apply(VendingStep::Split)?;
        Ok(self
            .vending
            .transport
            .get(self.resource(VendingAppPath::Split { currency, amount }))
            .await?)
    }

    /// Like [`split`](Self::split), validating raw user input first.
    ///
    /// An invalid currency or an amount outside the payment range is rejected
    /// without sending a request.
    pub async fn split_for(&self, currency: &str, amount: f64) -> Result<AnyJson, ClientError> {
        let currency: Currency = currency.parse()?;
        let amount = PaymentAmount::try_from(amount)?;
        self.split(&currency, amount).await
    }

    /// Issue one token per name.
    pub async fn issue_tokens(&mut self, names: &[String]) -> Result<Vec<VendingToken>, ClientError> {
        self.state.apply(VendingStep::IssueTokens)?;

        let issued: Vec<VendingToken> = self
            .vending
            .transport
            .post(self.resource(VendingAppPath::Tokens), names)
            .await?;

        for token in &issued {
            self.tokens.insert(token.token.clone(), token.state);
        }
        Ok(issued)
    }

    pub async fn list_tokens(&mut self) -> Result<Vec<VendingToken>, ClientError> {
        self.state.apply(VendingStep::ListTokens)?;

        let tokens: Vec<VendingToken> = self
            .vending
            .transport
            .get(self.resource(VendingAppPath::Tokens))
            .await?;

        self.tokens = tokens
            .iter()
            .map(|t| (t.token.clone(), t.state))
            .collect();
        Ok(tokens)
    }

    /// Cancel the app's whole token set. Redeemed tokens stay redeemed.
    pub async fn cancel_tokens(&mut self) -> Result<(), ClientError> {
        self.state.apply(VendingStep::CancelTokens)?;

        self.vending
            .transport
            .post_empty::<IgnoredAny>(self.resource(VendingAppPath::CancelTokens))
            .await?;

        for state in self.tokens.values_mut() {
            if let Ok(cancelled) = state.cancel() {
                *state = cancelled;
            }
        }
        Ok(())
    }

    /// Redeem a token. Safe to retry with the same token.
    pub async fn redeem(&mut self, token: &str) -> Result<AnyJson, ClientError> {
        self.state.apply(VendingStep::RedeemToken)?;
        let current = self.tokens.get(token).copied().unwrap_or_default();
        let next = current.redeem()?;

        let response = self
            .vending
            .transport
            .post_empty(self.resource(VendingAppPath::Redeem { token }))
            .await?;

        #[cfg(feature = "tracing")]
        tracing::debug!("Redeemed token for vending app '{}'", self.app_id);

        self.tokens.insert(token.to_string(), next);
        Ok(response)
    }
}
