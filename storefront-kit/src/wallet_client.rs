//! Wallet and payment-transaction client.
//!
//! [`TransactionHandle`] drives one transaction through its lifecycle. Each step is
//! checked against the locally tracked [`TransactionState`] before anything is sent,
//! and the new state is only recorded once the backend accepted the step:
//!
//! ```no_run
//! # async fn flow(wallet: storefront_kit::wallet_client::WalletClient) -> Result<(), storefront_kit::errors::ClientError> {
//! use serde_json::json;
//!
//! let mut txn = wallet.transaction("txn-42");
//! txn.set_card(&json!({ "id": "card_1" })).await?;
//! txn.stripe().await?;
//! txn.set_pending().await?;
//! # Ok(())
//! # }
//! ```

use bon::Builder;
use serde::{Deserialize, Serialize, de::IgnoredAny};
use storefront_core::{
    address::Resource,
    contract::transaction::{TransactionState, TransactionStep},
    types::{AnyJson, Currency, PaymentAmount, cents},
};

use crate::{
    errors::{ClientError, FetchError},
    transport::Transport,
};

#[derive(Debug, Clone)]
pub struct WalletClient {
    pub transport: Transport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[default]
    Donation,
    Purchase,
}

/// A transaction the client asks the backend to open.
///
/// The value is a [`PaymentAmount`], so it is already inside the accepted payment range.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTransaction {
    /// App id receiving the payment.
    #[builder(into)]
    pub recipient: String,
    pub currency: Currency,
    /// Serialized in minor units.
    #[serde(with = "cents")]
    pub value: PaymentAmount,
    #[builder(default)]
    pub kind: TransactionKind,
}

#[derive(Debug, Clone, Deserialize)]
struct CreatedTransaction {
    id: String,
}

impl WalletClient {
    pub fn new(transport: Transport) -> Self {
        WalletClient { transport }
    }

    pub async fn wallet_info(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::WalletInfo).await
    }

    pub async fn remove_card<B: Serialize + ?Sized>(&self, card: &B) -> Result<(), FetchError> {
        self.transport
            .post::<_, IgnoredAny>(Resource::RemoveCard, card)
            .await?;
        Ok(())
    }

    pub async fn stripe_data(&self) -> Result<AnyJson, FetchError> {
        self.transport.get(Resource::StripeData).await
    }

    pub async fn transactions(&self) -> Result<Vec<AnyJson>, FetchError> {
        self.transport.get(Resource::Transactions).await
    }

    /// Open a new transaction and return a handle in the `Created` state.
    pub async fn create_transaction(
        &self,
        transaction: &NewTransaction,
    ) -> Result<TransactionHandle<'_>, FetchError> {
        let created: CreatedTransaction = self
            .transport
            .post(Resource::Transactions, transaction)
            .await?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Created transaction '{}' for recipient='{}', value={}",
            created.id,
            transaction.recipient,
            transaction.value
        );

        Ok(self.transaction(created.id))
    }

    /// Handle for an existing transaction that has not progressed yet.
    pub fn transaction(&self, id: impl Into<String>) -> TransactionHandle<'_> {
        self.transaction_in(id, TransactionState::Created)
    }

    /// Handle for an existing transaction whose state is already known.
    pub fn transaction_in(
        &self,
        id: impl Into<String>,
        state: TransactionState,
    ) -> TransactionHandle<'_> {
        TransactionHandle {
            wallet: self,
            id: id.into(),
            state,
        }
    }
}

/// Drives a single wallet transaction through its lifecycle.
#[derive(Debug)]
pub struct TransactionHandle<'w> {
    wallet: &'w WalletClient,
    id: String,
    state: TransactionState,
}

impl TransactionHandle<'_> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    fn resource(&self, step: TransactionStep) -> Resource<'_> {
        Resource::Transaction { id: &self.id, step }
    }

    fn commit(&mut self, step: TransactionStep, next: TransactionState) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Transaction '{}' {} -> {} after {}",
            self.id,
            self.state,
            next,
            step
        );
        #[cfg(not(feature = "tracing"))]
        let _ = step;

        self.state = next;
    }

    pub async fn info(&mut self) -> Result<AnyJson, ClientError> {
        let step = TransactionStep::Info;
        let next = self.state.apply(step)?;
        let info = self.wallet.transport.get(self.resource(step)).await?;
        self.commit(step, next);
        Ok(info)
    }

    /// Provider-specific payment details (e.g. the Stripe client secret).
    pub async fn stripe(&mut self) -> Result<AnyJson, ClientError> {
        let step = TransactionStep::Stripe;
        let next = self.state.apply(step)?;
        let data = self.wallet.transport.get(self.resource(step)).await?;
        self.commit(step, next);
        Ok(data)
    }

    pub async fn save_card<B: Serialize + ?Sized>(&mut self, card: &B) -> Result<(), ClientError> {
        let step = TransactionStep::SaveCard;
        let next = self.state.apply(step)?;
        self.wallet
            .transport
            .post::<_, IgnoredAny>(self.resource(step), card)
            .await?;
        self.commit(step, next);
        Ok(())
    }

    pub async fn set_card<B: Serialize + ?Sized>(&mut self, card: &B) -> Result<(), ClientError> {
        let step = TransactionStep::SetCard;
        let next = self.state.apply(step)?;
        self.wallet
            .transport
            .post::<_, IgnoredAny>(self.resource(step), card)
            .await?;
        self.commit(step, next);
        Ok(())
    }

    /// Only allowed after a card was successfully attached.
    pub async fn set_pending(&mut self) -> Result<(), ClientError> {
        let step = TransactionStep::SetPending;
        let next = self.state.apply(step)?;
        self.wallet
            .transport
            .post_empty::<IgnoredAny>(self.resource(step))
            .await?;
        self.commit(step, next);
        Ok(())
    }

    pub async fn cancel(&mut self) -> Result<(), ClientError> {
        let step = TransactionStep::Cancel;
        let next = self.state.apply(step)?;
        self.wallet
            .transport
            .post_empty::<IgnoredAny>(self.resource(step))
            .await?;
        self.commit(step, next);
        Ok(())
    }

    /// Record the backend's confirmation of a pending transaction.
    pub fn mark_completed(&mut self) -> Result<(), ClientError> {
        self.state = self.state.complete()?;
        Ok(())
    }
}
