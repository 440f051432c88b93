//! Wallet transaction lifecycle.
//!
//! The backend is authoritative for transaction state. [`TransactionState`] mirrors it
//! locally so a client can refuse an out-of-order step before sending anything.
//!
//! ```text
//! Created --setcard--> CardSet --stripe--> StripeLinked
//!                         \                    |
//!                          +----setpending-----+--> Pending --(confirmed)--> Completed
//!
//! any non-terminal state --cancel--> Cancelled
//! ```

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::errors::LifecycleError;

/// A sub-resource of a wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionStep {
    /// Read the current transaction state.
    Info,
    /// Fetch provider-specific payment details.
    Stripe,
    /// Persist a card for reuse. Repeatable.
    SaveCard,
    /// Attach a saved card to this transaction. Overwrites any previous card.
    SetCard,
    /// Mark the transaction as awaiting external confirmation.
    SetPending,
    /// Terminate the transaction.
    Cancel,
}

impl TransactionStep {
    /// Path suffix under `/wallet/transactions/{id}`; `None` for the transaction itself.
    pub fn sub_resource(&self) -> Option<&'static str> {
        match self {
            TransactionStep::Info => None,
            TransactionStep::Stripe => Some("stripe"),
            TransactionStep::SaveCard => Some("savecard"),
            TransactionStep::SetCard => Some("setcard"),
            TransactionStep::SetPending => Some("setpending"),
            TransactionStep::Cancel => Some("cancel"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.sub_resource().unwrap_or("info")
    }

    /// Whether the step mutates server-side state.
    pub fn is_mutation(&self) -> bool {
        !matches!(self, TransactionStep::Info | TransactionStep::Stripe)
    }
}

impl Display for TransactionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side view of a wallet transaction's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TransactionState {
    #[default]
    Created,
    CardSet,
    StripeLinked,
    Pending,
    Cancelled,
    Completed,
}

impl TransactionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransactionState::Cancelled | TransactionState::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionState::Created => "created",
            TransactionState::CardSet => "cardSet",
            TransactionState::StripeLinked => "stripeLinked",
            TransactionState::Pending => "pending",
            TransactionState::Cancelled => "cancelled",
            TransactionState::Completed => "completed",
        }
    }

    /// The state after `step` succeeds, or an error if `step` is not allowed from here.
    pub fn apply(self, step: TransactionStep) -> Result<TransactionState, LifecycleError> {
        use TransactionState::*;
        use TransactionStep as Step;

        let next = match (self, step) {
            (state, Step::Info) => Some(state),
            (state, _) if state.is_terminal() => None,

            (state, Step::SaveCard) => Some(state),
            (Created | CardSet, Step::SetCard) => Some(CardSet),
            (StripeLinked, Step::SetCard) => Some(StripeLinked),
            (CardSet | StripeLinked, Step::Stripe) => Some(StripeLinked),
            (CardSet | StripeLinked, Step::SetPending) => Some(Pending),
            (_, Step::Cancel) => Some(Cancelled),

            _ => None,
        };

        next.ok_or_else(|| LifecycleError {
            entity: "transaction",
            step: step.as_str(),
            state: self.as_str(),
        })
    }

    /// The backend confirmed a pending transaction.
    pub fn complete(self) -> Result<TransactionState, LifecycleError> {
        match self {
            TransactionState::Pending => Ok(TransactionState::Completed),
            other => Err(LifecycleError {
                entity: "transaction",
                step: "complete",
                state: other.as_str(),
            }),
        }
    }
}

impl Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
