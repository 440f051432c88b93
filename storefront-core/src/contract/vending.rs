//! Vending app lifecycle: revenue-share accounts and their redeemable tokens.
//!
//! Accounts move `Unconfigured -> Setup -> Active`; the token operations are only
//! meaningful on an active account. Tokens move `Issued -> (Redeemed | Cancelled)`.
//!
//! Cancellation applies to an app's whole token set, so [`VendingStep::CancelTokens`]
//! carries no token. Redemption is keyed by the token value and is idempotent: redeeming
//! an already redeemed token is a no-op, which lets a retry layer resend the exact same
//! request.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::errors::LifecycleError;

/// An operation on a single vending app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VendingStep {
    Status,
    Setup,
    Split,
    IssueTokens,
    ListTokens,
    CancelTokens,
    RedeemToken,
}

impl VendingStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendingStep::Status => "read status",
            VendingStep::Setup => "set up",
            VendingStep::Split => "query split",
            VendingStep::IssueTokens => "issue tokens",
            VendingStep::ListTokens => "list tokens",
            VendingStep::CancelTokens => "cancel tokens",
            VendingStep::RedeemToken => "redeem token",
        }
    }
}

impl Display for VendingStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client-side view of a vending app account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VendingAccountState {
    #[default]
    Unconfigured,
    Setup,
    Active,
}

impl VendingAccountState {
    pub fn as_str(&self) -> &'static str {
        match self {
            VendingAccountState::Unconfigured => "unconfigured",
            VendingAccountState::Setup => "setup",
            VendingAccountState::Active => "active",
        }
    }

    pub fn apply(self, step: VendingStep) -> Result<VendingAccountState, LifecycleError> {
        use VendingAccountState::*;

        let next = match (self, step) {
            (state, VendingStep::Status | VendingStep::Split) => Some(state),
            (Unconfigured | Setup, VendingStep::Setup) => Some(Setup),
            (Active, VendingStep::Setup) => Some(Active),
            (
                Active,
                VendingStep::IssueTokens
                | VendingStep::ListTokens
                | VendingStep::CancelTokens
                | VendingStep::RedeemToken,
            ) => Some(Active),
            _ => None,
        };

        next.ok_or_else(|| LifecycleError {
            entity: "vending app",
            step: step.as_str(),
            state: self.as_str(),
        })
    }

    /// The backend reports the configured account as live.
    pub fn activate(self) -> Result<VendingAccountState, LifecycleError> {
        match self {
            VendingAccountState::Setup | VendingAccountState::Active => {
                Ok(VendingAccountState::Active)
            }
            VendingAccountState::Unconfigured => Err(LifecycleError {
                entity: "vending app",
                step: "activate",
                state: self.as_str(),
            }),
        }
    }
}

impl Display for VendingAccountState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenState {
    #[default]
    Issued,
    Redeemed,
    Cancelled,
}

impl TokenState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenState::Issued => "issued",
            TokenState::Redeemed => "redeemed",
            TokenState::Cancelled => "cancelled",
        }
    }

    pub fn redeem(self) -> Result<TokenState, LifecycleError> {
        match self {
            TokenState::Issued | TokenState::Redeemed => Ok(TokenState::Redeemed),
            TokenState::Cancelled => Err(LifecycleError {
                entity: "token",
                step: "redeem",
                state: self.as_str(),
            }),
        }
    }

    pub fn cancel(self) -> Result<TokenState, LifecycleError> {
        match self {
            TokenState::Issued | TokenState::Cancelled => Ok(TokenState::Cancelled),
            TokenState::Redeemed => Err(LifecycleError {
                entity: "token",
                step: "cancel",
                state: self.as_str(),
            }),
        }
    }
}

/// A redeemable token issued for a vending app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendingToken {
    pub token: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub state: TokenState,
}
