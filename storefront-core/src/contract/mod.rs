//! Explicit lifecycles for wallet transactions and vending apps.

pub mod transaction;
pub mod vending;
