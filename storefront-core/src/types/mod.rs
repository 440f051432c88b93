//! Core types used across the storefront kit.

mod amount;
mod catalog;
mod common;

pub use amount::*;
pub use catalog::*;
pub use common::*;
