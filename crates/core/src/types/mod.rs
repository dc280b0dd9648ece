//! Core types for Orderline.
//!
//! This module provides the order description, type-safe Shopify IDs, money
//! helpers and the confirmation record returned after creation.

pub mod confirmation;
pub mod email;
pub mod id;
pub mod money;
pub mod order;

pub use confirmation::*;
pub use email::{Email, EmailError};
pub use id::*;
pub use money::{
    CurrencyCode, extended_amount, format_money, format_percent, parse_decimal, percent_of,
    round_money, saturating_sum,
};
pub use order::*;
