//! Domain types for Shopify Admin API.
//!
//! These types provide a clean, ergonomic API separate from the raw
//! response shapes in `admin::queries`.

pub mod common;
pub mod draft_order;
pub mod location;
pub mod metafield;
pub mod order;
pub mod order_edit;

// Re-export all types for convenience
pub use common::*;
pub use draft_order::*;
pub use location::*;
pub use metafield::*;
pub use order::*;
pub use order_edit::*;
