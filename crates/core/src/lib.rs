//! Orderline Core - order domain types and payload builder.
//!
//! This crate turns a locally described order into the request bodies the
//! Shopify Admin API expects:
//! - `admin` - Shopify client and the orchestrator that runs the calls
//! - `cli` - the `orderline` command-line tool
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Every payload decision can be tested without a shop.
//!
//! # Modules
//!
//! - [`types`] - Order draft, IDs, money and the confirmation record
//! - [`input`] - The camelCase `input.json` format and its conversion
//! - [`builder`] - Strategy selection, discount and tax arithmetic
//! - [`payload`] - Draft order, REST and GraphQL order request bodies

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod builder;
pub mod input;
pub mod payload;
pub mod types;

pub use types::*;
