//! Orderline Admin library.
//!
//! Talks to the Shopify Admin API and runs the remote side of order creation:
//! - [`config`] - shop credentials and tuning loaded from the environment
//! - [`shopify`] - the Admin API client (GraphQL and REST)
//! - [`orders`] - the orchestrator that turns an order draft into a remote order
//! - [`retry`] - bounded backoff for read-only lookups
//!
//! # Security
//!
//! The Admin API token grants write access to orders. It is held as a
//! `SecretString` and never logged.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod orders;
pub mod retry;
pub mod shopify;
