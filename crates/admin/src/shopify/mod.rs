//! Shopify Admin API client (HIGH PRIVILEGE).
//!
//! # Security
//!
//! **This module holds the Admin API access token.** The token can create,
//! edit and annotate orders, so it never appears in logs or `Debug` output.
//!
//! # Architecture
//!
//! - `graphql_client::GraphQLQuery` shapes every GraphQL request body
//! - REST is used where GraphQL cannot express the call (custom tax lines on
//!   direct orders, tax restoration, transactions, locations)
//! - Direct API calls to Shopify (no local state)
//!
//! # Example
//!
//! ```rust,ignore
//! use orderline_admin::shopify::AdminClient;
//!
//! let client = AdminClient::new(&config)?;
//!
//! // Read back an order
//! let summary = client.get_order_summary("gid://shopify/Order/123").await?;
//!
//! // Look up fulfillment routing
//! let routing = client.get_fulfillment_orders("gid://shopify/Order/123").await?;
//! ```

mod admin;
pub mod types;

pub use admin::{AdminClient, queries};
pub use types::*;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when interacting with Shopify Admin API.
#[derive(Debug, Error)]
pub enum AdminShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Shopify answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, as returned.
        body: String,
    },

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Authentication/authorization failed.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),

    /// The response parsed but lacked something the call depends on.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl AdminShopifyError {
    /// Build the error a mutation reports when its payload is missing.
    #[must_use]
    pub fn missing_payload(message: &str) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.to_string(),
            locations: vec![],
            path: vec![],
        }])
    }
}

/// A GraphQL error returned by the Shopify Admin API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

/// A `userErrors` entry from a mutation payload.
#[derive(Debug, Clone, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    pub field: Option<Vec<String>>,
    /// Human-readable message.
    pub message: String,
    /// Machine-readable code, on the mutations that expose one.
    #[serde(default)]
    pub code: Option<String>,
}

/// Fail with `UserError` when a mutation reported any `userErrors`.
///
/// Entries are rendered as `field.path: message` and joined with `"; "`.
///
/// # Errors
///
/// Returns `AdminShopifyError::UserError` if `user_errors` is non-empty.
pub fn check_user_errors(user_errors: &[UserError]) -> Result<(), AdminShopifyError> {
    if user_errors.is_empty() {
        return Ok(());
    }
    let error_messages: Vec<String> = user_errors
        .iter()
        .map(|e| {
            let field = e.field.as_ref().map_or_else(String::new, |f| f.join("."));
            format!("{}: {}", field, e.message)
        })
        .collect();
    Err(AdminShopifyError::UserError(error_messages.join("; ")))
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}
