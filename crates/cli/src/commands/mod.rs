//! Subcommand implementations.
//!
//! Each command loads [`ShopConfig`] from the environment, talks to the shop
//! through [`AdminClient`], logs a human-readable summary and writes the full
//! result to stdout as pretty JSON.

use std::io::{self, Write};
use std::path::PathBuf;

use orderline_admin::config::{ConfigError, ShopConfig};
use orderline_admin::orders::OrderFlowError;
use orderline_admin::shopify::{AdminClient, AdminShopifyError};
use orderline_core::input::InputError;
use serde::Serialize;
use thiserror::Error;

pub mod fulfillment;
pub mod order;
pub mod shipping_note;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Environment configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The input file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: io::Error,
    },

    /// The input file is not a usable order.
    #[error(transparent)]
    Input(#[from] InputError),

    /// An Admin API call failed.
    #[error(transparent)]
    Shopify(#[from] AdminShopifyError),

    /// Order creation failed.
    #[error(transparent)]
    OrderFlow(#[from] OrderFlowError),

    /// Writing the result failed.
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Load configuration and build the Admin API client.
fn connect() -> Result<(ShopConfig, AdminClient), CommandError> {
    let config = ShopConfig::from_env()?;
    tracing::debug!(store = %config.store, api_version = %config.api_version, "Configuration loaded");
    let client = AdminClient::new(&config)?;
    Ok((config, client))
}

/// Write `value` to stdout as pretty JSON.
fn write_json<T: Serialize>(value: &T) -> Result<(), CommandError> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_input_error_names_path() {
        let err = CommandError::ReadInput {
            path: PathBuf::from("orders/missing.json"),
            source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to read orders/missing.json: No such file or directory"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = CommandError::from(ConfigError::MissingEnvVar("SHOPIFY_SHOP_DOMAIN".to_string()));
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing environment variable: SHOPIFY_SHOP_DOMAIN"
        );
    }
}
