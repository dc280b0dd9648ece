//! Orderline CLI - create Shopify orders from a local description.
//!
//! # Usage
//!
//! ```bash
//! # Create the order described in ./input.json
//! orderline create-order
//!
//! # Show the chosen strategy and request body without calling Shopify
//! orderline create-order orders/wholesale.json --dry-run
//!
//! # Apply line discounts through an order edit so prices show struck through
//! orderline create-order --strikethrough
//!
//! # Set or clear an order's shipping note
//! orderline shipping-note 5123456789 "Leave at the loading dock"
//! orderline shipping-note 5123456789
//!
//! # Inspect an order
//! orderline order 5123456789
//! orderline fulfillment-orders 5123456789
//! orderline locations
//! ```
//!
//! # Commands
//!
//! - `create-order` - Create an order from an `input.json` file
//! - `shipping-note` - Set or clear the shipping-note metafield
//! - `order` - Show what the shop recorded for an order
//! - `fulfillment-orders` - Show an order's fulfillment routing
//! - `locations` - List the shop's locations

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "orderline")]
#[command(author, version, about = "Create and inspect Shopify orders")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an order from an input file
    CreateOrder {
        /// Order description
        #[arg(default_value = "input.json")]
        input: PathBuf,

        /// Apply line discounts through an order edit session
        #[arg(long)]
        strikethrough: bool,

        /// Print the strategy and request body without calling Shopify
        #[arg(long)]
        dry_run: bool,
    },
    /// Set an order's shipping note, or clear it when NOTE is omitted
    ShippingNote {
        /// Order ID (numeric or GID)
        order_id: String,

        /// Note text
        note: Option<String>,
    },
    /// Show an order's fulfillment orders
    FulfillmentOrders {
        /// Order ID (numeric or GID)
        order_id: String,
    },
    /// Show an order's totals, tax lines, discounts and line items
    Order {
        /// Order ID (numeric or GID)
        order_id: String,
    },
    /// List the shop's locations
    Locations,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    if let Err(e) = run(cli.command).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    // Logs go to stderr so stdout stays parseable JSON
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(command: Commands) -> Result<(), commands::CommandError> {
    match command {
        Commands::CreateOrder {
            input,
            strikethrough,
            dry_run,
        } => commands::order::create(&input, strikethrough, dry_run).await,
        Commands::ShippingNote { order_id, note } => {
            commands::shipping_note::run(&order_id, note.as_deref()).await
        }
        Commands::FulfillmentOrders { order_id } => {
            commands::fulfillment::fulfillment_orders(&order_id).await
        }
        Commands::Order { order_id } => commands::order::show(&order_id).await,
        Commands::Locations => commands::fulfillment::locations().await,
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_create_order_defaults() {
        let cli = Cli::parse_from(["orderline", "create-order"]);
        match cli.command {
            Commands::CreateOrder {
                input,
                strikethrough,
                dry_run,
            } => {
                assert_eq!(input, PathBuf::from("input.json"));
                assert!(!strikethrough);
                assert!(!dry_run);
            }
            _ => panic!("expected create-order"),
        }
    }

    #[test]
    fn test_shipping_note_without_note_clears() {
        let cli = Cli::parse_from(["orderline", "--json", "shipping-note", "5123456789"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::ShippingNote { note: None, .. }
        ));
    }
}
