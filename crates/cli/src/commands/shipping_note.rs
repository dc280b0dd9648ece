//! Shipping-note metafield management.
//!
//! # Usage
//!
//! ```bash
//! # Set the note
//! orderline shipping-note 5123456789 "Call before delivery"
//!
//! # Clear it
//! orderline shipping-note 5123456789
//! ```

use orderline_admin::shopify::{MetafieldInput, SHIPPING_NOTE_KEY, SHIPPING_NOTE_TYPE};
use orderline_core::OrderGid;
use serde::Serialize;
use tracing::{info, warn};

use super::{CommandError, connect, write_json};

const DEFINITION_NAME: &str = "Shipping note";

#[derive(Debug, Serialize)]
struct ShippingNoteState<'a> {
    order_id: &'a OrderGid,
    namespace: &'a str,
    key: &'static str,
    value: Option<String>,
}

/// Set the note when `note` has text, otherwise delete any existing note.
///
/// # Errors
///
/// Returns an error if configuration is missing or the metafield update
/// fails. A failure to create the metafield definition only logs a warning.
pub async fn run(order_id: &str, note: Option<&str>) -> Result<(), CommandError> {
    let (config, client) = connect()?;
    let order_id = OrderGid::parse(order_id);
    let namespace = config.metafield_namespace.as_str();

    if let Err(e) = client
        .ensure_metafield_definition(DEFINITION_NAME, namespace, SHIPPING_NOTE_KEY, SHIPPING_NOTE_TYPE)
        .await
    {
        warn!(error = %e, "Could not create the shipping note metafield definition");
    }

    match note.map(str::trim).filter(|note| !note.is_empty()) {
        Some(note) => {
            let metafield = MetafieldInput::shipping_note(namespace, note);
            client
                .set_order_metafield(order_id.as_str(), &metafield)
                .await?;
            info!(order_id = %order_id, "Shipping note set");
        }
        None => {
            let cleared = client
                .clear_order_metafield(order_id.as_str(), namespace, SHIPPING_NOTE_KEY)
                .await?;
            if cleared {
                info!(order_id = %order_id, "Shipping note cleared");
            } else {
                info!(order_id = %order_id, "No shipping note to clear");
            }
        }
    }

    let current = client
        .get_order_metafield(order_id.as_str(), namespace, SHIPPING_NOTE_KEY)
        .await?;
    write_json(&ShippingNoteState {
        order_id: &order_id,
        namespace,
        key: SHIPPING_NOTE_KEY,
        value: current.map(|metafield| metafield.value),
    })
}
