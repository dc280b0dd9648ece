//! Fulfillment routing and location lookups.

use orderline_core::OrderGid;
use tracing::info;

use super::{CommandError, connect, write_json};

/// Show an order's fulfillment orders.
///
/// # Errors
///
/// Returns an error if configuration is missing or the lookup fails.
pub async fn fulfillment_orders(order_id: &str) -> Result<(), CommandError> {
    let (_, client) = connect()?;
    let order_id = OrderGid::parse(order_id);
    let orders = client.get_fulfillment_orders(order_id.as_str()).await?;

    if orders.is_empty() {
        info!(order_id = %order_id, "No fulfillment orders yet");
    }
    for order in &orders {
        let quantity: i64 = order.line_items.iter().map(|line| line.quantity).sum();
        info!(
            id = %order.id,
            status = %order.status,
            request_status = ?order.request_status,
            location_id = ?order.location_id,
            quantity,
            "Fulfillment order"
        );
    }
    write_json(&orders)
}

/// List the shop's locations.
///
/// # Errors
///
/// Returns an error if configuration is missing or the request fails.
pub async fn locations() -> Result<(), CommandError> {
    let (_, client) = connect()?;
    let locations = client.list_locations().await?;

    for location in &locations {
        info!("{}", location.describe());
    }
    write_json(&locations)
}
