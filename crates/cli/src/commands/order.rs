//! Order creation and lookup.
//!
//! # Usage
//!
//! ```bash
//! orderline create-order input.json
//! orderline create-order input.json --dry-run
//! orderline order 5123456789
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPIFY_SHOP_DOMAIN` - Shop domain (e.g., `my-shop.myshopify.com`)
//! - `SHOPIFY_API_SECRET` - Admin API access token
//! - `ORDERLINE_METAFIELD_NAMESPACE` - Namespace for the shipping note

use std::fs;
use std::path::Path;

use orderline_admin::orders::{OrchestratorOptions, OrderOrchestrator};
use orderline_core::builder::{
    LineItemTaxPortion, PricedLineItem, Strategy, build_line_item, build_order_level_discount,
    classify, distribute_tax,
};
use orderline_core::input::parse_order_input;
use orderline_core::payload::{
    DraftOrderInput, OrderCreateMode, OrderCreateOrderInput, RestOrderRequest, draft_order_input,
    order_create_input, rest_order,
};
use orderline_core::{DiscountSpec, OrderDraft, OrderGid, RemoteOrderConfirmation};
use serde::Serialize;
use tracing::{info, warn};

use super::{CommandError, connect, write_json};

/// What `--dry-run` prints: the decision and the body that would be sent.
#[derive(Debug, Serialize)]
struct Preview {
    strategy: Strategy,
    edit_session: bool,
    line_items: Vec<PricedLineItem>,
    order_discount: Option<DiscountSpec>,
    tax_portions: Vec<LineItemTaxPortion>,
    payload: PreviewPayload,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum PreviewPayload {
    DraftOrder(DraftOrderInput),
    Rest(RestOrderRequest),
    OrderCreate(OrderCreateOrderInput),
}

/// Create the order described by `input`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, configuration is
/// missing, or a required Shopify call fails.
pub async fn create(input: &Path, strikethrough: bool, dry_run: bool) -> Result<(), CommandError> {
    let raw = fs::read_to_string(input).map_err(|source| CommandError::ReadInput {
        path: input.to_path_buf(),
        source,
    })?;
    let draft = parse_order_input(&raw)?;
    let strategy = classify(&draft);
    info!(
        strategy = %strategy,
        line_items = draft.line_items.len(),
        "Order classified"
    );

    if dry_run {
        return write_json(&preview(&draft, strategy, strikethrough));
    }

    let (config, client) = connect()?;
    let options = OrchestratorOptions::from_config(&config).with_strikethrough(strikethrough);
    let confirmation = OrderOrchestrator::new(&client, options)
        .create_with_strategy(&draft, strategy)
        .await?;

    log_confirmation(&confirmation);
    write_json(&confirmation)
}

/// Show what the shop recorded for an order.
///
/// # Errors
///
/// Returns an error if configuration is missing or the lookup fails.
pub async fn show(order_id: &str) -> Result<(), CommandError> {
    let (_, client) = connect()?;
    let order_id = OrderGid::parse(order_id);
    let summary = client.get_order_summary(order_id.as_str()).await?;

    info!(
        name = %summary.name,
        total_price = ?summary.total_price,
        total_tax = ?summary.total_tax,
        currency = ?summary.currency,
        "Order found"
    );
    for line in &summary.tax_lines {
        info!(title = %line.title, rate = ?line.rate, amount = %line.amount, "Tax line");
    }
    write_json(&summary)
}

fn preview(draft: &OrderDraft, strategy: Strategy, strikethrough: bool) -> Preview {
    let line_items: Vec<PricedLineItem> = draft.line_items.iter().map(build_line_item).collect();
    let order_discount = build_order_level_discount(draft);
    let edit_session = OrchestratorOptions::default()
        .with_strikethrough(strikethrough)
        .uses_edit_session(draft, strategy);

    let payload = match strategy {
        Strategy::DraftOrderFlow => PreviewPayload::DraftOrder(draft_order_input(draft)),
        Strategy::DirectWithTaxOnly => PreviewPayload::Rest(rest_order(draft)),
        Strategy::DirectWithTaxAndDiscount if edit_session => {
            PreviewPayload::OrderCreate(order_create_input(draft, OrderCreateMode::Undiscounted))
        }
        Strategy::DirectWithTaxAndDiscount | Strategy::DirectNoFrills => {
            PreviewPayload::OrderCreate(order_create_input(draft, OrderCreateMode::Discounted))
        }
    };

    Preview {
        strategy,
        edit_session,
        line_items,
        order_discount,
        tax_portions: distribute_tax(draft),
        payload,
    }
}

fn log_confirmation(confirmation: &RemoteOrderConfirmation) {
    info!(
        name = %confirmation.name,
        order_id = %confirmation.order_id,
        strategy = %confirmation.strategy,
        "Order created"
    );
    if let Some(draft_order_id) = &confirmation.draft_order_id {
        info!(draft_order_id = %draft_order_id, "Completed from draft order");
    }
    info!(
        total_price = ?confirmation.total_price,
        total_tax = ?confirmation.total_tax,
        currency = ?confirmation.currency,
        items = confirmation.total_quantity(),
        "Totals"
    );
    for line in &confirmation.tax_lines {
        info!(title = %line.title, rate = ?line.rate, amount = %line.amount, "Tax line");
    }
    for discount in &confirmation.discounts {
        info!(label = %discount.label, amount = ?discount.amount, percentage = ?discount.percentage, "Discount");
    }
    for fulfillment_order in &confirmation.fulfillment_orders {
        info!(
            id = %fulfillment_order.id,
            status = %fulfillment_order.status,
            location_id = ?fulfillment_order.location_id,
            "Fulfillment order"
        );
    }
    for warning in &confirmation.warnings {
        warn!("{warning}");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DISCOUNTED_WITH_TAX: &str = r#"{
        "order": {
            "email": "ada@example.com",
            "items": [
                {"productId": "321", "quantity": 2, "price": "50.00",
                 "discountApplications": [{"title": "Summer", "valueType": "percentage", "value": 10}]}
            ],
            "taxLines": [{"title": "VAT", "rate": 0.2, "price": "18.00"}]
        }
    }"#;

    #[test]
    fn test_preview_uses_edit_session_only_when_asked() {
        let draft = parse_order_input(DISCOUNTED_WITH_TAX).unwrap();
        let strategy = classify(&draft);
        assert_eq!(strategy, Strategy::DirectWithTaxAndDiscount);

        assert!(!preview(&draft, strategy, false).edit_session);
        let preview = preview(&draft, strategy, true);
        assert!(preview.edit_session);
        assert!(matches!(preview.payload, PreviewPayload::OrderCreate(_)));
        assert_eq!(preview.tax_portions.len(), 1);
    }
}
