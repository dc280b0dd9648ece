use std::fmt;

use orderline_core::builder::{Strategy, build_line_item, build_order_level_discount, classify};
use orderline_core::payload::{
    OrderCreateMode, draft_order_input, line_item_tax_update, order_create_input,
    order_tax_update, rest_order,
};
use orderline_core::{
    FulfillmentOrderSummary, OrderDraft, OrderGid, RecordedLineItem, RemoteOrderConfirmation,
};
use tracing::{info, instrument, warn};

use super::{OrderApi, OrderFlowError};
use crate::config::{DEFAULT_METAFIELD_NAMESPACE, ShopConfig};
use crate::retry::{RetryPolicy, retry_until};
use crate::shopify::{MetafieldInput, OrderEditAppliedDiscountInput, OrderSummary};

const EDIT_STAFF_NOTE: &str = "Line item discounts applied by orderline";

/// Knobs for [`OrderOrchestrator`].
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorOptions {
    /// Apply line discounts through an order edit session so the shop shows
    /// the original price struck through. Only affects orders with both tax
    /// and line-item discounts.
    pub strikethrough: bool,
    /// Namespace of the shipping-note metafield.
    pub metafield_namespace: String,
    /// Backoff for the fulfillment-order lookup after a draft completes.
    pub fulfillment_retry: RetryPolicy,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            strikethrough: false,
            metafield_namespace: DEFAULT_METAFIELD_NAMESPACE.to_string(),
            fulfillment_retry: RetryPolicy::default(),
        }
    }
}

impl OrchestratorOptions {
    /// Options carrying the shop's namespace and retry settings.
    #[must_use]
    pub fn from_config(config: &ShopConfig) -> Self {
        Self {
            strikethrough: false,
            metafield_namespace: config.metafield_namespace.clone(),
            fulfillment_retry: config.fulfillment_retry,
        }
    }

    #[must_use]
    pub fn with_strikethrough(mut self, strikethrough: bool) -> Self {
        self.strikethrough = strikethrough;
        self
    }

    /// Whether a draft classified as `strategy` goes through an order edit
    /// session.
    ///
    /// Edit sessions only take line-item discounts, so an order-level
    /// discount keeps the order on the discounted `orderCreate` path.
    #[must_use]
    pub fn uses_edit_session(&self, draft: &OrderDraft, strategy: Strategy) -> bool {
        if !self.strikethrough || strategy != Strategy::DirectWithTaxAndDiscount {
            return false;
        }
        if build_order_level_discount(draft).is_some() {
            info!("Order-level discount present, skipping the order edit session");
            return false;
        }
        draft
            .line_items
            .iter()
            .any(|item| build_line_item(item).is_discounted())
    }
}

/// Runs the creation flow for an order draft.
///
/// Required calls abort the flow with an [`OrderFlowError`]. Annotations that
/// follow creation (shipping note, payments, routing lookup, tax restoration,
/// the final summary read) are best-effort: a failure is logged and recorded
/// in the confirmation's `warnings`. Writes are never retried.
pub struct OrderOrchestrator<'a, A: OrderApi + ?Sized> {
    api: &'a A,
    options: OrchestratorOptions,
}

impl<'a, A: OrderApi + ?Sized> OrderOrchestrator<'a, A> {
    #[must_use]
    pub const fn new(api: &'a A, options: OrchestratorOptions) -> Self {
        Self { api, options }
    }

    #[must_use]
    pub const fn options(&self) -> &OrchestratorOptions {
        &self.options
    }

    /// Classify the draft and run the matching flow.
    ///
    /// # Errors
    ///
    /// Returns an error if a required Admin API call fails or the shop's
    /// response lacks something the flow depends on.
    #[instrument(skip_all, fields(line_items = draft.line_items.len()))]
    pub async fn create(
        &self,
        draft: &OrderDraft,
    ) -> Result<RemoteOrderConfirmation, OrderFlowError> {
        self.create_with_strategy(draft, classify(draft)).await
    }

    /// Run the flow for an explicitly chosen strategy.
    ///
    /// # Errors
    ///
    /// Returns `OrderFlowError::NoLineItems` for an empty draft, otherwise as
    /// [`create`](Self::create).
    #[instrument(skip_all, fields(strategy = %strategy))]
    pub async fn create_with_strategy(
        &self,
        draft: &OrderDraft,
        strategy: Strategy,
    ) -> Result<RemoteOrderConfirmation, OrderFlowError> {
        if draft.line_items.is_empty() {
            return Err(OrderFlowError::NoLineItems);
        }

        match strategy {
            Strategy::DraftOrderFlow => self.draft_order_flow(draft).await,
            Strategy::DirectWithTaxOnly => self.rest_flow(draft).await,
            Strategy::DirectWithTaxAndDiscount
                if self.options.uses_edit_session(draft, strategy) =>
            {
                self.edit_session_flow(draft).await
            }
            Strategy::DirectWithTaxAndDiscount | Strategy::DirectNoFrills => {
                self.graphql_flow(draft, strategy).await
            }
        }
    }

    // =========================================================================
    // Flows
    // =========================================================================

    #[instrument(skip_all)]
    async fn draft_order_flow(
        &self,
        draft: &OrderDraft,
    ) -> Result<RemoteOrderConfirmation, OrderFlowError> {
        let created = self.api.create_draft_order(&draft_order_input(draft)).await?;
        info!(draft_order_id = %created.id, name = %created.name, "Draft order created");

        let payment_pending = draft.payment_pending || !draft.payments.is_empty();
        let completed = self
            .api
            .complete_draft_order(created.id.as_str(), payment_pending)
            .await?;

        let order = match completed.order {
            Some(order) => order,
            None => self
                .api
                .get_draft_order(created.id.as_str())
                .await?
                .order
                .ok_or_else(|| OrderFlowError::MissingOrder {
                    draft_order_id: created.id.to_string(),
                })?,
        };
        info!(order_id = %order.id, name = %order.name, payment_pending, "Draft order completed");

        let mut warnings = Vec::new();
        self.attach_shipping_note(draft, &order.id, &mut warnings).await;
        self.record_payments(draft, &order.id, &mut warnings).await;
        let fulfillment_orders = self.await_fulfillment_orders(&order.id, &mut warnings).await;
        let summary = self
            .read_summary(OrderSummary::bare(order.id, order.name), &mut warnings)
            .await;

        let mut confirmation = confirmation(Strategy::DraftOrderFlow, summary, warnings);
        confirmation.draft_order_id = Some(created.id);
        confirmation.fulfillment_orders = fulfillment_orders;
        Ok(confirmation)
    }

    #[instrument(skip_all)]
    async fn rest_flow(&self, draft: &OrderDraft) -> Result<RemoteOrderConfirmation, OrderFlowError> {
        let created = self.api.create_rest_order(&rest_order(draft)).await?;
        info!(order_id = %created.id, name = %created.name, "Order created over REST");

        let warnings = self.annotate_direct(draft, &created.id).await;
        Ok(self
            .finish(Strategy::DirectWithTaxOnly, created, warnings)
            .await)
    }

    #[instrument(skip_all)]
    async fn graphql_flow(
        &self,
        draft: &OrderDraft,
        strategy: Strategy,
    ) -> Result<RemoteOrderConfirmation, OrderFlowError> {
        let input = order_create_input(draft, OrderCreateMode::Discounted);
        let created = self.api.create_order(&input).await?;
        info!(order_id = %created.id, name = %created.name, "Order created");

        let warnings = self.annotate_direct(draft, &created.id).await;
        Ok(self.finish(strategy, created, warnings).await)
    }

    /// Create undiscounted, discount each line inside an edit session, then
    /// put back the tax lines the edit recalculated away.
    #[instrument(skip_all)]
    async fn edit_session_flow(
        &self,
        draft: &OrderDraft,
    ) -> Result<RemoteOrderConfirmation, OrderFlowError> {
        let input = order_create_input(draft, OrderCreateMode::Undiscounted);
        let created = self.api.create_order(&input).await?;
        info!(order_id = %created.id, name = %created.name, "Order created without discounts");

        let session = self.api.order_edit_begin(created.id.as_str()).await?;
        let mut applied = 0_usize;
        for (position, item) in draft.line_items.iter().enumerate() {
            let priced = build_line_item(item);
            let Some(spec) = priced.combined_discount() else {
                continue;
            };
            let line = session
                .line_items
                .get(position)
                .filter(|line| {
                    line.variant_id
                        .as_ref()
                        .is_none_or(|variant| *variant == item.variant_id)
                })
                .ok_or_else(|| OrderFlowError::EditLineMismatch {
                    order_id: created.id.to_string(),
                    position,
                })?;
            let discount =
                OrderEditAppliedDiscountInput::from_spec(&spec, draft.currency, priced.discount_summary);
            self.api
                .order_edit_add_line_item_discount(&session.id, &line.id, &discount)
                .await?;
            applied += 1;
        }

        let committed = self
            .api
            .order_edit_commit(&session.id, Some(EDIT_STAFF_NOTE))
            .await?;
        info!(order_id = %committed.id, discounts = applied, "Order edit committed");

        let mut warnings = Vec::new();
        self.restore_tax_lines(draft, &created.id, &mut warnings).await;
        warnings.extend(self.annotate_direct(draft, &created.id).await);
        Ok(self
            .finish(Strategy::DirectWithTaxAndDiscount, created, warnings)
            .await)
    }

    // =========================================================================
    // Best-effort steps
    // =========================================================================

    /// Shipping note, then payments when the order was created pending.
    async fn annotate_direct(&self, draft: &OrderDraft, order_id: &OrderGid) -> Vec<String> {
        let mut warnings = Vec::new();
        self.attach_shipping_note(draft, order_id, &mut warnings).await;
        if draft.payment_pending {
            self.record_payments(draft, order_id, &mut warnings).await;
        }
        warnings
    }

    async fn finish(
        &self,
        strategy: Strategy,
        created: OrderSummary,
        mut warnings: Vec<String>,
    ) -> RemoteOrderConfirmation {
        let summary = self.read_summary(created, &mut warnings).await;
        confirmation(strategy, summary, warnings)
    }

    async fn attach_shipping_note(
        &self,
        draft: &OrderDraft,
        order_id: &OrderGid,
        warnings: &mut Vec<String>,
    ) {
        let Some(note) = draft
            .shipping_note
            .as_deref()
            .map(str::trim)
            .filter(|note| !note.is_empty())
        else {
            return;
        };

        let metafield = MetafieldInput::shipping_note(&self.options.metafield_namespace, note);
        match self.api.set_order_metafield(order_id.as_str(), &metafield).await {
            Ok(()) => info!(namespace = %metafield.namespace, "Shipping note attached"),
            Err(e) => note_failure(warnings, "shipping note", &e),
        }
    }

    async fn record_payments(
        &self,
        draft: &OrderDraft,
        order_id: &OrderGid,
        warnings: &mut Vec<String>,
    ) {
        if draft.payments.is_empty() {
            return;
        }
        let Some(numeric_id) = order_id.numeric() else {
            let error = OrderFlowError::NonNumericOrderId {
                order_id: order_id.to_string(),
            };
            note_failure(warnings, "payment transactions", &error);
            return;
        };

        for payment in &draft.payments {
            match self.api.record_transaction(numeric_id, payment).await {
                Ok(transaction) => {
                    info!(transaction_id = transaction.id, amount = %payment.amount, "Payment recorded");
                }
                Err(e) => note_failure(warnings, "payment transaction", &e),
            }
        }
    }

    /// Poll until Shopify has routed the order to at least one location.
    async fn await_fulfillment_orders(
        &self,
        order_id: &OrderGid,
        warnings: &mut Vec<String>,
    ) -> Vec<FulfillmentOrderSummary> {
        let policy = &self.options.fulfillment_retry;
        let outcome = retry_until(
            policy,
            || self.api.get_fulfillment_orders(order_id.as_str()),
            |orders: &Vec<FulfillmentOrderSummary>| !orders.is_empty(),
        )
        .await;

        match outcome {
            Ok(orders) if orders.is_empty() => {
                let message = format!(
                    "fulfillment routing not complete after {} attempts",
                    policy.max_attempts
                );
                warn!(order_id = %order_id, "{message}");
                warnings.push(message);
                orders
            }
            Ok(orders) => {
                info!(count = orders.len(), "Fulfillment orders found");
                orders
            }
            Err(e) => {
                note_failure(warnings, "fulfillment lookup", &e);
                Vec::new()
            }
        }
    }

    /// Restore order-level tax lines over REST, falling back to per-line
    /// portions when the order-level update records nothing.
    async fn restore_tax_lines(
        &self,
        draft: &OrderDraft,
        order_id: &OrderGid,
        warnings: &mut Vec<String>,
    ) {
        if draft.used_tax_lines().next().is_none() {
            if draft.has_item_tax_lines() {
                note_failure(
                    warnings,
                    "tax restoration",
                    &"item-level tax lines are not restored after an order edit",
                );
            }
            return;
        }
        let Some(numeric_id) = order_id.numeric() else {
            let error = OrderFlowError::NonNumericOrderId {
                order_id: order_id.to_string(),
            };
            note_failure(warnings, "tax restoration", &error);
            return;
        };

        match self
            .api
            .update_order_taxes(&order_tax_update(numeric_id, draft))
            .await
        {
            Ok(updated) if !updated.tax_lines.is_empty() => {
                info!(tax_lines = updated.tax_lines.len(), "Order tax lines restored");
                return;
            }
            Ok(_) => info!("Order-level tax update recorded no tax lines, trying line items"),
            Err(e) => {
                note_failure(warnings, "tax restoration", &e);
                return;
            }
        }

        let remote = match self.api.get_rest_order(numeric_id).await {
            Ok(remote) => remote,
            Err(e) => {
                note_failure(warnings, "tax restoration", &e);
                return;
            }
        };
        let update = line_item_tax_update(numeric_id, draft, &remote.line_item_numeric_ids());
        match self.api.update_order_taxes(&update).await {
            Ok(updated) if !updated.tax_lines.is_empty() => {
                info!(tax_lines = updated.tax_lines.len(), "Line item tax lines restored");
            }
            Ok(_) => note_failure(warnings, "tax restoration", &"Shopify recorded no tax lines"),
            Err(e) => note_failure(warnings, "tax restoration", &e),
        }
    }

    /// Re-read the order; on failure keep what the creating call returned.
    async fn read_summary(&self, fallback: OrderSummary, warnings: &mut Vec<String>) -> OrderSummary {
        match self.api.get_order_summary(fallback.id.as_str()).await {
            Ok(summary) => summary,
            Err(e) => {
                note_failure(warnings, "order summary", &e);
                fallback
            }
        }
    }
}

fn note_failure(warnings: &mut Vec<String>, step: &str, error: &dyn fmt::Display) {
    warn!(step, error = %error, "Best-effort step failed");
    warnings.push(format!("{step}: {error}"));
}

fn confirmation(
    strategy: Strategy,
    summary: OrderSummary,
    warnings: Vec<String>,
) -> RemoteOrderConfirmation {
    let OrderSummary {
        id,
        name,
        order_number,
        total_price,
        total_tax,
        currency,
        tax_lines,
        discounts,
        line_items,
    } = summary;

    RemoteOrderConfirmation {
        strategy,
        order_id: id,
        name,
        order_number,
        total_price,
        total_tax,
        currency,
        tax_lines,
        discounts,
        line_items: line_items.iter().map(RecordedLineItem::from).collect(),
        draft_order_id: None,
        fulfillment_orders: Vec::new(),
        warnings,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use orderline_core::{LineItemGid, RecordedTaxLine};
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    use super::*;
    use crate::shopify::OrderLine;

    #[test]
    fn test_options_from_config() {
        let config = ShopConfig {
            store: "orderline-dev.myshopify.com".to_string(),
            api_version: "2025-10".to_string(),
            access_token: SecretString::from("shpat_9f2c1b7e4d8a3f6e0b5c"),
            timeout: Duration::from_secs(30),
            metafield_namespace: "fulfilment".to_string(),
            fulfillment_retry: RetryPolicy::once(),
        };

        let options = OrchestratorOptions::from_config(&config).with_strikethrough(true);
        assert!(options.strikethrough);
        assert_eq!(options.metafield_namespace, "fulfilment");
        assert_eq!(options.fulfillment_retry, RetryPolicy::once());
    }

    #[test]
    fn test_default_options() {
        let options = OrchestratorOptions::default();
        assert!(!options.strikethrough);
        assert_eq!(options.metafield_namespace, "orderline");
        assert_eq!(options.fulfillment_retry.max_attempts, 5);
    }

    #[test]
    fn test_edit_session_needs_strikethrough_and_line_discounts() {
        use orderline_core::{DiscountSpec, LineItem, TaxLineSpec, VariantGid};

        let mut item = LineItem::new(VariantGid::parse("321"), 2, Decimal::new(5000, 2));
        item.discounts
            .push(DiscountSpec::percentage("Summer", Decimal::TEN));
        let mut draft = OrderDraft {
            line_items: vec![item],
            tax_lines: vec![TaxLineSpec::new("VAT", None, Some(Decimal::new(1800, 2)))],
            ..OrderDraft::default()
        };
        let strategy = classify(&draft);
        let on = OrchestratorOptions::default().with_strikethrough(true);

        assert!(on.uses_edit_session(&draft, strategy));
        assert!(!OrchestratorOptions::default().uses_edit_session(&draft, strategy));
        assert!(!on.uses_edit_session(&draft, Strategy::DirectNoFrills));

        draft
            .discounts
            .push(DiscountSpec::fixed_amount("Welcome", Decimal::ONE));
        assert!(!on.uses_edit_session(&draft, strategy));
    }

    #[test]
    fn test_confirmation_from_summary() {
        let summary = OrderSummary {
            id: OrderGid::from_numeric(1001),
            name: "#1001".to_string(),
            order_number: Some(1001),
            total_price: Some("108.50".parse().unwrap()),
            total_tax: Some("8.50".parse().unwrap()),
            currency: Some("USD".to_string()),
            tax_lines: vec![RecordedTaxLine {
                title: "VAT".to_string(),
                rate: Some(0.085),
                amount: "8.50".parse().unwrap(),
            }],
            discounts: vec![],
            line_items: vec![OrderLine {
                id: Some(LineItemGid::from_numeric(7)),
                title: "Linen Tee".to_string(),
                quantity: 2,
                unit_price: Some(Decimal::from(50)),
            }],
        };

        let confirmation = confirmation(
            Strategy::DirectWithTaxOnly,
            summary,
            vec!["shipping note: HTTP 500: oops".to_string()],
        );

        assert_eq!(confirmation.order_id.as_str(), "gid://shopify/Order/1001");
        assert_eq!(confirmation.total_quantity(), 2);
        assert_eq!(confirmation.recorded_tax_total(), "8.50".parse().unwrap());
        assert_eq!(confirmation.line_items[0].title, "Linen Tee");
        assert!(confirmation.draft_order_id.is_none());
        assert_eq!(confirmation.warnings.len(), 1);
    }

    #[test]
    fn test_note_failure_prefixes_step() {
        let mut warnings = Vec::new();
        note_failure(&mut warnings, "fulfillment lookup", &"timed out");
        assert_eq!(warnings, vec!["fulfillment lookup: timed out".to_string()]);
    }
}
