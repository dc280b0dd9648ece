//! Integration tests for orderline.
//!
//! # Running Tests
//!
//! ```bash
//! # Order flows against the in-memory shop
//! cargo test -p orderline-integration-tests
//!
//! # Read-only checks against a real development store
//! cargo test -p orderline-integration-tests -- --ignored
//! ```
//!
//! [`FakeShop`] implements [`OrderApi`] in memory. It records every call in
//! order and can be told to fail specific operations, withhold the
//! draft-to-order link or delay fulfillment routing.
//!
//! Line items are kept as created (variant, quantity, unit price and per-unit
//! discount) and echoed back by order reads, with `total_price` set to the
//! discounted line subtotal. Tax, shipping and order-level discounts are not
//! folded into that total.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use orderline_admin::orders::OrderApi;
use orderline_admin::shopify::{
    AdminShopifyError, CalculatedLineItem, CalculatedOrder, DraftOrderRef, MetafieldInput,
    OrderEditAppliedDiscountInput, OrderLine, OrderRef, OrderSummary, Transaction,
};
use orderline_core::payload::draft::{DiscountValueType, DraftOrderAppliedDiscountInput};
use orderline_core::payload::{
    DraftOrderInput, OrderCreateOrderInput, RestOrderRequest, RestOrderTaxUpdate,
};
use orderline_core::{
    DraftOrderGid, FulfillmentLineSummary, FulfillmentOrderSummary, LineItemGid, OrderGid,
    Payment, RecordedTaxLine, VariantGid, round_money,
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

pub const ORDER_ID: &str = "gid://shopify/Order/5123456789";
pub const ORDER_NUMERIC_ID: u64 = 5_123_456_789;
pub const ORDER_NAME: &str = "#1001";
pub const DRAFT_ORDER_ID: &str = "gid://shopify/DraftOrder/998877";
pub const CALCULATED_ORDER_ID: &str = "gid://shopify/CalculatedOrder/42";

/// First numeric REST line item ID handed out by [`FakeShop`].
pub const FIRST_LINE_ITEM_ID: u64 = 1000;

/// One recorded Admin API call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateDraftOrder(DraftOrderInput),
    CompleteDraftOrder { id: String, payment_pending: bool },
    GetDraftOrder(String),
    CreateOrder(OrderCreateOrderInput),
    CreateRestOrder(RestOrderRequest),
    UpdateOrderTaxes(RestOrderTaxUpdate),
    GetRestOrder(u64),
    GetOrderSummary(String),
    OrderEditBegin(String),
    AddLineItemDiscount {
        calculated_order_id: String,
        line_item_id: String,
        discount: OrderEditAppliedDiscountInput,
    },
    OrderEditCommit {
        calculated_order_id: String,
        staff_note: Option<String>,
    },
    SetOrderMetafield {
        order_id: String,
        metafield: MetafieldInput,
    },
    GetFulfillmentOrders(String),
    RecordTransaction { order_id: u64, payment: Payment },
}

impl Call {
    /// The [`OrderApi`] method name.
    #[must_use]
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::CreateDraftOrder(_) => "create_draft_order",
            Self::CompleteDraftOrder { .. } => "complete_draft_order",
            Self::GetDraftOrder(_) => "get_draft_order",
            Self::CreateOrder(_) => "create_order",
            Self::CreateRestOrder(_) => "create_rest_order",
            Self::UpdateOrderTaxes(_) => "update_order_taxes",
            Self::GetRestOrder(_) => "get_rest_order",
            Self::GetOrderSummary(_) => "get_order_summary",
            Self::OrderEditBegin(_) => "order_edit_begin",
            Self::AddLineItemDiscount { .. } => "order_edit_add_line_item_discount",
            Self::OrderEditCommit { .. } => "order_edit_commit",
            Self::SetOrderMetafield { .. } => "set_order_metafield",
            Self::GetFulfillmentOrders(_) => "get_fulfillment_orders",
            Self::RecordTransaction { .. } => "record_transaction",
        }
    }
}

/// How [`FakeShop`] answers.
#[derive(Debug, Clone)]
pub struct Behavior {
    /// `draftOrderComplete` returns the created order.
    pub completion_links_order: bool,
    /// Re-reading the draft returns the created order.
    pub draft_lookup_links_order: bool,
    /// Attempt on which fulfillment orders first appear; `None` never.
    pub fulfillment_ready_on_attempt: Option<u32>,
    /// Line items in the edit session; defaults to the created order's.
    pub calculated_line_items: Option<usize>,
    /// Variant reported for every edit-session line instead of the created one.
    pub calculated_variant: Option<&'static str>,
    /// The order-level tax update answers without tax lines.
    pub ignore_order_level_taxes: bool,
    /// Operations answered with HTTP 500.
    pub failing: Vec<&'static str>,
    /// Operations answered with mutation user errors.
    pub rejecting: Vec<&'static str>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            completion_links_order: true,
            draft_lookup_links_order: true,
            fulfillment_ready_on_attempt: Some(1),
            calculated_line_items: None,
            calculated_variant: None,
            ignore_order_level_taxes: false,
            failing: Vec::new(),
            rejecting: Vec::new(),
        }
    }
}

/// A line item as the fake shop stored it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredLine {
    pub variant_id: Option<VariantGid>,
    pub quantity: u32,
    /// Unit price before line discounts.
    pub unit_price: Decimal,
    pub discount_per_unit: Decimal,
}

impl StoredLine {
    fn new(variant_id: Option<VariantGid>, quantity: u32, unit_price: &str) -> Self {
        Self {
            variant_id,
            quantity,
            unit_price: unit_price.parse().unwrap_or_default(),
            discount_per_unit: Decimal::ZERO,
        }
    }

    fn discount(&mut self, per_unit: Decimal) {
        let remaining = self.unit_price - self.discount_per_unit;
        self.discount_per_unit += per_unit.clamp(Decimal::ZERO, remaining);
    }

    fn line_total(&self) -> Decimal {
        (self.unit_price - self.discount_per_unit) * Decimal::from(self.quantity)
    }
}

/// In-memory shop that records every call.
#[derive(Debug, Default)]
pub struct FakeShop {
    behavior: Behavior,
    calls: Mutex<Vec<Call>>,
    fulfillment_attempts: AtomicU32,
    lines: Mutex<Vec<StoredLine>>,
}

impl FakeShop {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_behavior(behavior: Behavior) -> Self {
        Self {
            behavior,
            ..Self::default()
        }
    }

    /// Every call so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Operation names of every call so far, in order.
    #[must_use]
    pub fn operations(&self) -> Vec<&'static str> {
        self.calls().iter().map(Call::operation).collect()
    }

    /// Line items of the created order, with any edit-session discounts.
    #[must_use]
    pub fn stored_lines(&self) -> Vec<StoredLine> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of calls to one operation.
    #[must_use]
    pub fn count(&self, operation: &str) -> usize {
        self.operations()
            .into_iter()
            .filter(|op| *op == operation)
            .count()
    }

    fn record(&self, call: Call) -> Result<(), AdminShopifyError> {
        let operation = call.operation();
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);

        if self.behavior.failing.contains(&operation) {
            return Err(AdminShopifyError::Status {
                status: 500,
                body: "Internal Server Error".to_string(),
            });
        }
        if self.behavior.rejecting.contains(&operation) {
            return Err(AdminShopifyError::UserError(
                "lineItems.0.variantId: Variant does not exist".to_string(),
            ));
        }
        Ok(())
    }

    fn store_lines(&self, lines: Vec<StoredLine>) {
        *self.lines.lock().unwrap_or_else(PoisonError::into_inner) = lines;
    }

    fn created(&self, lines: Vec<StoredLine>) -> OrderSummary {
        self.store_lines(lines);
        let mut summary = OrderSummary::bare(OrderGid::parse(ORDER_ID), ORDER_NAME.to_string());
        self.echo_lines(&mut summary);
        summary
    }

    fn echo_lines(&self, summary: &mut OrderSummary) {
        let lines = self.stored_lines();
        summary.total_price = Some(lines.iter().map(StoredLine::line_total).sum());
        summary.line_items = lines
            .iter()
            .enumerate()
            .map(|(position, line)| OrderLine {
                id: Some(LineItemGid::from_numeric(FIRST_LINE_ITEM_ID + position as u64)),
                title: format!("Item {}", position + 1),
                quantity: line.quantity,
                unit_price: Some(line.unit_price),
            })
            .collect();
    }

    fn order_ref() -> OrderRef {
        OrderRef {
            id: OrderGid::parse(ORDER_ID),
            name: ORDER_NAME.to_string(),
        }
    }

    fn draft_ref(linked: bool) -> DraftOrderRef {
        DraftOrderRef {
            id: DraftOrderGid::parse(DRAFT_ORDER_ID),
            name: "#D12".to_string(),
            status: Some(if linked { "COMPLETED" } else { "OPEN" }.to_string()),
            order: linked.then(Self::order_ref),
        }
    }


    fn fulfillment_order() -> FulfillmentOrderSummary {
        FulfillmentOrderSummary {
            id: "gid://shopify/FulfillmentOrder/77".to_string(),
            status: "OPEN".to_string(),
            request_status: Some("UNSUBMITTED".to_string()),
            location_id: Some("gid://shopify/Location/655441491".to_string()),
            line_items: vec![FulfillmentLineSummary {
                id: "gid://shopify/FulfillmentOrderLineItem/5".to_string(),
                line_item_id: Some(format!("gid://shopify/LineItem/{FIRST_LINE_ITEM_ID}")),
                title: Some("Item 1".to_string()),
                quantity: 1,
            }],
        }
    }
}

fn calculated_line_id(position: usize) -> String {
    format!("gid://shopify/CalculatedLineItem/{}", 2000 + position)
}

fn draft_line_discount(unit_price: Decimal, discount: &DraftOrderAppliedDiscountInput) -> Decimal {
    match discount.value_type {
        DiscountValueType::Percentage => round_money(unit_price * discount.value / Decimal::ONE_HUNDRED),
        DiscountValueType::FixedAmount => discount.value,
    }
}

fn recorded_tax_line(title: &str, rate: Decimal, price: &str) -> RecordedTaxLine {
    RecordedTaxLine {
        title: title.to_string(),
        rate: rate.to_f64(),
        amount: price.parse().unwrap_or_default(),
    }
}

#[async_trait]
impl OrderApi for FakeShop {
    async fn create_draft_order(
        &self,
        input: &DraftOrderInput,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        self.record(Call::CreateDraftOrder(input.clone()))?;
        self.store_lines(
            input
                .line_items
                .iter()
                .map(|line| {
                    let mut stored = StoredLine::new(
                        Some(VariantGid::parse(&line.variant_id)),
                        line.quantity,
                        &line.original_unit_price,
                    );
                    if let Some(discount) = &line.applied_discount {
                        stored.discount(draft_line_discount(stored.unit_price, discount));
                    }
                    stored
                })
                .collect(),
        );
        Ok(Self::draft_ref(false))
    }

    async fn complete_draft_order(
        &self,
        draft_order_id: &str,
        payment_pending: bool,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        self.record(Call::CompleteDraftOrder {
            id: draft_order_id.to_string(),
            payment_pending,
        })?;
        Ok(Self::draft_ref(self.behavior.completion_links_order))
    }

    async fn get_draft_order(
        &self,
        draft_order_id: &str,
    ) -> Result<DraftOrderRef, AdminShopifyError> {
        self.record(Call::GetDraftOrder(draft_order_id.to_string()))?;
        Ok(Self::draft_ref(self.behavior.draft_lookup_links_order))
    }

    async fn create_order(
        &self,
        order: &OrderCreateOrderInput,
    ) -> Result<OrderSummary, AdminShopifyError> {
        self.record(Call::CreateOrder(order.clone()))?;
        Ok(self.created(
            order
                .line_items
                .iter()
                .map(|line| {
                    StoredLine::new(
                        Some(VariantGid::parse(&line.variant_id)),
                        line.quantity,
                        &line.price_set.shop_money.amount,
                    )
                })
                .collect(),
        ))
    }

    async fn create_rest_order(
        &self,
        request: &RestOrderRequest,
    ) -> Result<OrderSummary, AdminShopifyError> {
        self.record(Call::CreateRestOrder(request.clone()))?;
        let mut summary = self.created(
            request
                .order
                .line_items
                .iter()
                .map(|line| {
                    StoredLine::new(
                        line.variant_id.map(VariantGid::from_numeric),
                        line.quantity,
                        &line.price,
                    )
                })
                .collect(),
        );
        summary.tax_lines = request
            .order
            .tax_lines
            .iter()
            .map(|line| recorded_tax_line(&line.title, line.rate, &line.price))
            .collect();
        Ok(summary)
    }

    async fn update_order_taxes(
        &self,
        update: &RestOrderTaxUpdate,
    ) -> Result<OrderSummary, AdminShopifyError> {
        self.record(Call::UpdateOrderTaxes(update.clone()))?;
        let mut summary = OrderSummary::bare(OrderGid::parse(ORDER_ID), ORDER_NAME.to_string());
        if let Some(tax_lines) = &update.order.tax_lines
            && !self.behavior.ignore_order_level_taxes
        {
            summary.tax_lines = tax_lines
                .iter()
                .map(|line| recorded_tax_line(&line.title, line.rate, &line.price))
                .collect();
        }
        if let Some(line_items) = &update.order.line_items {
            summary.tax_lines = line_items
                .iter()
                .flat_map(|line| &line.tax_lines)
                .map(|line| recorded_tax_line(&line.title, line.rate, &line.price))
                .collect();
        }
        Ok(summary)
    }

    async fn get_rest_order(&self, order_id: u64) -> Result<OrderSummary, AdminShopifyError> {
        self.record(Call::GetRestOrder(order_id))?;
        let mut summary = OrderSummary::bare(OrderGid::from_numeric(order_id), ORDER_NAME.to_string());
        self.echo_lines(&mut summary);
        Ok(summary)
    }

    async fn get_order_summary(&self, order_id: &str) -> Result<OrderSummary, AdminShopifyError> {
        self.record(Call::GetOrderSummary(order_id.to_string()))?;
        let mut summary = OrderSummary::bare(OrderGid::parse(order_id), ORDER_NAME.to_string());
        summary.currency = Some("USD".to_string());
        self.echo_lines(&mut summary);
        Ok(summary)
    }

    async fn order_edit_begin(
        &self,
        order_id: &str,
    ) -> Result<CalculatedOrder, AdminShopifyError> {
        self.record(Call::OrderEditBegin(order_id.to_string()))?;
        let lines = self.stored_lines();
        let count = self.behavior.calculated_line_items.unwrap_or(lines.len());
        Ok(CalculatedOrder {
            id: CALCULATED_ORDER_ID.to_string(),
            line_items: (0..count)
                .map(|position| {
                    let stored = lines.get(position);
                    CalculatedLineItem {
                        id: calculated_line_id(position),
                        quantity: stored.map_or(1, |line| i64::from(line.quantity)),
                        variant_id: self
                            .behavior
                            .calculated_variant
                            .map(VariantGid::parse)
                            .or_else(|| stored.and_then(|line| line.variant_id.clone())),
                    }
                })
                .collect(),
        })
    }

    async fn order_edit_add_line_item_discount(
        &self,
        calculated_order_id: &str,
        line_item_id: &str,
        discount: &OrderEditAppliedDiscountInput,
    ) -> Result<(), AdminShopifyError> {
        self.record(Call::AddLineItemDiscount {
            calculated_order_id: calculated_order_id.to_string(),
            line_item_id: line_item_id.to_string(),
            discount: discount.clone(),
        })?;

        let mut lines = self.lines.lock().unwrap_or_else(PoisonError::into_inner);
        let position = (0..lines.len()).find(|position| calculated_line_id(*position) == line_item_id);
        if let Some(line) = position.and_then(|position| lines.get_mut(position)) {
            let per_unit = match (&discount.fixed_value, discount.percent_value) {
                (Some(fixed), _) => fixed.amount.parse::<Decimal>().unwrap_or_default(),
                (None, Some(percent)) => round_money(
                    line.unit_price * Decimal::try_from(percent).unwrap_or_default()
                        / Decimal::ONE_HUNDRED,
                ),
                (None, None) => Decimal::ZERO,
            };
            line.discount(per_unit);
        }
        Ok(())
    }

    async fn order_edit_commit(
        &self,
        calculated_order_id: &str,
        staff_note: Option<&str>,
    ) -> Result<OrderRef, AdminShopifyError> {
        self.record(Call::OrderEditCommit {
            calculated_order_id: calculated_order_id.to_string(),
            staff_note: staff_note.map(str::to_string),
        })?;
        Ok(Self::order_ref())
    }

    async fn set_order_metafield(
        &self,
        order_id: &str,
        metafield: &MetafieldInput,
    ) -> Result<(), AdminShopifyError> {
        self.record(Call::SetOrderMetafield {
            order_id: order_id.to_string(),
            metafield: metafield.clone(),
        })
    }

    async fn get_fulfillment_orders(
        &self,
        order_id: &str,
    ) -> Result<Vec<FulfillmentOrderSummary>, AdminShopifyError> {
        self.record(Call::GetFulfillmentOrders(order_id.to_string()))?;
        let attempt = self.fulfillment_attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let ready = self
            .behavior
            .fulfillment_ready_on_attempt
            .is_some_and(|ready_on| attempt >= ready_on);
        Ok(if ready {
            vec![Self::fulfillment_order()]
        } else {
            Vec::new()
        })
    }

    async fn record_transaction(
        &self,
        order_id: u64,
        payment: &Payment,
    ) -> Result<Transaction, AdminShopifyError> {
        self.record(Call::RecordTransaction {
            order_id,
            payment: payment.clone(),
        })?;
        Ok(Transaction {
            id: 389_404_469,
            kind: "sale".to_string(),
            status: "success".to_string(),
            amount: payment.amount.to_string(),
            currency: Some(payment.currency.code().to_string()),
            gateway: Some("manual".to_string()),
        })
    }
}
