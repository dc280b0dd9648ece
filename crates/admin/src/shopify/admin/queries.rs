//! GraphQL operations for the Shopify Admin API.
//!
//! Each operation is a unit struct implementing `graphql_client::GraphQLQuery`
//! plus a snake_case module holding its document, `Variables` and
//! `ResponseData`. Response types select only the fields the client reads.

use graphql_client::{GraphQLQuery, QueryBody};

/// Implement `GraphQLQuery` for an operation struct backed by its module.
macro_rules! graphql_operation {
    ($name:ident, $module:ident) => {
        pub struct $name;

        impl GraphQLQuery for $name {
            type Variables = $module::Variables;
            type ResponseData = $module::ResponseData;

            fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
                QueryBody {
                    variables,
                    query: $module::QUERY,
                    operation_name: $module::OPERATION_NAME,
                }
            }
        }
    };
}

/// Fields read back from an order after creation or on demand.
macro_rules! order_fields {
    () => {
        "id name currencyCode \
         totalPriceSet { shopMoney { amount currencyCode } } \
         totalTaxSet { shopMoney { amount currencyCode } } \
         taxLines { title rate priceSet { shopMoney { amount currencyCode } } } \
         discountApplications(first: 20) { nodes { \
           value { __typename ... on MoneyV2 { amount currencyCode } ... on PricingPercentageValue { percentage } } \
           ... on DiscountCodeApplication { code } \
           ... on ManualDiscountApplication { title } \
           ... on AutomaticDiscountApplication { title } \
           ... on ScriptDiscountApplication { title } } } \
         lineItems(first: 100) { nodes { id title quantity \
           originalUnitPriceSet { shopMoney { amount currencyCode } } } }"
    };
}

graphql_operation!(DraftOrderCreate, draft_order_create);
graphql_operation!(DraftOrderComplete, draft_order_complete);
graphql_operation!(GetDraftOrder, get_draft_order);
graphql_operation!(OrderCreate, order_create);
graphql_operation!(GetOrder, get_order);
graphql_operation!(OrderEditBegin, order_edit_begin);
graphql_operation!(OrderEditAddLineItemDiscount, order_edit_add_line_item_discount);
graphql_operation!(OrderEditCommit, order_edit_commit);
graphql_operation!(GetFulfillmentOrders, get_fulfillment_orders);
graphql_operation!(MetafieldsSet, metafields_set);
graphql_operation!(GetOrderMetafield, get_order_metafield);
graphql_operation!(MetafieldDefinitionCreate, metafield_definition_create);

// =============================================================================
// Shared response fragments
// =============================================================================

pub mod fragments {
    use serde::Deserialize;

    use crate::shopify::MoneyBag;

    /// `Order` selected by `order_fields!`.
    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderNode {
        pub id: String,
        pub name: String,
        pub currency_code: Option<String>,
        pub total_price_set: Option<MoneyBag>,
        pub total_tax_set: Option<MoneyBag>,
        #[serde(default)]
        pub tax_lines: Vec<TaxLineNode>,
        pub discount_applications: Option<Connection<DiscountApplicationNode>>,
        pub line_items: Option<Connection<LineItemNode>>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TaxLineNode {
        pub title: String,
        pub rate: Option<f64>,
        pub price_set: MoneyBag,
    }

    #[derive(Debug, Deserialize)]
    pub struct DiscountApplicationNode {
        pub value: PricingValue,
        #[serde(default)]
        pub code: Option<String>,
        #[serde(default)]
        pub title: Option<String>,
    }

    /// `PricingValue` union: money or percentage.
    #[derive(Debug, Deserialize)]
    #[serde(tag = "__typename")]
    pub enum PricingValue {
        #[serde(rename = "MoneyV2")]
        Money {
            amount: rust_decimal::Decimal,
        },
        #[serde(rename = "PricingPercentageValue")]
        Percentage { percentage: f64 },
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct LineItemNode {
        pub id: String,
        pub title: String,
        pub quantity: i64,
        pub original_unit_price_set: Option<MoneyBag>,
    }

    /// A `{ nodes [...] }` connection.
    #[derive(Debug, Deserialize)]
    pub struct Connection<T> {
        pub nodes: Vec<T>,
    }

    #[derive(Debug, Deserialize)]
    pub struct OrderRefNode {
        pub id: String,
        pub name: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct DraftOrderNode {
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub status: Option<String>,
        #[serde(default)]
        pub order: Option<OrderRefNode>,
    }
}

// =============================================================================
// Draft orders
// =============================================================================

pub mod draft_order_create {
    use orderline_core::payload::DraftOrderInput;
    use serde::{Deserialize, Serialize};

    use super::fragments::DraftOrderNode;
    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "DraftOrderCreate";
    pub const QUERY: &str = "mutation DraftOrderCreate($input: DraftOrderInput!) { \
        draftOrderCreate(input: $input) { \
          draftOrder { id name status } \
          userErrors { field message } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub input: DraftOrderInput,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub draft_order: Option<DraftOrderNode>,
        pub user_errors: Vec<UserError>,
    }
}

pub mod draft_order_complete {
    use serde::{Deserialize, Serialize};

    use super::fragments::DraftOrderNode;
    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "DraftOrderComplete";
    pub const QUERY: &str = "mutation DraftOrderComplete($id: ID!, $paymentPending: Boolean) { \
        draftOrderComplete(id: $id, paymentPending: $paymentPending) { \
          draftOrder { id name status order { id name } } \
          userErrors { field message } } }";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub id: String,
        pub payment_pending: Option<bool>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order_complete: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub draft_order: Option<DraftOrderNode>,
        pub user_errors: Vec<UserError>,
    }
}

pub mod get_draft_order {
    use serde::{Deserialize, Serialize};

    use super::fragments::DraftOrderNode;

    pub const OPERATION_NAME: &str = "GetDraftOrder";
    pub const QUERY: &str = "query GetDraftOrder($id: ID!) { \
        draftOrder(id: $id) { id name status order { id name } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub draft_order: Option<DraftOrderNode>,
    }
}

// =============================================================================
// Orders
// =============================================================================

pub mod order_create {
    use orderline_core::payload::OrderCreateOrderInput;
    use serde::{Deserialize, Serialize};

    use super::fragments::OrderNode;
    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "OrderCreate";
    pub const QUERY: &str = concat!(
        "mutation OrderCreate($order: OrderCreateOrderInput!, $options: OrderCreateOptionsInput) { ",
        "orderCreate(order: $order, options: $options) { order { ",
        order_fields!(),
        " } userErrors { field message } } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub order: OrderCreateOrderInput,
        pub options: Option<OrderCreateOptionsInput>,
    }

    /// `OrderCreateOptionsInput`.
    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderCreateOptionsInput {
        pub send_receipt: bool,
        pub send_fulfillment_receipt: bool,
        pub inventory_behaviour: &'static str,
    }

    impl Default for OrderCreateOptionsInput {
        fn default() -> Self {
            Self {
                send_receipt: false,
                send_fulfillment_receipt: false,
                inventory_behaviour: "DECREMENT_OBEYING_POLICY",
            }
        }
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub order_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub order: Option<OrderNode>,
        pub user_errors: Vec<UserError>,
    }
}

pub mod get_order {
    use serde::{Deserialize, Serialize};

    use super::fragments::OrderNode;

    pub const OPERATION_NAME: &str = "GetOrder";
    pub const QUERY: &str = concat!(
        "query GetOrder($id: ID!) { order(id: $id) { ",
        order_fields!(),
        " } }"
    );

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub order: Option<OrderNode>,
    }
}

// =============================================================================
// Order editing
// =============================================================================

pub mod order_edit_begin {
    use serde::{Deserialize, Serialize};

    use super::fragments::Connection;
    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "OrderEditBegin";
    pub const QUERY: &str = "mutation OrderEditBegin($id: ID!) { \
        orderEditBegin(id: $id) { \
          calculatedOrder { id lineItems(first: 100) { nodes { id quantity variant { id } } } } \
          userErrors { field message } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub order_edit_begin: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub calculated_order: Option<CalculatedOrderNode>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CalculatedOrderNode {
        pub id: String,
        pub line_items: Connection<CalculatedLineItemNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CalculatedLineItemNode {
        pub id: String,
        pub quantity: i64,
        pub variant: Option<VariantNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct VariantNode {
        pub id: String,
    }
}

pub mod order_edit_add_line_item_discount {
    use serde::{Deserialize, Serialize};

    use crate::shopify::{OrderEditAppliedDiscountInput, UserError};

    pub const OPERATION_NAME: &str = "OrderEditAddLineItemDiscount";
    pub const QUERY: &str = "mutation OrderEditAddLineItemDiscount($id: ID!, $lineItemId: ID!, $discount: OrderEditAppliedDiscountInput!) { \
        orderEditAddLineItemDiscount(id: $id, lineItemId: $lineItemId, discount: $discount) { \
          calculatedLineItem { id } \
          userErrors { field message } } }";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub id: String,
        pub line_item_id: String,
        pub discount: OrderEditAppliedDiscountInput,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub order_edit_add_line_item_discount: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub calculated_line_item: Option<CalculatedLineItemNode>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CalculatedLineItemNode {
        pub id: String,
    }
}

pub mod order_edit_commit {
    use serde::{Deserialize, Serialize};

    use super::fragments::OrderRefNode;
    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "OrderEditCommit";
    pub const QUERY: &str = "mutation OrderEditCommit($id: ID!, $notifyCustomer: Boolean, $staffNote: String) { \
        orderEditCommit(id: $id, notifyCustomer: $notifyCustomer, staffNote: $staffNote) { \
          order { id name } \
          userErrors { field message } } }";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub id: String,
        pub notify_customer: Option<bool>,
        pub staff_note: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub order_edit_commit: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub order: Option<OrderRefNode>,
        pub user_errors: Vec<UserError>,
    }
}

// =============================================================================
// Fulfillment
// =============================================================================

pub mod get_fulfillment_orders {
    use serde::{Deserialize, Serialize};

    use super::fragments::Connection;

    pub const OPERATION_NAME: &str = "GetFulfillmentOrders";
    pub const QUERY: &str = "query GetFulfillmentOrders($orderId: ID!) { \
        order(id: $orderId) { id \
          fulfillmentOrders(first: 10) { nodes { id status requestStatus \
            assignedLocation { location { id } } \
            lineItems(first: 50) { nodes { id remainingQuantity totalQuantity \
              lineItem { id title } } } } } } }";

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Variables {
        pub order_id: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub order: Option<OrderNode>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct OrderNode {
        pub id: String,
        pub fulfillment_orders: Connection<FulfillmentOrderNode>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FulfillmentOrderNode {
        pub id: String,
        pub status: String,
        pub request_status: Option<String>,
        pub assigned_location: Option<AssignedLocationNode>,
        pub line_items: Connection<FulfillmentLineNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct AssignedLocationNode {
        pub location: Option<LocationNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct LocationNode {
        pub id: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FulfillmentLineNode {
        pub id: String,
        pub remaining_quantity: i64,
        pub total_quantity: i64,
        pub line_item: Option<LineItemNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct LineItemNode {
        pub id: String,
        pub title: Option<String>,
    }
}

// =============================================================================
// Metafields
// =============================================================================

pub mod metafields_set {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "MetafieldsSet";
    pub const QUERY: &str = "mutation MetafieldsSet($metafields: [MetafieldsSetInput!]!) { \
        metafieldsSet(metafields: $metafields) { \
          metafields { id namespace key } \
          userErrors { field message code } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub metafields: Vec<MetafieldsSetInput>,
    }

    /// `MetafieldsSetInput`.
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldsSetInput {
        pub owner_id: String,
        pub namespace: String,
        pub key: String,
        #[serde(rename = "type")]
        pub value_type: String,
        pub value: String,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafields_set: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        #[serde(default)]
        pub metafields: Option<Vec<MetafieldNode>>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MetafieldNode {
        pub id: String,
        pub namespace: String,
        pub key: String,
    }
}

pub mod get_order_metafield {
    use serde::{Deserialize, Serialize};

    use crate::shopify::Metafield;

    pub const OPERATION_NAME: &str = "GetOrderMetafield";
    pub const QUERY: &str = "query GetOrderMetafield($id: ID!, $namespace: String!, $key: String!) { \
        order(id: $id) { id metafield(namespace: $namespace, key: $key) { id value } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub id: String,
        pub namespace: String,
        pub key: String,
    }

    #[derive(Debug, Deserialize)]
    pub struct ResponseData {
        pub order: Option<OrderNode>,
    }

    #[derive(Debug, Deserialize)]
    pub struct OrderNode {
        pub id: String,
        pub metafield: Option<Metafield>,
    }
}

pub mod metafield_definition_create {
    use serde::{Deserialize, Serialize};

    use crate::shopify::UserError;

    pub const OPERATION_NAME: &str = "MetafieldDefinitionCreate";
    pub const QUERY: &str = "mutation MetafieldDefinitionCreate($definition: MetafieldDefinitionInput!) { \
        metafieldDefinitionCreate(definition: $definition) { \
          createdDefinition { id } \
          userErrors { field message code } } }";

    #[derive(Debug, Serialize)]
    pub struct Variables {
        pub definition: MetafieldDefinitionInput,
    }

    /// `MetafieldDefinitionInput`.
    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MetafieldDefinitionInput {
        pub name: String,
        pub namespace: String,
        pub key: String,
        #[serde(rename = "type")]
        pub value_type: String,
        pub owner_type: &'static str,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ResponseData {
        pub metafield_definition_create: Option<Payload>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Payload {
        pub created_definition: Option<CreatedDefinitionNode>,
        pub user_errors: Vec<UserError>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CreatedDefinitionNode {
        pub id: String,
    }

    /// Whether every user error only says the definition already exists.
    #[must_use]
    pub fn only_already_taken(user_errors: &[UserError]) -> bool {
        !user_errors.is_empty()
            && user_errors.iter().all(|e| {
                e.code.as_deref() == Some("TAKEN")
                    || e.message.to_lowercase().contains("already been taken")
            })
    }
}
