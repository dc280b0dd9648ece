//! Remote order creation.
//!
//! [`OrderOrchestrator`] turns an [`OrderDraft`](orderline_core::OrderDraft)
//! into a Shopify order by running one of the creation flows against an
//! [`OrderApi`]. [`AdminClient`](crate::shopify::AdminClient) is the live
//! implementation; tests supply a recording fake.
//!
//! # Flows
//!
//! - **Draft order** - create, complete, then annotate and look up routing
//! - **REST** - one `POST /orders.json` carrying custom tax lines
//! - **GraphQL** - one `orderCreate` mutation
//! - **Hybrid** - undiscounted `orderCreate`, line discounts through an edit
//!   session, then tax lines restored over REST

mod api;
mod error;
mod orchestrator;

pub use api::OrderApi;
pub use error::OrderFlowError;
pub use orchestrator::{OrchestratorOptions, OrderOrchestrator};
