//! Metafield domain types.

use serde::{Deserialize, Serialize};

/// Key of the order metafield that carries the shipping note.
pub const SHIPPING_NOTE_KEY: &str = "shipping_note";

/// Metafield type used for the shipping note.
pub const SHIPPING_NOTE_TYPE: &str = "multi_line_text_field";

/// Input for setting one metafield on an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetafieldInput {
    /// Metafield namespace.
    pub namespace: String,
    /// Metafield key.
    pub key: String,
    /// Metafield type (e.g., `multi_line_text_field`).
    #[serde(rename = "type")]
    pub value_type: String,
    /// Value as a string.
    pub value: String,
}

impl MetafieldInput {
    /// Shipping note metafield in `namespace`.
    #[must_use]
    pub fn shipping_note(namespace: &str, note: &str) -> Self {
        Self {
            namespace: namespace.to_string(),
            key: SHIPPING_NOTE_KEY.to_string(),
            value_type: SHIPPING_NOTE_TYPE.to_string(),
            value: note.to_string(),
        }
    }
}

/// A metafield read back from the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metafield {
    /// Metafield GID.
    pub id: String,
    /// Current value.
    pub value: String,
}
