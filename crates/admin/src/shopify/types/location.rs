//! Location domain types.

use serde::{Deserialize, Serialize};

/// A shop location, as listed by `GET /locations.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Numeric location ID.
    pub id: u64,
    /// Location name.
    pub name: String,
    /// Whether the location can fulfill orders.
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub address1: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
}

impl Location {
    /// One-line description for listings.
    #[must_use]
    pub fn describe(&self) -> String {
        let place = [self.city.as_deref(), self.country_code.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        let status = if self.active { "active" } else { "inactive" };
        if place.is_empty() {
            format!("{} ({}) [{status}]", self.name, self.id)
        } else {
            format!("{} ({}) - {place} [{status}]", self.name, self.id)
        }
    }
}
