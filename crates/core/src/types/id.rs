//! Newtype global IDs for type-safe Shopify resource references.
//!
//! Shopify identifies resources with GIDs of the form
//! `gid://shopify/{Resource}/{numeric}`. The REST surface only understands the
//! numeric tail, so every ID type can convert both ways.

/// Macro to define a type-safe Shopify GID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - `parse()` accepting either a full GID or a bare numeric ID
/// - `from_numeric()`, `numeric()` and `as_str()`
///
/// # Example
///
/// ```rust
/// # use orderline_core::define_gid;
/// define_gid!(LocationGid, "Location");
///
/// let id = LocationGid::parse("42");
/// assert_eq!(id.as_str(), "gid://shopify/Location/42");
/// assert_eq!(id.numeric(), Some(42));
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource name embedded in the GID.
            pub const RESOURCE: &'static str = $resource;

            /// Build an ID from a GID or a bare numeric ID.
            ///
            /// Strings that already start with `gid://` are kept verbatim.
            #[must_use]
            pub fn parse(raw: &str) -> Self {
                let raw = raw.trim();
                if raw.starts_with("gid://") {
                    Self(raw.to_owned())
                } else {
                    Self(format!("gid://shopify/{}/{raw}", Self::RESOURCE))
                }
            }

            /// Build an ID from the numeric REST identifier.
            #[must_use]
            pub fn from_numeric(id: u64) -> Self {
                Self(format!("gid://shopify/{}/{id}", Self::RESOURCE))
            }

            /// The numeric tail of the GID, ignoring any query string.
            #[must_use]
            pub fn numeric(&self) -> Option<u64> {
                $crate::types::id::numeric_tail(&self.0)
            }

            /// The full GID.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Extract the numeric tail of a GID such as
/// `gid://shopify/MailingAddress/12?model_name=CustomerAddress`.
#[must_use]
pub fn numeric_tail(gid: &str) -> Option<u64> {
    let path = gid.split('?').next().unwrap_or(gid);
    path.rsplit('/').next()?.parse().ok()
}

define_gid!(OrderGid, "Order");
define_gid!(DraftOrderGid, "DraftOrder");
define_gid!(VariantGid, "ProductVariant");
define_gid!(CustomerGid, "Customer");
define_gid!(LineItemGid, "LineItem");
define_gid!(FulfillmentOrderGid, "FulfillmentOrder");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        let id = VariantGid::parse("44526183104745");
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/44526183104745");
    }

    #[test]
    fn test_parse_keeps_existing_gid() {
        let id = VariantGid::parse("gid://shopify/ProductVariant/7");
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/7");
        assert_eq!(id.numeric(), Some(7));
    }

    #[test]
    fn test_from_numeric() {
        let id = OrderGid::from_numeric(5_123_456);
        assert_eq!(id.to_string(), "gid://shopify/Order/5123456");
        assert_eq!(id.numeric(), Some(5_123_456));
    }

    #[test]
    fn test_numeric_tail_ignores_query() {
        assert_eq!(
            numeric_tail("gid://shopify/MailingAddress/12?model_name=CustomerAddress"),
            Some(12)
        );
        assert_eq!(numeric_tail("gid://shopify/Order/abc"), None);
    }

    #[test]
    fn test_serde_transparent() {
        let id = OrderGid::from_numeric(1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Order/1\"");
        let back: OrderGid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
