//! Metafield operations for the Admin API.

use orderline_core::numeric_tail;
use tracing::instrument;

use super::{
    AdminClient, AdminShopifyError,
    queries::{
        GetOrderMetafield, MetafieldDefinitionCreate, MetafieldsSet,
        metafield_definition_create::{MetafieldDefinitionInput, only_already_taken},
        metafields_set::MetafieldsSetInput,
    },
};
use crate::shopify::{
    check_user_errors,
    types::{Metafield, MetafieldInput},
};

impl AdminClient {
    /// Set a metafield on an order, creating or overwriting it.
    ///
    /// # Arguments
    ///
    /// * `order_id` - Shopify order ID
    /// * `metafield` - Namespace, key, type and value
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns user errors.
    #[instrument(skip(self, metafield), fields(order_id = %order_id, key = %metafield.key))]
    pub async fn set_order_metafield(
        &self,
        order_id: &str,
        metafield: &MetafieldInput,
    ) -> Result<(), AdminShopifyError> {
        let variables = super::queries::metafields_set::Variables {
            metafields: vec![MetafieldsSetInput {
                owner_id: order_id.to_string(),
                namespace: metafield.namespace.clone(),
                key: metafield.key.clone(),
                value_type: metafield.value_type.clone(),
                value: metafield.value.clone(),
            }],
        };

        let response = self.execute::<MetafieldsSet>(variables).await?;

        if let Some(payload) = response.metafields_set {
            check_user_errors(&payload.user_errors)?;
            return Ok(());
        }

        Err(AdminShopifyError::missing_payload("Metafields set failed"))
    }

    /// Get one metafield of an order.
    ///
    /// Returns `Ok(None)` if the order has no such metafield.
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::NotFound` if the order does not exist.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_order_metafield(
        &self,
        order_id: &str,
        namespace: &str,
        key: &str,
    ) -> Result<Option<Metafield>, AdminShopifyError> {
        let variables = super::queries::get_order_metafield::Variables {
            id: order_id.to_string(),
            namespace: namespace.to_string(),
            key: key.to_string(),
        };

        let response = self.execute::<GetOrderMetafield>(variables).await?;

        response
            .order
            .map(|order| order.metafield)
            .ok_or_else(|| AdminShopifyError::NotFound(format!("Order {order_id}")))
    }

    /// Delete a metafield with `DELETE /metafields/{id}.json`.
    ///
    /// # Arguments
    ///
    /// * `metafield_id` - Metafield GID or numeric ID
    ///
    /// # Errors
    ///
    /// Returns an error if the ID is not numeric or the request fails.
    #[instrument(skip(self), fields(metafield_id = %metafield_id))]
    pub async fn delete_metafield(&self, metafield_id: &str) -> Result<(), AdminShopifyError> {
        let numeric = numeric_tail(metafield_id).ok_or_else(|| {
            AdminShopifyError::UnexpectedResponse(format!(
                "Metafield ID without numeric tail: {metafield_id}"
            ))
        })?;
        self.rest_delete(&format!("/metafields/{numeric}.json")).await
    }

    /// Remove an order metafield if it exists.
    ///
    /// Returns whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup or the delete fails.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn clear_order_metafield(
        &self,
        order_id: &str,
        namespace: &str,
        key: &str,
    ) -> Result<bool, AdminShopifyError> {
        match self.get_order_metafield(order_id, namespace, key).await? {
            Some(metafield) => {
                self.delete_metafield(&metafield.id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Create an order metafield definition so the field shows in the admin.
    ///
    /// A definition that already exists counts as success.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns other user errors.
    #[instrument(skip(self))]
    pub async fn ensure_metafield_definition(
        &self,
        name: &str,
        namespace: &str,
        key: &str,
        value_type: &str,
    ) -> Result<(), AdminShopifyError> {
        let variables = super::queries::metafield_definition_create::Variables {
            definition: MetafieldDefinitionInput {
                name: name.to_string(),
                namespace: namespace.to_string(),
                key: key.to_string(),
                value_type: value_type.to_string(),
                owner_type: "ORDER",
            },
        };

        let response = self.execute::<MetafieldDefinitionCreate>(variables).await?;

        if let Some(payload) = response.metafield_definition_create {
            if only_already_taken(&payload.user_errors) {
                tracing::debug!(namespace, key, "Metafield definition already exists");
                return Ok(());
            }
            check_user_errors(&payload.user_errors)?;
            return Ok(());
        }

        Err(AdminShopifyError::missing_payload(
            "Metafield definition create failed",
        ))
    }
}
