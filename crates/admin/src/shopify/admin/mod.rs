//! Shopify Admin API client.
//!
//! GraphQL requests go through [`AdminClient::execute`]; the few calls that
//! only exist on the REST surface go through the `rest_*` helpers. Both share
//! one `reqwest::Client`, the access token header and status handling.

use std::sync::Arc;

use graphql_client::GraphQLQuery;
use reqwest::{Method, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::instrument;

use crate::config::ShopConfig;

use super::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod conversions;
mod draft_orders;
mod fulfillment;
mod locations;
mod metafields;
mod order_editing;
mod orders;
pub mod queries;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Shopify Admin API client.
///
/// Cheap to clone; clones share the HTTP connection pool.
///
/// # Security
///
/// Holds the Admin API access token, which can create and edit orders.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    graphql_endpoint: String,
    rest_base: String,
    store: String,
    access_token: SecretString,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("store", &self.inner.store)
            .field("graphql_endpoint", &self.inner.graphql_endpoint)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shop configuration (domain, API version, token, timeout)
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ShopConfig) -> Result<Self, AdminShopifyError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("orderline/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config))
    }

    /// Create a client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &ShopConfig) -> Self {
        Self {
            inner: Arc::new(AdminClientInner {
                client,
                graphql_endpoint: config.graphql_endpoint(),
                rest_base: config.rest_base(),
                store: config.store.clone(),
                access_token: config.access_token.clone(),
            }),
        }
    }

    /// Get the store domain.
    #[must_use]
    pub fn store(&self) -> &str {
        &self.inner.store
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL query.
    #[instrument(skip(self, variables), fields(operation = std::any::type_name::<Q>()))]
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.graphql_endpoint)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let response = check_status(response, &self.inner.graphql_endpoint).await?;
        let graphql_response: GraphQLResponse<Q::ResponseData> = response.json().await?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let converted_errors: Vec<GraphQLError> = errors
                .into_iter()
                .map(|e| GraphQLError {
                    message: e.message,
                    locations: e
                        .locations
                        .into_iter()
                        .map(|l| GraphQLErrorLocation {
                            line: l.line,
                            column: l.column,
                        })
                        .collect(),
                    path: e.path,
                })
                .collect();
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .ok_or_else(|| AdminShopifyError::missing_payload("No data in response"))
    }

    // =========================================================================
    // REST Execution
    // =========================================================================

    /// Send a REST request and decode the JSON response.
    ///
    /// `path` is relative to `/admin/api/{version}` and starts with `/`.
    async fn rest_request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, AdminShopifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{path}", self.inner.rest_base);
        let mut request = self
            .inner
            .client
            .request(method, &url)
            .header(ACCESS_TOKEN_HEADER, self.inner.access_token.expose_secret())
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = check_status(request.send().await?, path).await?;
        let text = response.text().await?;
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }

    async fn rest_get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AdminShopifyError> {
        self.rest_request::<(), T>(Method::GET, path, None).await
    }

    async fn rest_post<B, T>(&self, path: &str, body: &B) -> Result<T, AdminShopifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rest_request(Method::POST, path, Some(body)).await
    }

    async fn rest_put<B, T>(&self, path: &str, body: &B) -> Result<T, AdminShopifyError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.rest_request(Method::PUT, path, Some(body)).await
    }

    async fn rest_delete(&self, path: &str) -> Result<(), AdminShopifyError> {
        self.rest_request::<(), serde_json::Value>(Method::DELETE, path, None)
            .await
            .map(|_| ())
    }
}

/// Map rate limiting, auth failures and other non-success statuses to errors.
async fn check_status(response: Response, target: &str) -> Result<Response, AdminShopifyError> {
    let status = response.status();

    // Check for rate limiting
    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after)
            .unwrap_or(60);
        return Err(AdminShopifyError::RateLimited(retry_after));
    }

    // Check for unauthorized
    if status == StatusCode::UNAUTHORIZED {
        return Err(AdminShopifyError::Unauthorized(
            "Invalid or expired access token".to_string(),
        ));
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AdminShopifyError::NotFound(target.to_string()));
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AdminShopifyError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response)
}

/// Parse a `Retry-After` value in whole or fractional seconds, rounding up.
fn parse_retry_after(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(secs);
    }
    let (whole, fraction) = raw.split_once('.')?;
    let whole: u64 = whole.parse().ok()?;
    let has_fraction = fraction.chars().any(|c| c != '0');
    Some(if has_fraction { whole + 1 } else { whole })
}
