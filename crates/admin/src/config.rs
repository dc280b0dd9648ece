//! Shop configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_SHOP_DOMAIN` - Shop domain (e.g., my-shop.myshopify.com)
//! - `SHOPIFY_API_SECRET` - Admin API access token (HIGH PRIVILEGE)
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-10)
//! - `SHOPIFY_HTTP_TIMEOUT_SECS` - Per-request timeout (default: 30)
//! - `ORDERLINE_METAFIELD_NAMESPACE` - Namespace for the shipping-note metafield (default: orderline)
//! - `ORDERLINE_FULFILLMENT_ATTEMPTS` - Fulfillment-order lookup attempts (default: 5)
//! - `ORDERLINE_FULFILLMENT_DELAY_MS` - Delay before the first lookup retry (default: 3000)

use std::collections::HashMap;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;

use crate::retry::RetryPolicy;

const DEFAULT_API_VERSION: &str = "2025-10";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Metafield namespace used when none is configured.
pub const DEFAULT_METAFIELD_NAMESPACE: &str = "orderline";
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Shopify shop configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopConfig {
    /// Shop domain without scheme (e.g., my-shop.myshopify.com)
    pub store: String,
    /// Admin API version (e.g., 2025-10)
    pub api_version: String,
    /// Admin API access token (HIGH PRIVILEGE - order write access)
    pub access_token: SecretString,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
    /// Namespace used for the shipping-note metafield
    pub metafield_namespace: String,
    /// Backoff for the post-creation fulfillment-order lookup
    pub fulfillment_retry: RetryPolicy,
}

impl std::fmt::Debug for ShopConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("metafield_namespace", &self.metafield_namespace)
            .field("fulfillment_retry", &self.fulfillment_retry)
            .finish()
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store = normalize_store(&get_required_env("SHOPIFY_SHOP_DOMAIN")?)?;
        let access_token = get_validated_secret("SHOPIFY_API_SECRET")?;
        let api_version = get_env_or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION);
        let timeout_secs = parse_env("SHOPIFY_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let metafield_namespace =
            get_env_or_default("ORDERLINE_METAFIELD_NAMESPACE", DEFAULT_METAFIELD_NAMESPACE);

        let defaults = RetryPolicy::default();
        let max_attempts = parse_env("ORDERLINE_FULFILLMENT_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ORDERLINE_FULFILLMENT_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        let delay_ms = parse_env(
            "ORDERLINE_FULFILLMENT_DELAY_MS",
            u64::try_from(defaults.initial_delay.as_millis()).unwrap_or(u64::MAX),
        )?;

        Ok(Self {
            store,
            api_version,
            access_token,
            timeout: Duration::from_secs(timeout_secs),
            metafield_namespace,
            fulfillment_retry: RetryPolicy {
                max_attempts,
                initial_delay: Duration::from_millis(delay_ms),
                ..defaults
            },
        })
    }

    /// Admin GraphQL endpoint for this shop.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.store, self.api_version
        )
    }

    /// Admin REST base URL for this shop (no trailing slash).
    #[must_use]
    pub fn rest_base(&self) -> String {
        format!("https://{}/admin/api/{}", self.store, self.api_version)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional environment variable, falling back to `default`.
fn parse_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
        Err(_) => Ok(default),
    }
}

/// Reduce a shop domain to its host: scheme and trailing slashes are dropped.
fn normalize_store(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let with_scheme = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };
    let parsed = url::Url::parse(&with_scheme).map_err(|e| {
        ConfigError::InvalidEnvVar("SHOPIFY_SHOP_DOMAIN".to_string(), e.to_string())
    })?;
    let host = parsed.host_str().ok_or_else(|| {
        ConfigError::InvalidEnvVar("SHOPIFY_SHOP_DOMAIN".to_string(), "missing host".to_string())
    })?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use the token issued by Shopify."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> ShopConfig {
        ShopConfig {
            store: "test-shop.myshopify.com".to_string(),
            api_version: "2025-10".to_string(),
            access_token: SecretString::from("shpat_9f2c1b7e4d8a3f6e0b5c"),
            timeout: Duration::from_secs(30),
            metafield_namespace: "orderline".to_string(),
            fulfillment_retry: RetryPolicy::default(),
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-admin-token-here", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("shpat_9f2c1b7e4d8a3f6e0b5c", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_normalize_store() {
        assert_eq!(
            normalize_store("my-shop.myshopify.com").unwrap(),
            "my-shop.myshopify.com"
        );
        assert_eq!(
            normalize_store("https://my-shop.myshopify.com/").unwrap(),
            "my-shop.myshopify.com"
        );
        assert_eq!(
            normalize_store("  http://localhost:8080/  ").unwrap(),
            "localhost:8080"
        );
        assert!(normalize_store("").is_err());
    }

    #[test]
    fn test_endpoints() {
        let config = test_config();
        assert_eq!(
            config.graphql_endpoint(),
            "https://test-shop.myshopify.com/admin/api/2025-10/graphql.json"
        );
        assert_eq!(
            config.rest_base(),
            "https://test-shop.myshopify.com/admin/api/2025-10"
        );
    }

    #[test]
    fn test_shop_config_debug_redacts_secrets() {
        let debug_output = format!("{:?}", test_config());

        assert!(debug_output.contains("test-shop.myshopify.com"));
        assert!(debug_output.contains("2025-10"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("shpat_9f2c1b7e4d8a3f6e0b5c"));
    }
}
