//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_SHEET_URL` - Google Sheets gviz endpoint (`.../gviz/tq?tqx=out:json`)
//! - `ORDER_PHONE` - Destination phone number for orders (digits, optional leading `+`)
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `STORE_NAME` - Title shown in the page header (default: Vitrina)
//! - `ORDER_LINK_TEMPLATE` - Messaging link with `{phone}` and `{message}`
//!   placeholders (default: `https://wa.me/{phone}?text={message}`)
//! - `ORDER_GREETING` - First line of the order message
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Performance traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;
use url::Url;
use vitrina_core::{LinkTemplate, OrderComposer};

/// Default messaging link (WhatsApp click-to-chat).
pub const DEFAULT_LINK_TEMPLATE: &str = "https://wa.me/{phone}?text={message}";

/// Default first line of the order message.
pub const DEFAULT_GREETING: &str = "Hello! I'd like to place the following order:";

const PHONE_PLACEHOLDER: &str = "{phone}";

/// Phone numbers are at most 15 digits (E.164).
const MAX_PHONE_DIGITS: usize = 15;
const MIN_PHONE_DIGITS: usize = 6;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Store title
    pub store_name: String,
    /// Catalog source
    pub catalog: CatalogConfig,
    /// Order message and link settings
    pub order: OrderConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Where the catalog comes from.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub sheet_url: Url,
}

/// How orders are sent.
#[derive(Debug, Clone)]
pub struct OrderConfig {
    /// Link template with the phone already filled in
    pub link_template: LinkTemplate,
    pub greeting: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        let store_name = get_env_or_default("STORE_NAME", "Vitrina");

        let catalog = CatalogConfig::from_env()?;
        let order = OrderConfig::from_env()?;

        Ok(Self {
            host,
            port,
            base_url,
            store_name,
            catalog,
            order,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_sample_rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: parse_sample_rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` flag.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("CATALOG_SHEET_URL")?;
        let sheet_url = Url::parse(&raw).map_err(|e| {
            ConfigError::InvalidEnvVar("CATALOG_SHEET_URL".to_string(), e.to_string())
        })?;
        Ok(Self { sheet_url })
    }
}

impl OrderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let phone = parse_phone("ORDER_PHONE", &get_required_env("ORDER_PHONE")?)?;
        let link_template = resolve_link_template(
            "ORDER_LINK_TEMPLATE",
            &get_env_or_default("ORDER_LINK_TEMPLATE", DEFAULT_LINK_TEMPLATE),
            &phone,
        )?;
        let greeting = get_env_or_default("ORDER_GREETING", DEFAULT_GREETING);

        Ok(Self {
            link_template,
            greeting,
        })
    }

    /// Build the order composer for these settings.
    #[must_use]
    pub fn composer(&self) -> OrderComposer {
        OrderComposer::new(self.greeting.clone(), self.link_template.clone())
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_sample_rate(key: &str, default: f32) -> Result<f32, ConfigError> {
    let Some(raw) = get_optional_env(key) else {
        return Ok(default);
    };
    validate_sample_rate(key, &raw)
}

/// A sample rate must be a number between 0 and 1.
fn validate_sample_rate(key: &str, raw: &str) -> Result<f32, ConfigError> {
    let rate = raw
        .trim()
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0 and 1 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Normalize a phone number to bare digits.
///
/// Spaces and dashes are removed and a leading `+` is dropped.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` naming `key` for non-digits or a bad length.
pub fn parse_phone(key: &str, raw: &str) -> Result<String, ConfigError> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('+')
        .chars()
        .filter(|c| !matches!(c, ' ' | '-'))
        .collect();

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "phone number must contain only digits".to_string(),
        ));
    }
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&cleaned.len()) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!(
                "phone number must have {MIN_PHONE_DIGITS} to {MAX_PHONE_DIGITS} digits (got {})",
                cleaned.len()
            ),
        ));
    }
    Ok(cleaned)
}

/// Fill `{phone}` into the template and validate the result.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` naming `key` if the result is not a valid link template.
pub fn resolve_link_template(
    key: &str,
    template: &str,
    phone: &str,
) -> Result<LinkTemplate, ConfigError> {
    LinkTemplate::parse(&template.replace(PHONE_PLACEHOLDER, phone))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            store_name: "Vitrina".to_string(),
            catalog: CatalogConfig {
                sheet_url: Url::parse("https://docs.google.com/spreadsheets/d/abc/gviz/tq?tqx=out:json")
                    .unwrap(),
            },
            order: OrderConfig {
                link_template: resolve_link_template("T", DEFAULT_LINK_TEMPLATE, "5491100000000")
                    .unwrap(),
                greeting: DEFAULT_GREETING.to_string(),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_is_secure() {
        let mut config = test_config();
        assert!(!config.is_secure());
        config.base_url = "https://shop.example.com".to_string();
        assert!(config.is_secure());
    }

    #[test]
    fn test_parse_phone_normalizes() {
        assert_eq!(parse_phone("P", "+54 9 351-805-2252").unwrap(), "5493518052252");
        assert_eq!(parse_phone("P", "5493518052252").unwrap(), "5493518052252");
    }

    #[test]
    fn test_parse_phone_rejects_letters() {
        let err = parse_phone("ORDER_PHONE", "call-me").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ORDER_PHONE"));
    }

    #[test]
    fn test_parse_phone_rejects_bad_length() {
        assert!(parse_phone("P", "123").is_err());
        assert!(parse_phone("P", "1234567890123456").is_err());
    }

    #[test]
    fn test_resolve_link_template_default() {
        let template = resolve_link_template("T", DEFAULT_LINK_TEMPLATE, "5491100000000").unwrap();
        assert_eq!(template.render("hi there"), "https://wa.me/5491100000000?text=hi%20there");
    }

    #[test]
    fn test_resolve_link_template_requires_message_placeholder() {
        let err = resolve_link_template("ORDER_LINK_TEMPLATE", "https://wa.me/{phone}", "1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_validate_sample_rate() {
        assert!((validate_sample_rate("S", "0.25").unwrap() - 0.25).abs() < f32::EPSILON);
        assert!(validate_sample_rate("S", "1.5").is_err());
        assert!(validate_sample_rate("S", "lots").is_err());
    }

    #[test]
    fn test_composer_uses_greeting() {
        let config = test_config();
        let mut cart = vitrina_core::Cart::new();
        cart.add(&vitrina_core::Product {
            id: "1".into(),
            name: "Widget".to_string(),
            price: vitrina_core::Price::from_cents(999),
            image: String::new(),
            description: String::new(),
            brand: String::new(),
            category: String::new(),
        });
        let message = config.order.composer().message(cart.lines()).unwrap();
        assert!(message.starts_with(DEFAULT_GREETING));
    }
}
