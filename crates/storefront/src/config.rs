//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `DAPUR_API_URL` - Menu/order endpoint (the Apps Script web app URL)
//! - `DAPUR_WHATSAPP_NO` - WhatsApp number orders are handed to (digits only)
//!
//! ## Optional
//! - `DAPUR_HOST` - Bind address (default: 127.0.0.1)
//! - `DAPUR_PORT` - Listen port (default: 3000)
//! - `DAPUR_STORE_NAME` - Name used in order messages (default: Dapur Mommy)
//! - `DAPUR_CATALOG_TIMEOUT_SECS` - Catalog fetch timeout (default: 8)
//! - `GEMINI_API_KEY` - Enables menu recommendations
//! - `GEMINI_MODEL` - Recommendation model (default: gemini-3-flash-preview)
//! - `GEMINI_BASE_URL` - Gemini API base (default: <https://generativelanguage.googleapis.com>)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_TRACES_SAMPLE_RATE` - Sentry transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_CATALOG_TIMEOUT_SECS: u64 = 8;
const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const MIN_API_KEY_LENGTH: usize = 20;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "api-key-here",
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

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Menu and order endpoint
    pub api_url: Url,
    /// WhatsApp number that receives order messages
    pub whatsapp_number: String,
    /// Store name used in order messages
    pub store_name: String,
    /// Hard timeout for the catalog fetch
    pub catalog_timeout: Duration,
    /// Recommendation provider configuration
    pub gemini: GeminiConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Fraction of requests traced to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Gemini recommendation API configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; recommendations fall back to a static line without it
    pub api_key: Option<SecretString>,
    /// Model name
    pub model: String,
    /// API base URL
    pub base_url: Url,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the Gemini key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let host = env.parsed("DAPUR_HOST", "127.0.0.1", str::parse::<IpAddr>)?;
        let port = env.parsed("DAPUR_PORT", "3000", str::parse::<u16>)?;
        let api_url = parse_url("DAPUR_API_URL", &env.required("DAPUR_API_URL")?)?;
        let whatsapp_number = validate_whatsapp_number(&env.required("DAPUR_WHATSAPP_NO")?)?;
        let store_name = env.or_default("DAPUR_STORE_NAME", "Dapur Mommy");
        let catalog_timeout = Duration::from_secs(env.parsed(
            "DAPUR_CATALOG_TIMEOUT_SECS",
            &DEFAULT_CATALOG_TIMEOUT_SECS.to_string(),
            str::parse::<u64>,
        )?);
        let gemini = GeminiConfig::from_lookup(&env)?;
        let sentry_traces_sample_rate =
            env.parsed("SENTRY_TRACES_SAMPLE_RATE", "0.0", str::parse::<f32>)?;

        Ok(Self {
            host,
            port,
            api_url,
            whatsapp_number,
            store_name,
            catalog_timeout,
            gemini,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl GeminiConfig {
    fn from_lookup<F: Fn(&str) -> Option<String>>(env: &Lookup<F>) -> Result<Self, ConfigError> {
        let api_key = match env.optional("GEMINI_API_KEY") {
            Some(key) => {
                validate_api_key(&key, "GEMINI_API_KEY")?;
                Some(SecretString::from(key))
            }
            None => None,
        };

        Ok(Self {
            api_key,
            model: env.or_default("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            base_url: parse_url(
                "GEMINI_BASE_URL",
                &env.or_default("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
            )?,
        })
    }

    /// Whether recommendations can call the provider at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Environment lookup with the storefront's conventions for defaults.
struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get a variable, treating blank values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T, E: std::fmt::Display>(
        &self,
        key: &str,
        default: &str,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> Result<T, ConfigError> {
        parse(self.or_default(key, default).trim())
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }
}

fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Accepts digits with optional `+`, spaces and dashes; returns digits only.
fn validate_whatsapp_number(raw: &str) -> Result<String, ConfigError> {
    let invalid = |reason: &str| {
        ConfigError::InvalidEnvVar("DAPUR_WHATSAPP_NO".to_string(), reason.to_string())
    };

    if raw
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, '+' | ' ' | '-')))
    {
        return Err(invalid("must contain only digits"));
    }

    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 {
        return Err(invalid("too short for a phone number"));
    }
    Ok(digits)
}

/// Reject keys that are obviously not real.
fn validate_api_key(key: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = key.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(*p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    if key.len() < MIN_API_KEY_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_API_KEY_LENGTH} characters (got {})",
                key.len()
            ),
        ));
    }

    Ok(())
}
