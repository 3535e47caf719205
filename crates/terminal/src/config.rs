//! Terminal configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BACKOFFICE_BASE_URL` - Base URL of the hosting back-office API
//! - `BACKOFFICE_API_TOKEN` - Bearer token for the back-office API (high entropy)
//!
//! ## Optional
//! - `TERMINAL_HOST` - Bind address (default: 127.0.0.1)
//! - `TERMINAL_PORT` - Listen port (default: 4100)
//! - `TERMINAL_STATE_DIR` - On-device state directory (default: ./state)
//! - `TERMINAL_TAX_RATE` - Decimal tax rate (default: 0.10)
//! - `TERMINAL_SEARCH_DEBOUNCE_MS` - Search debounce delay (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use rust_decimal::Decimal;
use secrecy::SecretString;
use thiserror::Error;

use countertop_register::default_tax_rate;

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

/// Terminal application configuration.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory holding the on-device register state documents
    pub state_dir: PathBuf,
    /// Tax rate applied to register totals
    pub tax_rate: Decimal,
    /// Debounce delay before a catalog search is dispatched
    pub search_debounce: Duration,
    /// Back-office API configuration
    pub backoffice: BackofficeConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Back-office API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct BackofficeConfig {
    /// Base URL of the back-office API (e.g., <https://admin.example.com>)
    pub base_url: String,
    /// Bearer token for the back-office API
    pub api_token: SecretString,
}

impl std::fmt::Debug for BackofficeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackofficeConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

impl TerminalConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the API token fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("TERMINAL_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TERMINAL_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TERMINAL_PORT", "4100")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TERMINAL_PORT".to_string(), e.to_string()))?;
        let state_dir = PathBuf::from(get_env_or_default("TERMINAL_STATE_DIR", "./state"));
        let tax_rate = parse_tax_rate()?;
        let search_debounce = get_env_or_default("TERMINAL_SEARCH_DEBOUNCE_MS", "300")
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TERMINAL_SEARCH_DEBOUNCE_MS".to_string(), e.to_string())
            })?;

        let backoffice = BackofficeConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            host,
            port,
            state_dir,
            tax_rate,
            search_debounce,
            backoffice,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl BackofficeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_required_env("BACKOFFICE_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())?,
            api_token: get_validated_secret("BACKOFFICE_API_TOKEN")?,
        })
    }
}

fn parse_tax_rate() -> Result<Decimal, ConfigError> {
    match get_optional_env("TERMINAL_TAX_RATE") {
        None => Ok(default_tax_rate()),
        Some(raw) => {
            let rate = raw.parse::<Decimal>().map_err(|e| {
                ConfigError::InvalidEnvVar("TERMINAL_TAX_RATE".to_string(), e.to_string())
            })?;
            if rate.is_sign_negative() || rate >= Decimal::ONE {
                return Err(ConfigError::InvalidEnvVar(
                    "TERMINAL_TAX_RATE".to_string(),
                    format!("rate must be in [0, 1), got {rate}"),
                ));
            }
            Ok(rate)
        }
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
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
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

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real API tokens have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated token."
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

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-token-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = TerminalConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 4100,
            state_dir: PathBuf::from("./state"),
            tax_rate: default_tax_rate(),
            search_debounce: Duration::from_millis(300),
            backoffice: BackofficeConfig {
                base_url: "https://admin.example.test".to_string(),
                api_token: SecretString::from("token"),
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 4100);
    }

    #[test]
    fn test_backoffice_config_debug_redacts_token() {
        let config = BackofficeConfig {
            base_url: "https://admin.example.test".to_string(),
            api_token: SecretString::from("super_secret_api_token"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("admin.example.test"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_api_token"));
    }
}
