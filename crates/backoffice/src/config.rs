//! Back-office configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STORE_DATA_DIR` - Directory holding the JSON documents (default: data)
//! - `STORE_NAME` - Title printed at the top of invoices
//!   (default: STORE MANAGEMENT SYSTEM)
//! - `STORE_TAX_RATE` - Invoice tax rate as a decimal fraction (default: 0.15)
//! - `STORE_CURRENCY` - ISO 4217 code used for display (default: USD)
//! - `STORE_ADMIN_PASSWORD` - Password for the bootstrap `admin` account.
//!   Only needed the first time, while no admin exists.

use std::collections::HashMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use storekeeper_core::CurrencyCode;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_STORE_NAME: &str = "STORE MANAGEMENT SYSTEM";
const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(15, 0, 0, false, 2);
const MIN_ADMIN_PASSWORD_LENGTH: usize = 8;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 2.5;

/// Blocklist of common default passwords (case-insensitive substring match)
const WEAK_PASSWORD_PATTERNS: &[&str] = &["password", "changeme", "12345678", "qwerty", "letmein"];

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

/// Back-office application configuration.
///
/// Implements `Debug` manually to redact the bootstrap password.
#[derive(Clone)]
pub struct BackofficeConfig {
    /// Directory holding the JSON documents
    pub data_dir: PathBuf,
    /// Title printed at the top of invoices
    pub store_name: String,
    /// Invoice tax rate (0.15 = 15%)
    pub tax_rate: Decimal,
    /// Currency used when displaying amounts
    pub currency: CurrencyCode,
    /// Password for the bootstrap admin account
    pub admin_password: Option<SecretString>,
}

impl std::fmt::Debug for BackofficeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackofficeConfig")
            .field("data_dir", &self.data_dir)
            .field("store_name", &self.store_name)
            .field("tax_rate", &self.tax_rate)
            .field("currency", &self.currency)
            .field(
                "admin_password",
                &self.admin_password.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl BackofficeConfig {
    /// Default configuration rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            store_name: DEFAULT_STORE_NAME.to_string(),
            tax_rate: DEFAULT_TAX_RATE,
            currency: CurrencyCode::default(),
            admin_password: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`BackofficeConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let data_dir = PathBuf::from(get_or_default("STORE_DATA_DIR", DEFAULT_DATA_DIR));
        let store_name = get_or_default("STORE_NAME", DEFAULT_STORE_NAME);

        let tax_rate = match lookup("STORE_TAX_RATE") {
            Some(raw) => parse_tax_rate(&raw)?,
            None => DEFAULT_TAX_RATE,
        };

        let currency = get_or_default("STORE_CURRENCY", CurrencyCode::default().code())
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("STORE_CURRENCY".to_string(), e))?;

        let admin_password = lookup("STORE_ADMIN_PASSWORD").map(SecretString::from);

        Ok(Self {
            data_dir,
            store_name,
            tax_rate,
            currency,
            admin_password,
        })
    }

    /// Replace the data directory (used by the CLI `--data-dir` flag).
    #[must_use]
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Bootstrap password, checked for strength.
    ///
    /// Only `init` needs it, so a weak leftover value does not block other
    /// commands.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when `STORE_ADMIN_PASSWORD` is unset
    /// and `ConfigError::InsecureSecret` when it is too weak.
    pub fn require_admin_password(&self) -> Result<&SecretString, ConfigError> {
        let password = self
            .admin_password
            .as_ref()
            .ok_or_else(|| ConfigError::MissingEnvVar("STORE_ADMIN_PASSWORD".to_string()))?;
        validate_password_strength(password.expose_secret(), "STORE_ADMIN_PASSWORD")?;
        Ok(password)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a tax rate, accepting `0 <= rate < 1`.
fn parse_tax_rate(raw: &str) -> Result<Decimal, ConfigError> {
    let rate = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar("STORE_TAX_RATE".to_string(), e.to_string()))?;

    if rate.is_sign_negative() || rate >= Decimal::ONE {
        return Err(ConfigError::InvalidEnvVar(
            "STORE_TAX_RATE".to_string(),
            format!("must be a fraction between 0 and 1 (got {rate})"),
        ));
    }

    Ok(rate)
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
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a password is long enough, not a well-known default, and
/// not a trivially repetitive string.
///
/// # Errors
///
/// Returns `ConfigError::InsecureSecret` naming `var_name`.
pub fn validate_password_strength(password: &str, var_name: &str) -> Result<(), ConfigError> {
    if password.chars().count() < MIN_ADMIN_PASSWORD_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("must be at least {MIN_ADMIN_PASSWORD_LENGTH} characters"),
        ));
    }

    let lower = password.to_lowercase();
    for pattern in WEAK_PASSWORD_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a default password (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(password);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BackofficeConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.store_name, "STORE MANAGEMENT SYSTEM");
        assert_eq!(config.tax_rate, Decimal::new(15, 2));
        assert_eq!(config.currency, CurrencyCode::USD);
        assert!(config.admin_password.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = BackofficeConfig::from_lookup(lookup_from(&[
            ("STORE_DATA_DIR", "/var/lib/store"),
            ("STORE_NAME", "CORNER SHOP"),
            ("STORE_TAX_RATE", "0.08"),
            ("STORE_CURRENCY", "eur"),
            ("STORE_ADMIN_PASSWORD", "Xk9#vQ2!mT7z"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/store"));
        assert_eq!(config.store_name, "CORNER SHOP");
        assert_eq!(config.tax_rate, Decimal::new(8, 2));
        assert_eq!(config.currency, CurrencyCode::EUR);
        assert!(config.require_admin_password().is_ok());
    }

    #[test]
    fn test_invalid_tax_rate() {
        for raw in ["abc", "-0.1", "1", "1.5"] {
            let result =
                BackofficeConfig::from_lookup(lookup_from(&[("STORE_TAX_RATE", raw)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidEnvVar(ref var, _)) if var == "STORE_TAX_RATE"),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_invalid_currency() {
        let result = BackofficeConfig::from_lookup(lookup_from(&[("STORE_CURRENCY", "DOGE")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_weak_admin_password_rejected_only_when_required() {
        for weak in ["short", "password123", "aaaaaaaaaaaa", "Changeme!"] {
            let config =
                BackofficeConfig::from_lookup(lookup_from(&[("STORE_ADMIN_PASSWORD", weak)]))
                    .unwrap();
            assert!(
                matches!(
                    config.require_admin_password(),
                    Err(ConfigError::InsecureSecret(_, _))
                ),
                "{weak} should be rejected"
            );
        }
    }

    #[test]
    fn test_missing_admin_password() {
        let config = BackofficeConfig::new("data");
        assert!(matches!(
            config.require_admin_password(),
            Err(ConfigError::MissingEnvVar(_))
        ));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_debug_redacts_admin_password() {
        let mut config = BackofficeConfig::new("data");
        config.admin_password = Some(SecretString::from("Xk9#vQ2!mT7z"));

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("data"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("Xk9#vQ2!mT7z"));
    }
}
