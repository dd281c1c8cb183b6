//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOCKROOM_API_URL` - Backend API root (default: `http://127.0.0.1:5000/api`)
//! - `STOCKROOM_STATE_FILE` - Where tokens and the pending cart are kept
//!   (default: `.stockroom/state.json`)
//! - `STOCKROOM_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 15)
//! - `STOCKROOM_TAX_RATE` - Tax as a fraction of the subtotal (default: 0.15)
//! - `STOCKROOM_FREE_SHIPPING_THRESHOLD` - Subtotals above this ship free
//!   (default: 100)
//! - `STOCKROOM_FLAT_SHIPPING_FEE` - Shipping charged otherwise (default: 10)

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use stockroom_core::{Money, PricingPolicy};
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_STATE_FILE: &str = ".stockroom/state.json";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend API root. Always ends with `/` so relative paths join under it.
    pub api_url: Url,
    /// JSON file backing the cookie, local and session storage areas
    pub state_file: PathBuf,
    /// Per-request timeout
    pub http_timeout: Duration,
    /// Tax and shipping policy used at checkout
    pub pricing: PricingPolicy,
}

impl ClientConfig {
    /// Configuration with default timeout and pricing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `api_url` is not a valid URL.
    pub fn new(api_url: &str, state_file: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: normalize_base(api_url).map_err(|e| invalid("api_url", e))?,
            state_file: state_file.into(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            pricing: PricingPolicy::default(),
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_url = normalize_base(&get_or("STOCKROOM_API_URL", DEFAULT_API_URL))
            .map_err(|e| invalid("STOCKROOM_API_URL", e))?;
        let state_file = PathBuf::from(get_or("STOCKROOM_STATE_FILE", DEFAULT_STATE_FILE));
        let timeout_secs = get_or("STOCKROOM_HTTP_TIMEOUT_SECS", "15")
            .parse::<u64>()
            .map_err(|e| invalid("STOCKROOM_HTTP_TIMEOUT_SECS", e))?;
        if timeout_secs == 0 {
            return Err(invalid("STOCKROOM_HTTP_TIMEOUT_SECS", "must be at least 1"));
        }

        let defaults = PricingPolicy::default();
        let tax_rate = parse_decimal(&lookup, "STOCKROOM_TAX_RATE")?.unwrap_or(defaults.tax_rate);
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE {
            return Err(invalid("STOCKROOM_TAX_RATE", "must be between 0 and 1"));
        }
        let free_shipping_threshold = parse_money(&lookup, "STOCKROOM_FREE_SHIPPING_THRESHOLD")?
            .unwrap_or(defaults.free_shipping_threshold);
        let flat_shipping_fee = parse_money(&lookup, "STOCKROOM_FLAT_SHIPPING_FEE")?
            .unwrap_or(defaults.flat_shipping_fee);

        Ok(Self {
            api_url,
            state_file,
            http_timeout: Duration::from_secs(timeout_secs),
            pricing: PricingPolicy {
                tax_rate,
                free_shipping_threshold,
                flat_shipping_fee,
            },
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn invalid(key: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), reason.to_string())
}

/// Parse an API root, forcing a trailing slash.
fn normalize_base(raw: &str) -> Result<Url, url::ParseError> {
    let trimmed = raw.trim().trim_end_matches('/');
    Url::parse(&format!("{trimmed}/"))
}

fn parse_decimal(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Decimal>, ConfigError> {
    lookup(key)
        .map(|raw| Decimal::from_str(raw.trim()).map_err(|e| invalid(key, e)))
        .transpose()
}

fn parse_money(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Money>, ConfigError> {
    match parse_decimal(lookup, key)? {
        Some(amount) if amount.is_sign_negative() && !amount.is_zero() => {
            Err(invalid(key, "must not be negative"))
        }
        other => Ok(other.map(Money::new)),
    }
}
