//! # Session Configuration
//!
//! Settings read once when the sale-creation screen opens.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Environment Variables (highest priority)                           │
//! │     MOSTRADOR_STORE_NAME, MOSTRADOR_CURRENCY,                          │
//! │     MOSTRADOR_LOT_TRACKING, MOSTRADOR_DISCOUNT_MODE                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/mostrador/session.toml (Linux)                           │
//! │     ~/Library/Application Support/py.mostrador.mostrador/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Guaraní, no lot tracking, no discount                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! store_name = "Despensa Don Juan"
//! currency_code = "PYG"
//! currency_symbol = "₲"
//! currency_decimals = 0
//! lot_tracking = true
//! default_discount_mode = "PER_ITEM"
//! ```
//!
//! Configuration is read-only after loading; no mutex needed.

use directories::ProjectDirs;
use mostrador_core::{DiscountMode, Money};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{SessionError, SessionResult};

/// Settings that shape a sale draft and how amounts are shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Store name (shown in the screen header)
    pub store_name: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Number of decimal places for currency
    pub currency_decimals: u8,

    /// Sell from specific lots; lines then merge by lot
    pub lot_tracking: bool,

    /// Discount mode a new draft starts in
    pub default_discount_mode: DiscountMode,
}

impl Default for SessionConfig {
    /// Defaults for a single guaraní store without lot tracking.
    fn default() -> Self {
        SessionConfig {
            store_name: "Mostrador".to_string(),
            currency_code: "PYG".to_string(),
            currency_symbol: "₲".to_string(),
            currency_decimals: 0,
            lot_tracking: false,
            default_discount_mode: DiscountMode::None,
        }
    }
}

impl SessionConfig {
    /// Defaults, then the platform config file if present, then the
    /// environment.
    pub fn load() -> SessionResult<Self> {
        let config = match config_file_path() {
            Some(path) if path.exists() => SessionConfig::from_file(&path)?,
            _ => SessionConfig::default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Defaults overridden by the environment only.
    pub fn from_env() -> Self {
        SessionConfig::default().with_env_overrides()
    }

    /// Reads a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> SessionResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = SessionConfig::from_toml_str(&contents)?;
        info!(path = %path.display(), "Loaded session config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> SessionResult<Self> {
        let config: SessionConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `MOSTRADOR_*` variables on top of this config.
    ///
    /// Unparsable values are logged and ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(store_name) = lookup("MOSTRADOR_STORE_NAME") {
            self.store_name = store_name;
        }

        if let Some(currency) = lookup("MOSTRADOR_CURRENCY") {
            self.currency_code = currency.trim().to_uppercase();
        }

        if let Some(raw) = lookup("MOSTRADOR_LOT_TRACKING") {
            match parse_flag(&raw) {
                Some(flag) => self.lot_tracking = flag,
                None => warn!(value = %raw, "Ignoring MOSTRADOR_LOT_TRACKING"),
            }
        }

        if let Some(raw) = lookup("MOSTRADOR_DISCOUNT_MODE") {
            match raw.parse::<DiscountMode>() {
                Ok(mode) => self.default_discount_mode = mode,
                Err(e) => warn!(error = %e, "Ignoring MOSTRADOR_DISCOUNT_MODE"),
            }
        }

        debug!(
            lot_tracking = self.lot_tracking,
            discount_mode = %self.default_discount_mode,
            "Session config resolved"
        );
        self
    }

    fn validate(&self) -> SessionResult<()> {
        if self.currency_decimals > 4 {
            return Err(SessionError::InvalidConfig(format!(
                "currency_decimals must be between 0 and 4, got {}",
                self.currency_decimals
            )));
        }
        if self.currency_code.trim().len() != 3 {
            return Err(SessionError::InvalidConfig(format!(
                "currency_code must be a 3-letter ISO code, got '{}'",
                self.currency_code
            )));
        }
        Ok(())
    }

    /// Formats an amount for display.
    ///
    /// Thousands are grouped with `.` and decimals use `,`, the way amounts
    /// are written in Paraguay.
    ///
    /// ```rust
    /// use mostrador_core::Money;
    /// use mostrador_session::config::SessionConfig;
    ///
    /// let config = SessionConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(1_250_000)), "₲ 1.250.000");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let minor = amount.minor();
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (minor / divisor).abs();
        let frac = (minor % divisor).abs();
        let sign = if minor < 0 { "-" } else { "" };

        let mut formatted = format!("{}{} {}", sign, self.currency_symbol, group_thousands(whole));
        if self.currency_decimals > 0 {
            formatted.push_str(&format!(
                ",{:0width$}",
                frac,
                width = self.currency_decimals as usize
            ));
        }
        formatted
    }
}

/// Platform location of `session.toml`, if a home directory is known.
pub fn config_file_path() -> Option<PathBuf> {
    ProjectDirs::from("py", "mostrador", "mostrador")
        .map(|dirs| dirs.config_dir().join("session.toml"))
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "si" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_format_currency_guarani() {
        let config = SessionConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(0)), "₲ 0");
        assert_eq!(config.format_currency(Money::from_minor(900)), "₲ 900");
        assert_eq!(config.format_currency(Money::from_minor(3_500)), "₲ 3.500");
        assert_eq!(config.format_currency(Money::from_minor(-12_345_678)), "-₲ 12.345.678");
    }

    #[test]
    fn test_format_currency_with_decimals() {
        let config = SessionConfig {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            ..SessionConfig::default()
        };
        assert_eq!(config.format_currency(Money::from_minor(123_456)), "$ 1.234,56");
        assert_eq!(config.format_currency(Money::from_minor(-5)), "-$ 0,05");
    }

    #[test]
    fn test_from_toml_keeps_defaults_for_missing_keys() {
        let config = SessionConfig::from_toml_str(
            r#"
            store_name = "Despensa Don Juan"
            lot_tracking = true
            default_discount_mode = "PER_ITEM"
            "#,
        )
        .unwrap();

        assert_eq!(config.store_name, "Despensa Don Juan");
        assert!(config.lot_tracking);
        assert_eq!(config.default_discount_mode, DiscountMode::PerItem);
        assert_eq!(config.currency_code, "PYG");
    }

    #[test]
    fn test_from_toml_rejects_bad_values() {
        assert!(SessionConfig::from_toml_str("currency_decimals = 9").is_err());
        assert!(SessionConfig::from_toml_str("currency_code = \"GUARANI\"").is_err());
        assert!(SessionConfig::from_toml_str("lot_tracking = \"maybe\"").is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MOSTRADOR_STORE_NAME", "Sucursal Centro"),
            ("MOSTRADOR_LOT_TRACKING", "si"),
            ("MOSTRADOR_DISCOUNT_MODE", "total_amount"),
        ]
        .into_iter()
        .collect();

        let config = SessionConfig::default()
            .with_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.store_name, "Sucursal Centro");
        assert!(config.lot_tracking);
        assert_eq!(config.default_discount_mode, DiscountMode::TotalAmount);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let config = SessionConfig::default().with_overrides(|key| match key {
            "MOSTRADOR_LOT_TRACKING" => Some("perhaps".to_string()),
            "MOSTRADOR_DISCOUNT_MODE" => Some("half".to_string()),
            _ => None,
        });
        assert_eq!(config, SessionConfig::default());
    }
}
