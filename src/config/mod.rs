//! Application configuration
//!
//! Loaded from YAML; every section and field has a default, so an empty file
//! (or no file at all) yields a working marketplace.
//!
//! ```yaml
//! server:
//!   bind: "0.0.0.0:5000"
//! tax:
//!   vat_rate: 0.15
//! orders:
//!   default_delivery_fee: 50
//! seed:
//!   catalog: true
//!   admin:
//!     username: admin
//!     password: change-me-now
//! ```

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the YAML file to load
pub const CONFIG_PATH_ENV: &str = "STOCKIST_HUB_CONFIG";
/// Environment variable overriding `server.bind`
pub const BIND_ENV: &str = "STOCKIST_HUB_BIND";
/// Used when `STOCKIST_HUB_CONFIG` is unset and the file exists
pub const DEFAULT_CONFIG_PATH: &str = "config/stockist-hub.yaml";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("tax.vat_rate must be in [0, 1), got {0}")]
    VatRateOutOfRange(Decimal),

    #[error("{section}.number_prefix must not be empty")]
    EmptyPrefix { section: &'static str },

    #[error("{section}.number_length must be between 4 and 32, got {length}")]
    NumberLength { section: &'static str, length: usize },

    #[error("orders.default_delivery_fee must not be negative, got {0}")]
    NegativeDeliveryFee(Decimal),

    #[error("seed.admin.password must be at least 6 characters")]
    WeakAdminPassword,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub tax: TaxConfig,
    pub orders: OrderConfig,
    pub receipts: ReceiptConfig,
    pub session: SessionConfig,
    pub seed: SeedConfig,
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub service_name: String,
    /// Browser origins allowed to call the API with cookies; empty disables CORS
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
            service_name: "stockist-hub".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    pub vat_rate: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            vat_rate: dec!(0.15),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    pub number_prefix: String,
    pub number_length: usize,
    pub default_delivery_fee: Decimal,
    /// Largest accepted gap between submitted and computed amounts
    pub totals_tolerance: Decimal,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            number_prefix: "ET".to_string(),
            number_length: 6,
            default_delivery_fee: dec!(50),
            totals_tolerance: dec!(0.01),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    pub number_prefix: String,
    pub number_length: usize,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            number_prefix: "VAT-".to_string(),
            number_length: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Send the cookie over HTTPS only
    pub secure: bool,
    pub inactivity_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "stockist_hub_session".to_string(),
            secure: false,
            inactivity_minutes: 24 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Load the built-in beverage catalog at startup
    pub catalog: bool,
    pub admin: Option<AdminSeed>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            catalog: true,
            admin: None,
        }
    }
}

/// Bootstrap admin account; admins cannot self-register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
    #[serde(default = "AdminSeed::default_name")]
    pub name: String,
    #[serde(default = "AdminSeed::default_email")]
    pub email: String,
    #[serde(default = "AdminSeed::default_phone")]
    pub phone: String,
}

impl AdminSeed {
    fn default_name() -> String {
        "Administrator".to_string()
    }

    fn default_email() -> String {
        "admin@localhost".to_string()
    }

    fn default_phone() -> String {
        "+251000000000".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    pub capacity: usize,
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self { capacity: 1024 }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration the way the binary does: the file named by
    /// `STOCKIST_HUB_CONFIG`, else `config/stockist-hub.yaml` when present,
    /// else defaults. `STOCKIST_HUB_BIND` then overrides the bind address.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                tracing::info!("Loading configuration from {}", path);
                Self::from_yaml_file(&path)?
            }
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                tracing::info!("Loading configuration from {}", DEFAULT_CONFIG_PATH);
                Self::from_yaml_file(DEFAULT_CONFIG_PATH)?
            }
            Err(_) => {
                tracing::info!("No configuration file, using defaults");
                Self::default()
            }
        };

        if let Ok(bind) = std::env::var(BIND_ENV) {
            config.server.bind = bind;
        }

        Ok(config)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tax.vat_rate < Decimal::ZERO || self.tax.vat_rate >= Decimal::ONE {
            return Err(ConfigError::VatRateOutOfRange(self.tax.vat_rate));
        }
        if self.orders.default_delivery_fee < Decimal::ZERO {
            return Err(ConfigError::NegativeDeliveryFee(
                self.orders.default_delivery_fee,
            ));
        }
        for (section, prefix, length) in [
            ("orders", &self.orders.number_prefix, self.orders.number_length),
            ("receipts", &self.receipts.number_prefix, self.receipts.number_length),
        ] {
            if prefix.is_empty() {
                return Err(ConfigError::EmptyPrefix { section });
            }
            if !(4..=32).contains(&length) {
                return Err(ConfigError::NumberLength { section, length });
            }
        }
        if let Some(admin) = &self.seed.admin {
            if admin.password.len() < 6 {
                return Err(ConfigError::WeakAdminPassword);
            }
        }
        Ok(())
    }

    /// Configuration for tests: defaults with the catalog seeded
    pub fn default_config() -> Self {
        Self::default()
    }
}
