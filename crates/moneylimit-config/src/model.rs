// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level MoneyLimit configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MoneyLimitConfig {
    /// Process behavior and administration.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram bot integration settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Paid access terms.
    #[serde(default)]
    pub billing: BillingConfig,

    /// Input bounds for budgets and spends.
    #[serde(default)]
    pub budget: BudgetConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Process behavior and administration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Telegram user id allowed to run `/stats` and `/grant`. Also bypasses
    /// the access gate.
    #[serde(default)]
    pub admin_id: Option<i64>,

    /// Seconds of inactivity after which a half-finished dialogue is dropped.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            admin_id: None,
            session_ttl_secs: default_session_ttl_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_session_ttl_secs() -> u64 {
    900
}

/// Telegram bot integration configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. Required by `serve`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Token issued by the payment provider connected through BotFather.
    #[serde(default)]
    pub payment_provider_token: Option<String>,
}

/// Paid access terms.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BillingConfig {
    /// Price of one access period in minor currency units.
    #[serde(default = "default_price_minor")]
    pub price_minor: u32,

    /// ISO 4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Days added by one payment.
    #[serde(default = "default_entitlement_days")]
    pub entitlement_days: u32,

    /// Free days granted when a user first completes setup.
    #[serde(default = "default_trial_days")]
    pub trial_days: u32,

    /// Invoice title.
    #[serde(default = "default_title")]
    pub title: String,

    /// Invoice description.
    #[serde(default = "default_description")]
    pub description: String,

    /// Label of the single price line.
    #[serde(default = "default_price_label")]
    pub price_label: String,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            price_minor: default_price_minor(),
            currency: default_currency(),
            entitlement_days: default_entitlement_days(),
            trial_days: default_trial_days(),
            title: default_title(),
            description: default_description(),
            price_label: default_price_label(),
        }
    }
}

fn default_price_minor() -> u32 {
    19_900
}

fn default_currency() -> String {
    "RUB".to_string()
}

fn default_entitlement_days() -> u32 {
    30
}

fn default_trial_days() -> u32 {
    30
}

fn default_title() -> String {
    "Доступ на 30 дней".to_string()
}

fn default_description() -> String {
    "Дневной лимит и учёт трат ещё на 30 дней".to_string()
}

fn default_price_label() -> String {
    "30 дней".to_string()
}

/// Input bounds for budgets and spends.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BudgetConfig {
    /// Horizon used when the user gives no usable day count.
    #[serde(default = "default_days")]
    pub default_days: u32,

    /// Longest accepted horizon.
    #[serde(default = "default_max_days")]
    pub max_days: u32,

    /// Largest single spend accepted.
    #[serde(default = "default_max_spend")]
    pub max_spend: i64,

    /// Largest monthly amount accepted during setup.
    #[serde(default = "default_max_monthly_amount")]
    pub max_monthly_amount: i64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            default_days: default_days(),
            max_days: default_max_days(),
            max_spend: default_max_spend(),
            max_monthly_amount: default_max_monthly_amount(),
        }
    }
}

fn default_days() -> u32 {
    30
}

fn default_max_days() -> u32 {
    366
}

fn default_max_spend() -> i64 {
    1_000_000
}

fn default_max_monthly_amount() -> i64 {
    1_000_000_000
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("moneylimit").join("moneylimit.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("moneylimit.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}
