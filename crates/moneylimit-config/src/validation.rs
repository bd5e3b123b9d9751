// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as positive prices, currency codes, and consistent input bounds.

use crate::diagnostic::ConfigError;
use crate::model::MoneyLimitConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MoneyLimitConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level `{}` must be one of {}",
                config.bot.log_level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if config.bot.session_ttl_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "bot.session_ttl_secs must be greater than 0".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.billing.price_minor == 0 {
        errors.push(ConfigError::Validation {
            message: "billing.price_minor must be greater than 0".to_string(),
        });
    }

    let currency = &config.billing.currency;
    if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "billing.currency `{currency}` must be a three-letter ISO 4217 code like `RUB`"
            ),
        });
    }

    if config.billing.entitlement_days == 0 {
        errors.push(ConfigError::Validation {
            message: "billing.entitlement_days must be greater than 0".to_string(),
        });
    }

    if config.budget.default_days == 0 {
        errors.push(ConfigError::Validation {
            message: "budget.default_days must be greater than 0".to_string(),
        });
    }

    if config.budget.default_days > config.budget.max_days {
        errors.push(ConfigError::Validation {
            message: format!(
                "budget.default_days ({}) must not exceed budget.max_days ({})",
                config.budget.default_days, config.budget.max_days
            ),
        });
    }

    if config.budget.max_spend <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "budget.max_spend must be positive, got {}",
                config.budget.max_spend
            ),
        });
    }

    if config.budget.max_monthly_amount <= 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "budget.max_monthly_amount must be positive, got {}",
                config.budget.max_monthly_amount
            ),
        });
    }

    if let Some(admin_id) = config.bot.admin_id
        && admin_id <= 0
    {
        errors.push(ConfigError::Validation {
            message: format!("bot.admin_id must be a positive user id, got {admin_id}"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = MoneyLimitConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = MoneyLimitConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn lowercase_currency_fails_validation() {
        let mut config = MoneyLimitConfig::default();
        config.billing.currency = "rub".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "billing.currency"));
    }

    #[test]
    fn zero_price_fails_validation() {
        let mut config = MoneyLimitConfig::default();
        config.billing.price_minor = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "price_minor"));
    }

    #[test]
    fn default_days_above_max_days_fails_validation() {
        let mut config = MoneyLimitConfig::default();
        config.budget.default_days = 400;
        config.budget.max_days = 366;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "must not exceed budget.max_days"));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = MoneyLimitConfig::default();
        config.bot.log_level = "loud".to_string();
        config.budget.max_spend = 0;
        config.bot.admin_id = Some(-1);
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn valid_custom_config_passes() {
        let mut config = MoneyLimitConfig::default();
        config.bot.admin_id = Some(123456);
        config.billing.currency = "USD".to_string();
        config.billing.price_minor = 299;
        config.storage.database_path = "/tmp/test.db".to_string();
        assert!(validate_config(&config).is_ok());
    }
}
