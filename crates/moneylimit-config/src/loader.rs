// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./moneylimit.toml` > `~/.config/moneylimit/moneylimit.toml`
//! > `/etc/moneylimit/moneylimit.toml`, with environment variable overrides via the
//! `MONEYLIMIT_` prefix and the bare `BOT_TOKEN` / `ADMIN_ID` variables.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::MoneyLimitConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/moneylimit/moneylimit.toml`
/// 3. `~/.config/moneylimit/moneylimit.toml`
/// 4. `./moneylimit.toml`
/// 5. `BOT_TOKEN` / `ADMIN_ID`
/// 6. `MONEYLIMIT_*` environment variables
pub fn load_config() -> Result<MoneyLimitConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no files, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<MoneyLimitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoneyLimitConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MoneyLimitConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MoneyLimitConfig::default()))
        .merge(Toml::file(path))
        .merge(legacy_env_provider())
        .merge(env_provider())
        .extract()
}

/// Build the Figment used for config loading, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(MoneyLimitConfig::default()))
        .merge(Toml::file("/etc/moneylimit/moneylimit.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("moneylimit/moneylimit.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("moneylimit.toml"))
        .merge(legacy_env_provider())
        .merge(env_provider())
}

/// Config sections, in the order keys are matched against them.
const SECTIONS: [&str; 5] = ["bot", "telegram", "billing", "budget", "storage"];

/// `MONEYLIMIT_*` variables mapped onto sections with an explicit `map()`.
///
/// `Env::split("_")` would turn `MONEYLIMIT_TELEGRAM_BOT_TOKEN` into
/// `telegram.bot.token`; only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("MONEYLIMIT_").map(|key| section_key(key.as_str()).into())
}

/// `telegram_bot_token` -> `telegram.bot_token`. Only a leading section name
/// is split off; keys outside every section pass through unchanged.
fn section_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key.strip_prefix(section).and_then(|r| r.strip_prefix('_')) {
            return format!("{section}.{rest}");
        }
    }
    key
}

/// The two unprefixed variables older deployments set in their `.env`.
fn legacy_env_provider() -> Env {
    Env::raw().only(&["BOT_TOKEN", "ADMIN_ID"]).map(|key| {
        match key.as_str().to_ascii_lowercase().as_str() {
            "bot_token" => "telegram.bot_token".into(),
            "admin_id" => "bot.admin_id".into(),
            other => other.to_string().into(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_env_maps_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MONEYLIMIT_TELEGRAM_BOT_TOKEN", "123:abc");
            jail.set_env("MONEYLIMIT_BUDGET_MAX_SPEND", "500");
            jail.set_env("MONEYLIMIT_BOT_ADMIN_ID", "42");

            let config: MoneyLimitConfig = Figment::new()
                .merge(Serialized::defaults(MoneyLimitConfig::default()))
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
            assert_eq!(config.budget.max_spend, 500);
            assert_eq!(config.bot.admin_id, Some(42));
            Ok(())
        });
    }

    #[test]
    fn section_key_splits_only_the_leading_section() {
        assert_eq!(section_key("TELEGRAM_BOT_TOKEN"), "telegram.bot_token");
        assert_eq!(
            section_key("telegram_payment_provider_token"),
            "telegram.payment_provider_token"
        );
        assert_eq!(section_key("BOT_LOG_LEVEL"), "bot.log_level");
        assert_eq!(section_key("BUDGET_MAX_DAYS"), "budget.max_days");
        assert_eq!(section_key("STORAGE_DATABASE_PATH"), "storage.database_path");
        assert_eq!(section_key("BILLING_TRIAL_DAYS"), "billing.trial_days");
        assert_eq!(section_key("UNRELATED"), "unrelated");
    }

    #[test]
    fn telegram_token_from_env_loads_and_validates() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("MONEYLIMIT_TELEGRAM_BOT_TOKEN", "123:abc");
            jail.set_env("MONEYLIMIT_TELEGRAM_PAYMENT_PROVIDER_TOKEN", "381764678:TEST:1");

            jail.create_file("moneylimit.toml", "[bot]\nlog_level = \"debug\"\n")?;

            let config = crate::load_and_validate_path(Path::new("moneylimit.toml"))
                .map_err(|errors| format!("{errors:?}"))?;
            assert_eq!(config.bot.log_level, "debug");
            assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
            assert_eq!(
                config.telegram.payment_provider_token.as_deref(),
                Some("381764678:TEST:1")
            );
            Ok(())
        });
    }

    #[test]
    fn legacy_env_vars_are_honoured() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BOT_TOKEN", "999:legacy");
            jail.set_env("ADMIN_ID", "7");

            let config: MoneyLimitConfig = Figment::new()
                .merge(Serialized::defaults(MoneyLimitConfig::default()))
                .merge(legacy_env_provider())
                .extract()?;

            assert_eq!(config.telegram.bot_token.as_deref(), Some("999:legacy"));
            assert_eq!(config.bot.admin_id, Some(7));
            Ok(())
        });
    }

    #[test]
    fn prefixed_env_beats_legacy_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("BOT_TOKEN", "old");
            jail.set_env("MONEYLIMIT_TELEGRAM_BOT_TOKEN", "new");

            let config: MoneyLimitConfig = Figment::new()
                .merge(Serialized::defaults(MoneyLimitConfig::default()))
                .merge(legacy_env_provider())
                .merge(env_provider())
                .extract()?;

            assert_eq!(config.telegram.bot_token.as_deref(), Some("new"));
            Ok(())
        });
    }
}
