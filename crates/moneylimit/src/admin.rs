// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `moneylimit stats` and `moneylimit grant`: the admin commands, run
//! against the database without starting the bot.

use moneylimit_agent::{admin, texts};
use moneylimit_config::model::MoneyLimitConfig;
use moneylimit_core::{Clock, MoneyLimitError, StorageAdapter, SystemClock, UserId};
use moneylimit_storage::SqliteStorage;

async fn open_storage(config: &MoneyLimitConfig) -> Result<SqliteStorage, MoneyLimitError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    Ok(storage)
}

pub async fn run_stats(config: &MoneyLimitConfig) -> Result<(), MoneyLimitError> {
    let storage = open_storage(config).await?;
    let text = stats_text(&storage, &SystemClock).await?;
    storage.close().await?;
    println!("{text}");
    Ok(())
}

pub async fn run_grant(
    config: &MoneyLimitConfig,
    user_id: i64,
    days: u32,
) -> Result<(), MoneyLimitError> {
    if days == 0 {
        return Err(MoneyLimitError::Config("days must be greater than 0".into()));
    }
    let storage = open_storage(config).await?;
    let text = grant_text(&storage, &SystemClock, UserId(user_id), days).await?;
    storage.close().await?;
    println!("{text}");
    Ok(())
}

async fn stats_text(
    storage: &dyn StorageAdapter,
    clock: &dyn Clock,
) -> Result<String, MoneyLimitError> {
    let report = admin::stats_report(storage, clock.today()).await?;
    Ok(texts::stats(&report))
}

async fn grant_text(
    storage: &dyn StorageAdapter,
    clock: &dyn Clock,
    user_id: UserId,
    days: u32,
) -> Result<String, MoneyLimitError> {
    Ok(
        match admin::grant_days(storage, user_id, days, clock.today()).await? {
            Some(until) => texts::grant_done(user_id, until),
            None => texts::grant_not_found(user_id),
        },
    )
}
