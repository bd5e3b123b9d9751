// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Administrative operations shared by the chat commands and the CLI.

use chrono::NaiveDate;
use moneylimit_budget::extend_entitlement;
use moneylimit_core::types::StatKey;
use moneylimit_core::{MoneyLimitError, StorageAdapter, UserId};
use tracing::info;

/// Snapshot of the usage counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsReport {
    pub day: NaiveDate,
    pub counters: Vec<(StatKey, i64)>,
    /// Distinct users active on `day`.
    pub active_today: i64,
    /// Users whose access covers `day`.
    pub entitled: i64,
}

pub async fn stats_report(
    storage: &dyn StorageAdapter,
    today: NaiveDate,
) -> Result<StatsReport, MoneyLimitError> {
    let mut counters = Vec::with_capacity(StatKey::ALL.len());
    for key in StatKey::ALL {
        counters.push((key, storage.get_stat(key).await?));
    }
    Ok(StatsReport {
        day: today,
        counters,
        active_today: storage.count_active(today).await?,
        entitled: storage.count_entitled(today).await?,
    })
}

/// Extend a user's access by `days` without a payment.
///
/// Returns the new expiry, or `None` when the user has no budget record.
pub async fn grant_days(
    storage: &dyn StorageAdapter,
    user_id: UserId,
    days: u32,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, MoneyLimitError> {
    let Some(mut budget) = storage.get_user(user_id).await? else {
        return Ok(None);
    };
    let until = extend_entitlement(&mut budget, today, days);
    storage.save_user(&budget).await?;
    info!(user_id = %user_id, days, until = %until, "access granted");
    Ok(Some(until))
}
