// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::MoneyLimitError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{PaymentRecord, StatKey, UserBudget, UserId};

/// Adapter for the keyed record store.
///
/// Each call is atomic on its own. Callers doing read-modify-write on a user
/// record get last-write-wins semantics.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), MoneyLimitError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), MoneyLimitError>;

    // --- Budget records ---

    /// Fetches a user's budget record, if onboarding has completed.
    async fn get_user(&self, user_id: UserId) -> Result<Option<UserBudget>, MoneyLimitError>;

    /// Inserts or overwrites a user's budget record.
    async fn save_user(&self, budget: &UserBudget) -> Result<(), MoneyLimitError>;

    /// Number of users whose entitlement covers `today`.
    async fn count_entitled(&self, today: NaiveDate) -> Result<i64, MoneyLimitError>;

    // --- Counters ---

    /// Adds `amount` to a named counter.
    async fn increment_stat(&self, key: StatKey, amount: i64) -> Result<(), MoneyLimitError>;

    /// Reads a named counter; unknown counters read as zero.
    async fn get_stat(&self, key: StatKey) -> Result<i64, MoneyLimitError>;

    // --- Daily activity ---

    /// Records that `user_id` was active on `day`. Repeated calls are no-ops.
    async fn mark_activity(&self, day: NaiveDate, user_id: UserId)
    -> Result<(), MoneyLimitError>;

    /// Distinct users active on `day`.
    async fn count_active(&self, day: NaiveDate) -> Result<i64, MoneyLimitError>;

    // --- Payments ---

    /// Applies a captured payment in one atomic step: records the charge and,
    /// only if its id was not seen before, saves `extended` and counts the
    /// payment.
    ///
    /// Returns `true` when the payment was applied, `false` for a duplicate.
    /// On error nothing is stored, so the same charge may be applied later.
    async fn apply_payment(
        &self,
        payment: &PaymentRecord,
        extended: &UserBudget,
    ) -> Result<bool, MoneyLimitError>;
}
