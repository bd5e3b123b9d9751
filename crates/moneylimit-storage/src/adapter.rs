// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::OnceCell;
use tracing::debug;

use moneylimit_config::model::StorageConfig;
use moneylimit_core::types::{PaymentRecord, StatKey};
use moneylimit_core::{
    AdapterType, HealthStatus, MoneyLimitError, PluginAdapter, StorageAdapter, UserBudget, UserId,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules. The
/// database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// The connection is not opened until [`StorageAdapter::initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, MoneyLimitError> {
        self.db.get().ok_or_else(|| MoneyLimitError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, MoneyLimitError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoneyLimitError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), MoneyLimitError> {
        let db =
            Database::open_with_options(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| MoneyLimitError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), MoneyLimitError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    // --- Budget records ---

    async fn get_user(&self, user_id: UserId) -> Result<Option<UserBudget>, MoneyLimitError> {
        queries::users::get_user(self.db()?, user_id).await
    }

    async fn save_user(&self, budget: &UserBudget) -> Result<(), MoneyLimitError> {
        queries::users::save_user(self.db()?, budget).await
    }

    async fn count_entitled(&self, today: NaiveDate) -> Result<i64, MoneyLimitError> {
        queries::users::count_entitled(self.db()?, today).await
    }

    // --- Counters ---

    async fn increment_stat(&self, key: StatKey, amount: i64) -> Result<(), MoneyLimitError> {
        queries::stats::increment(self.db()?, key, amount).await
    }

    async fn get_stat(&self, key: StatKey) -> Result<i64, MoneyLimitError> {
        queries::stats::get(self.db()?, key).await
    }

    // --- Daily activity ---

    async fn mark_activity(&self, day: NaiveDate, user_id: UserId) -> Result<(), MoneyLimitError> {
        queries::activity::mark(self.db()?, day, user_id).await
    }

    async fn count_active(&self, day: NaiveDate) -> Result<i64, MoneyLimitError> {
        queries::activity::count(self.db()?, day).await
    }

    // --- Payments ---

    async fn apply_payment(
        &self,
        payment: &PaymentRecord,
        extended: &UserBudget,
    ) -> Result<bool, MoneyLimitError> {
        queries::payments::apply(self.db()?, payment, extended).await
    }
}
