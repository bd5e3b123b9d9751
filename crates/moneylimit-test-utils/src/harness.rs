// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a [`BotEngine`] with mock adapters, a fixed clock,
//! and a temp SQLite database. `send()` and `pay()` drive single events
//! through the engine and return the replies they produced.

use std::sync::Arc;

use chrono::NaiveDate;
use moneylimit_agent::BotEngine;
use moneylimit_config::model::{MoneyLimitConfig, StorageConfig};
use moneylimit_core::types::{
    ChatId, InboundEvent, InboundMessage, OutboundMessage, PaymentConfirmation,
};
use moneylimit_core::{MoneyLimitError, StorageAdapter, UserBudget, UserId};
use moneylimit_storage::SqliteStorage;

use crate::clock::FixedClock;
use crate::mock_channel::MockChannel;
use crate::mock_payments::MockPayments;

/// Wraps the harness's SQLite storage, e.g. to inject failures.
type StorageLayer = Box<dyn FnOnce(Arc<dyn StorageAdapter>) -> Arc<dyn StorageAdapter>>;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    config: MoneyLimitConfig,
    today: NaiveDate,
    storage_layer: Option<StorageLayer>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            config: MoneyLimitConfig::default(),
            today: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap_or_default(),
            storage_layer: None,
        }
    }

    /// Configure the admin user id.
    pub fn with_admin(mut self, admin: i64) -> Self {
        self.config.bot.admin_id = Some(admin);
        self
    }

    /// Pin the clock's starting date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Free days granted on first setup.
    pub fn with_trial_days(mut self, days: u32) -> Self {
        self.config.billing.trial_days = days;
        self
    }

    /// Replace the whole configuration. Storage settings are still overridden.
    pub fn with_config(mut self, config: MoneyLimitConfig) -> Self {
        self.config = config;
        self
    }

    /// Put `layer` between the engine and the temp database.
    pub fn with_storage_layer<F>(mut self, layer: F) -> Self
    where
        F: FnOnce(Arc<dyn StorageAdapter>) -> Arc<dyn StorageAdapter> + 'static,
    {
        self.storage_layer = Some(Box::new(layer));
        self
    }

    /// Build the test harness, creating all required subsystems.
    pub async fn build(self) -> Result<TestHarness, MoneyLimitError> {
        let temp_dir = tempfile::TempDir::new().map_err(MoneyLimitError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = self.config;
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        };

        let storage = SqliteStorage::new(config.storage.clone());
        storage.initialize().await?;
        let mut storage: Arc<dyn StorageAdapter> = Arc::new(storage);
        if let Some(layer) = self.storage_layer {
            storage = layer(storage);
        }

        let channel = Arc::new(MockChannel::new());
        let payments = Arc::new(MockPayments::new());
        let clock = Arc::new(FixedClock::new(self.today));

        let engine = BotEngine::new(
            &config,
            storage.clone(),
            channel.clone(),
            payments.clone(),
            clock.clone(),
        );

        Ok(TestHarness {
            engine,
            channel,
            payments,
            clock,
            storage,
            config,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with mock adapters and temp storage.
pub struct TestHarness {
    /// The engine under test.
    pub engine: BotEngine,
    /// The mock channel adapter.
    pub channel: Arc<MockChannel>,
    /// The mock invoicing provider.
    pub payments: Arc<MockPayments>,
    /// The clock the engine reads "today" from.
    pub clock: Arc<FixedClock>,
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<dyn StorageAdapter>,
    /// Configuration the engine was built from.
    pub config: MoneyLimitConfig,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Deliver a private-chat text from `user` and return the replies it produced.
    pub async fn send(
        &self,
        user: i64,
        text: &str,
    ) -> Result<Vec<OutboundMessage>, MoneyLimitError> {
        let event = InboundEvent::Message(InboundMessage {
            id: format!("{user}-{}", self.channel.sent_count().await),
            sender: UserId(user),
            chat_id: ChatId(user),
            text: text.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        self.deliver(event).await
    }

    /// Deliver a payment confirmation matching the configured invoice.
    pub async fn pay(
        &self,
        user: i64,
        charge_id: &str,
    ) -> Result<Vec<OutboundMessage>, MoneyLimitError> {
        let invoice = moneylimit_agent::invoice_from_config(&self.config.billing);
        self.deliver(InboundEvent::PaymentConfirmed(PaymentConfirmation {
            sender: UserId(user),
            chat_id: ChatId(user),
            charge_id: charge_id.to_string(),
            payload: invoice.payload,
            currency: invoice.currency,
            total_amount: invoice.amount_minor,
        }))
        .await
    }

    /// Deliver any event and return the replies it produced.
    pub async fn deliver(
        &self,
        event: InboundEvent,
    ) -> Result<Vec<OutboundMessage>, MoneyLimitError> {
        let before = self.channel.sent_count().await;
        self.engine.handle(event).await?;
        let sent = self.channel.sent_messages().await;
        Ok(sent[before..].to_vec())
    }

    /// Text of the last reply from a batch, or an empty string.
    pub fn last_text(replies: &[OutboundMessage]) -> &str {
        replies.last().map(|m| m.text.as_str()).unwrap_or_default()
    }

    /// The stored budget record for `user`.
    pub async fn budget(&self, user: i64) -> Result<Option<UserBudget>, MoneyLimitError> {
        self.storage.get_user(UserId(user)).await
    }

    /// Walk `user` through onboarding with the given amount and day count.
    pub async fn onboard(&self, user: i64, amount: &str, days: &str) -> Result<(), MoneyLimitError> {
        self.send(user, "/start").await?;
        self.send(user, moneylimit_core::types::labels::BEGIN).await?;
        self.send(user, amount).await?;
        self.send(user, days).await?;
        Ok(())
    }
}
