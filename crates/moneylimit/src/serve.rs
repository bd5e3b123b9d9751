// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `moneylimit serve` command implementation.

use std::sync::Arc;

use moneylimit_agent::shutdown::install_signal_handler;
use moneylimit_agent::{invoice_from_config, BotEngine};
use moneylimit_config::model::MoneyLimitConfig;
use moneylimit_core::{ChannelAdapter, MoneyLimitError, PluginAdapter, StorageAdapter, SystemClock};
use moneylimit_storage::SqliteStorage;
use moneylimit_telegram::TelegramChannel;
use tracing::{info, warn};

/// Runs the bot: storage, Telegram polling, and the engine loop.
pub async fn run_serve(config: MoneyLimitConfig) -> Result<(), MoneyLimitError> {
    crate::init_tracing(&config.bot.log_level);

    info!("starting moneylimit serve");

    if config.bot.admin_id.is_none() {
        warn!("bot.admin_id is not set; /stats and /grant are disabled");
    }

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage: Arc<dyn StorageAdapter> = Arc::new(storage);

    let invoice = invoice_from_config(&config.billing);
    let mut telegram = TelegramChannel::new(config.telegram.clone(), invoice)?;
    if config.telegram.payment_provider_token.is_none() {
        warn!("telegram.payment_provider_token is not set; invoices will fail");
    }
    telegram.connect().await?;
    let telegram = Arc::new(telegram);

    let cancel = install_signal_handler();

    let engine = BotEngine::new(
        &config,
        storage,
        telegram.clone(),
        telegram.clone(),
        Arc::new(SystemClock),
    );

    let result = engine.run(cancel).await;

    if let Err(e) = telegram.shutdown().await {
        warn!(error = %e, "telegram adapter shutdown failed");
    }

    result?;
    info!("moneylimit serve shutdown complete");
    Ok(())
}
