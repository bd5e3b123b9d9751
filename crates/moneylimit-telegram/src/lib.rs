// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for MoneyLimit.
//!
//! Implements [`ChannelAdapter`] and [`PaymentAdapter`] for the Telegram Bot
//! API via teloxide: long polling, reply keyboards, invoices, and the
//! pre-checkout handshake.

pub mod handler;
pub mod keyboard;

use std::sync::Arc;

use async_trait::async_trait;
use moneylimit_config::model::TelegramConfig;
use moneylimit_core::error::MoneyLimitError;
use moneylimit_core::traits::{ChannelAdapter, PaymentAdapter, PluginAdapter};
use moneylimit_core::types::{
    AdapterType, ChatId, HealthStatus, InboundEvent, Invoice, MessageId, OutboundMessage,
};
use teloxide::prelude::*;
use teloxide::types::{ChatId as TgChatId, LabeledPrice};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram adapter implementing [`ChannelAdapter`] and [`PaymentAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    invoice: Arc<Invoice>,
    provider_token: Option<String>,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram adapter selling `invoice`.
    ///
    /// Requires `config.bot_token` to be set.
    pub fn new(config: TelegramConfig, invoice: Invoice) -> Result<Self, MoneyLimitError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            MoneyLimitError::Config("telegram.bot_token is required to serve".into())
        })?;

        if token.is_empty() {
            return Err(MoneyLimitError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            invoice: Arc::new(invoice),
            provider_token: config.payment_provider_token.filter(|t| !t.is_empty()),
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }
}

fn channel_error(action: &str, e: teloxide::RequestError) -> MoneyLimitError {
    MoneyLimitError::Channel {
        message: format!("failed to {action}: {e}"),
        source: Some(Box::new(e)),
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, MoneyLimitError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), MoneyLimitError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    async fn connect(&mut self) -> Result<(), MoneyLimitError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let tx = self.inbound_tx.clone();
        let invoice = Arc::clone(&self.invoice);

        info!("starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let messages = Update::filter_message().endpoint(move |msg: Message| {
                let tx = tx.clone();
                async move {
                    if !handler::is_dm(&msg) {
                        debug!(chat_id = msg.chat.id.0, "ignoring non-DM message");
                        return respond(());
                    }

                    if let Some(event) = handler::to_inbound_event(&msg)
                        && tx.send(event).await.is_err()
                    {
                        warn!("inbound channel closed, dropping event");
                    }

                    respond(())
                }
            });

            let pre_checkout =
                Update::filter_pre_checkout_query().endpoint(move |bot: Bot, query: PreCheckoutQuery| {
                    let invoice = Arc::clone(&invoice);
                    async move { handler::answer_pre_checkout(&bot, &query, &invoice).await }
                });

            let handler = teloxide::dptree::entry()
                .branch(messages)
                .branch(pre_checkout);

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, MoneyLimitError> {
        let mut request = self.bot.send_message(TgChatId(msg.chat_id.0), msg.text);
        if let Some(layout) = msg.keyboard {
            request = request.reply_markup(keyboard::reply_markup(layout));
        }
        let sent = request
            .await
            .map_err(|e| channel_error("send message", e))?;
        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn receive(&self) -> Result<InboundEvent, MoneyLimitError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv().await.ok_or_else(|| MoneyLimitError::Channel {
            message: "Telegram inbound channel closed".into(),
            source: None,
        })
    }
}

#[async_trait]
impl PaymentAdapter for TelegramChannel {
    async fn send_invoice(
        &self,
        chat_id: ChatId,
        invoice: &Invoice,
    ) -> Result<MessageId, MoneyLimitError> {
        let prices = vec![LabeledPrice::new(
            invoice.price_label.clone(),
            invoice.amount_minor,
        )];
        let mut request = self.bot.send_invoice(
            TgChatId(chat_id.0),
            invoice.title.clone(),
            invoice.description.clone(),
            invoice.payload.clone(),
            invoice.currency.clone(),
            prices,
        );
        if let Some(token) = &self.provider_token {
            request = request.provider_token(token.clone());
        }
        let sent = request
            .await
            .map_err(|e| MoneyLimitError::Payment {
                message: format!("failed to send invoice: {e}"),
            })?;
        Ok(MessageId(sent.id.0.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> Invoice {
        Invoice {
            title: "Доступ".into(),
            description: "30 дней".into(),
            payload: "access_30d".into(),
            currency: "RUB".into(),
            price_label: "30 дней".into(),
            amount_minor: 19900,
        }
    }

    fn config(token: Option<&str>) -> TelegramConfig {
        TelegramConfig {
            bot_token: token.map(str::to_string),
            payment_provider_token: Some("381764678:TEST:1".into()),
        }
    }

    #[test]
    fn new_requires_bot_token() {
        assert!(TelegramChannel::new(config(None), invoice()).is_err());
    }

    #[test]
    fn new_rejects_empty_token() {
        assert!(TelegramChannel::new(config(Some("")), invoice()).is_err());
    }

    #[test]
    fn new_accepts_valid_token() {
        let channel =
            TelegramChannel::new(config(Some("123456:ABC-DEF1234ghIkl")), invoice()).unwrap();
        assert_eq!(channel.provider_token.as_deref(), Some("381764678:TEST:1"));
    }

    #[test]
    fn empty_provider_token_is_treated_as_absent() {
        let cfg = TelegramConfig {
            bot_token: Some("test:token".into()),
            payment_provider_token: Some(String::new()),
        };
        let channel = TelegramChannel::new(cfg, invoice()).unwrap();
        assert!(channel.provider_token.is_none());
    }

    #[tokio::test]
    async fn plugin_adapter_metadata() {
        let channel = TelegramChannel::new(config(Some("test:token")), invoice()).unwrap();
        assert_eq!(channel.name(), "telegram");
        assert_eq!(channel.version(), semver::Version::new(0, 1, 0));
        assert_eq!(channel.adapter_type(), AdapterType::Channel);
        channel.shutdown().await.unwrap();
    }
}
