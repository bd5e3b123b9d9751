// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captured outbound messages for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use moneylimit_core::types::{
    ChatId, InboundEvent, InboundMessage, OutboundMessage, PaymentConfirmation,
};
use moneylimit_core::{
    AdapterType, ChannelAdapter, HealthStatus, MessageId, MoneyLimitError, PluginAdapter, UserId,
};

/// A mock messaging channel for testing.
///
/// Provides two queues:
/// - **inbound**: Events injected via `inject_event()` are returned by `receive()`
/// - **sent**: Messages passed to `send()` are captured and retrievable via `sent_messages()`
///
/// Once closed and drained, `receive()` fails, which stops a running engine.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    sent: Arc<Mutex<Vec<OutboundMessage>>>,
    notify: Arc<Notify>,
    closed: AtomicBool,
    next_id: AtomicU64,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
            next_id: AtomicU64::new(1),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Inject a private-chat text message from `user`.
    pub async fn inject_text(&self, user: UserId, text: &str) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.inject_event(InboundEvent::Message(InboundMessage {
            id: id.to_string(),
            sender: user,
            chat_id: ChatId(user.0),
            text: text.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }))
        .await;
    }

    /// Inject a confirmed payment from `user`.
    pub async fn inject_payment(&self, payment: PaymentConfirmation) {
        self.inject_event(InboundEvent::PaymentConfirmed(payment)).await;
    }

    /// Make `receive()` fail once the queue is empty.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Clear all sent messages.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, MoneyLimitError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoneyLimitError> {
        self.close();
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    async fn connect(&mut self) -> Result<(), MoneyLimitError> {
        Ok(())
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, MoneyLimitError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.sent.lock().await.push(msg);
        Ok(MessageId(format!("mock-msg-{id}")))
    }

    async fn receive(&self) -> Result<InboundEvent, MoneyLimitError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
            }
            if self.closed.load(Ordering::SeqCst) {
                return Err(MoneyLimitError::Channel {
                    message: "mock channel closed".to_string(),
                    source: None,
                });
            }
            self.notify.notified().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receive_returns_injected_events_in_order() {
        let channel = MockChannel::new();
        channel.inject_text(UserId(7), "first").await;
        channel.inject_text(UserId(7), "second").await;

        let InboundEvent::Message(first) = channel.receive().await.unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(first.text, "first");
        assert_eq!(first.chat_id, ChatId(7));

        let InboundEvent::Message(second) = channel.receive().await.unwrap() else {
            panic!("expected a message");
        };
        assert_eq!(second.text, "second");
    }

    #[tokio::test]
    async fn send_captures_outbound_messages() {
        let channel = MockChannel::new();
        let id = channel
            .send(OutboundMessage::text(ChatId(1), "hello"))
            .await
            .unwrap();
        assert!(id.0.starts_with("mock-msg-"));

        let sent = channel.sent_messages().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].text, "hello");

        channel.clear_sent().await;
        assert_eq!(channel.sent_count().await, 0);
    }

    #[tokio::test]
    async fn closed_channel_fails_after_draining() {
        let channel = MockChannel::new();
        channel.inject_text(UserId(1), "last").await;
        channel.close();

        assert!(channel.receive().await.is_ok());
        assert!(matches!(
            channel.receive().await,
            Err(MoneyLimitError::Channel { .. })
        ));
    }
}
