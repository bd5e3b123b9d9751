// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging platform integrations.

use async_trait::async_trait;

use crate::error::MoneyLimitError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{InboundEvent, MessageId, OutboundMessage};

/// Adapter for bidirectional messaging channel integrations.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), MoneyLimitError>;

    /// Sends a message through the channel.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, MoneyLimitError>;

    /// Receives the next inbound event from the channel.
    async fn receive(&self) -> Result<InboundEvent, MoneyLimitError>;
}
