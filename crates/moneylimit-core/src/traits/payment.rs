// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment adapter trait for starting a payment collection flow.
//!
//! Confirmations travel back through [`ChannelAdapter::receive`] as
//! [`InboundEvent::PaymentConfirmed`].
//!
//! [`ChannelAdapter::receive`]: crate::traits::ChannelAdapter::receive
//! [`InboundEvent::PaymentConfirmed`]: crate::types::InboundEvent::PaymentConfirmed

use async_trait::async_trait;

use crate::error::MoneyLimitError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatId, Invoice, MessageId};

/// Adapter for an external invoicing provider.
#[async_trait]
pub trait PaymentAdapter: PluginAdapter {
    /// Presents an invoice to the user in the given chat.
    async fn send_invoice(
        &self,
        chat_id: ChatId,
        invoice: &Invoice,
    ) -> Result<MessageId, MoneyLimitError>;
}
