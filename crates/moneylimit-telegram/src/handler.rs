// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update routing and conversion.
//!
//! Turns Telegram messages into channel-agnostic [`InboundEvent`]s and answers
//! pre-checkout queries against the configured [`Invoice`].

use moneylimit_core::types::{
    ChatId, InboundEvent, InboundMessage, Invoice, PaymentConfirmation, UserId,
};
use teloxide::prelude::*;
use teloxide::types::{ChatKind, SuccessfulPayment};
use tracing::{debug, info, warn};

/// Payment fields shared by pre-checkout queries and successful payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentFields {
    pub currency: String,
    pub total_amount: u32,
    pub invoice_payload: String,
    /// Only present once the charge went through.
    pub telegram_payment_charge_id: Option<String>,
}

impl From<&PreCheckoutQuery> for PaymentFields {
    fn from(query: &PreCheckoutQuery) -> Self {
        Self {
            currency: query.currency.clone(),
            total_amount: query.total_amount,
            invoice_payload: query.invoice_payload.clone(),
            telegram_payment_charge_id: None,
        }
    }
}

impl From<&SuccessfulPayment> for PaymentFields {
    fn from(payment: &SuccessfulPayment) -> Self {
        Self {
            currency: payment.currency.clone(),
            total_amount: payment.total_amount,
            invoice_payload: payment.invoice_payload.clone(),
            telegram_payment_charge_id: Some(payment.telegram_payment_charge_id.0.clone()),
        }
    }
}

/// Rejection reason shown by Telegram when the terms do not match.
pub const PRE_CHECKOUT_REJECTED: &str =
    "Счёт устарел. Нажмите «Оплатить доступ» ещё раз.";

/// Whether a pre-checkout query describes the invoice currently on sale.
pub fn check_pre_checkout(fields: &PaymentFields, invoice: &Invoice) -> Result<(), &'static str> {
    if invoice.matches(&fields.invoice_payload, &fields.currency, fields.total_amount) {
        Ok(())
    } else {
        Err(PRE_CHECKOUT_REJECTED)
    }
}

/// Answer a pre-checkout query. Telegram cancels the payment if this is late.
pub async fn answer_pre_checkout(
    bot: &Bot,
    query: &PreCheckoutQuery,
    invoice: &Invoice,
) -> ResponseResult<()> {
    let verdict = check_pre_checkout(&PaymentFields::from(query), invoice);

    let mut request = bot.answer_pre_checkout_query(query.id.clone(), verdict.is_ok());
    match verdict {
        Ok(()) => info!(user_id = query.from.id.0, "pre-checkout approved"),
        Err(reason) => {
            warn!(user_id = query.from.id.0, "pre-checkout rejected: terms mismatch");
            request = request.error_message(reason);
        }
    }
    request.await?;
    Ok(())
}

/// Checks whether the message is from a private (DM) chat.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Convert a Telegram message into an [`InboundEvent`].
///
/// Returns `None` for messages without a sender and for anything that is
/// neither text nor a successful payment.
pub fn to_inbound_event(msg: &Message) -> Option<InboundEvent> {
    let from = msg.from.as_ref()?;
    let sender = UserId(i64::try_from(from.id.0).ok()?);
    let chat_id = ChatId(msg.chat.id.0);

    if let Some(payment) = msg.successful_payment() {
        return payment_confirmation(sender, chat_id, PaymentFields::from(payment))
            .map(InboundEvent::PaymentConfirmed);
    }

    let Some(text) = msg.text() else {
        debug!(msg_id = msg.id.0, "ignoring unsupported message type");
        return None;
    };

    Some(InboundEvent::Message(InboundMessage {
        id: msg.id.0.to_string(),
        sender,
        chat_id,
        text: text.to_string(),
        timestamp: msg.date.to_rfc3339(),
    }))
}

/// Build a confirmation; a payment without a charge id cannot be deduplicated
/// and is dropped.
pub fn payment_confirmation(
    sender: UserId,
    chat_id: ChatId,
    fields: PaymentFields,
) -> Option<PaymentConfirmation> {
    let Some(charge_id) = fields.telegram_payment_charge_id.filter(|id| !id.is_empty()) else {
        warn!(user_id = %sender, "successful payment without a charge id");
        return None;
    };
    Some(PaymentConfirmation {
        sender,
        chat_id,
        charge_id,
        payload: fields.invoice_payload,
        currency: fields.currency,
        total_amount: fields.total_amount,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_private_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_no_sender_message(text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 1,
            "date": 1700000000i64,
            "chat": {
                "id": 12345i64,
                "type": "private",
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

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

    fn fields(payload: &str, currency: &str, amount: u32) -> PaymentFields {
        PaymentFields {
            currency: currency.into(),
            total_amount: amount,
            invoice_payload: payload.into(),
            telegram_payment_charge_id: None,
        }
    }

    #[test]
    fn text_message_becomes_inbound_event() {
        let msg = make_private_message(12345, "Сегодня");
        match to_inbound_event(&msg) {
            Some(InboundEvent::Message(inbound)) => {
                assert_eq!(inbound.id, "1");
                assert_eq!(inbound.sender, UserId(12345));
                assert_eq!(inbound.chat_id, ChatId(12345));
                assert_eq!(inbound.text, "Сегодня");
                assert!(inbound.timestamp.starts_with("2023-11-14"));
            }
            other => panic!("expected a message event, got {other:?}"),
        }
    }

    #[test]
    fn message_without_sender_is_dropped() {
        assert!(to_inbound_event(&make_no_sender_message("hi")).is_none());
    }

    #[test]
    fn is_dm_distinguishes_chat_kinds() {
        assert!(is_dm(&make_private_message(1, "x")));
        assert!(!is_dm(&make_group_message(1, "x")));
    }

    fn make_payment_message(user_id: u64, charge_id: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 7,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "successful_payment": {
                "currency": "RUB",
                "total_amount": 19900,
                "invoice_payload": "access_30d",
                "telegram_payment_charge_id": charge_id,
                "provider_payment_charge_id": "prov_1",
            },
        });

        serde_json::from_value(json).expect("failed to deserialize mock payment message")
    }

    #[test]
    fn successful_payment_becomes_confirmation() {
        let msg = make_payment_message(12345, "tg_charge_1");
        match to_inbound_event(&msg) {
            Some(InboundEvent::PaymentConfirmed(payment)) => {
                assert_eq!(payment.sender, UserId(12345));
                assert_eq!(payment.chat_id, ChatId(12345));
                assert_eq!(payment.charge_id, "tg_charge_1");
                assert_eq!(payment.payload, "access_30d");
                assert_eq!(payment.currency, "RUB");
                assert_eq!(payment.total_amount, 19900);
            }
            other => panic!("expected a payment event, got {other:?}"),
        }
    }

    #[test]
    fn successful_payment_with_empty_charge_id_is_dropped() {
        assert!(to_inbound_event(&make_payment_message(12345, "")).is_none());
    }

    #[test]
    fn pre_checkout_fields_come_from_the_query() {
        let query: PreCheckoutQuery = serde_json::from_value(serde_json::json!({
            "id": "q1",
            "from": { "id": 12345, "is_bot": false, "first_name": "Test" },
            "currency": "RUB",
            "total_amount": 19900,
            "invoice_payload": "access_30d",
        }))
        .expect("failed to deserialize mock pre-checkout query");

        let fields = PaymentFields::from(&query);
        assert_eq!(fields, PaymentFields {
            currency: "RUB".into(),
            total_amount: 19900,
            invoice_payload: "access_30d".into(),
            telegram_payment_charge_id: None,
        });
        assert_eq!(check_pre_checkout(&fields, &invoice()), Ok(()));
    }

    #[test]
    fn pre_checkout_requires_exact_terms() {
        let invoice = invoice();
        assert_eq!(
            check_pre_checkout(&fields("access_30d", "RUB", 19900), &invoice),
            Ok(())
        );
        assert!(check_pre_checkout(&fields("access_30d", "RUB", 100), &invoice).is_err());
        assert!(check_pre_checkout(&fields("access_30d", "USD", 19900), &invoice).is_err());
        assert!(check_pre_checkout(&fields("access_7d", "RUB", 19900), &invoice).is_err());
    }

    #[test]
    fn confirmation_requires_charge_id() {
        let mut f = fields("access_30d", "RUB", 19900);
        assert!(payment_confirmation(UserId(1), ChatId(1), f.clone()).is_none());

        f.telegram_payment_charge_id = Some("tg_1".into());
        let confirmation = payment_confirmation(UserId(1), ChatId(2), f).unwrap();
        assert_eq!(confirmation.charge_id, "tg_1");
        assert_eq!(confirmation.chat_id, ChatId(2));
        assert_eq!(confirmation.payload, "access_30d");
    }
}
