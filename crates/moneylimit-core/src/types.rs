// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the MoneyLimit workspace.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identity of a user on the messaging platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the chat a reply should be delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatId(pub i64);

/// Unique identifier for a delivered message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Payment,
}

/// Per-user budget record.
///
/// One record exists per user once onboarding completes. It is overwritten in
/// place and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserBudget {
    pub user_id: UserId,
    /// Money remaining for the rest of the period.
    pub money_left: i64,
    /// Days remaining in the period, never below 1.
    pub days_left: i64,
    /// Allowance for the current day, never below 0.
    pub daily_limit: i64,
    /// Spending recorded since the last rollover.
    pub today_spent: i64,
    /// Date the record was last rolled forward.
    pub last_date: NaiveDate,
    /// End of paid access. `None` means the user never had access.
    pub paid_until: Option<NaiveDate>,
}

impl UserBudget {
    /// What is left of today's allowance. Negative means over the limit.
    pub fn remaining_today(&self) -> i64 {
        self.daily_limit - self.today_spent
    }
}

/// Process-wide event counters.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum StatKey {
    Starts,
    SpentActions,
    PayClicks,
    Payments,
}

impl StatKey {
    /// All counters, in report order.
    pub const ALL: [StatKey; 4] = [
        StatKey::Starts,
        StatKey::SpentActions,
        StatKey::PayClicks,
        StatKey::Payments,
    ];
}

/// A payment already applied to a user's entitlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Provider charge id; unique per captured payment.
    pub charge_id: String,
    pub user_id: UserId,
    pub currency: String,
    pub total_amount: u32,
    pub payload: String,
    pub created_at: String,
}

/// Button labels shared by the transport (rendering) and the engine (routing).
pub mod labels {
    pub const BEGIN: &str = "Начать";
    pub const TODAY: &str = "Сегодня";
    pub const SPENT: &str = "Я потратил";
    pub const CHANGE_AMOUNT: &str = "Изменить сумму";
    pub const PAY: &str = "Оплатить доступ";
}

/// Fixed reply keyboard layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Keyboard {
    /// Single "begin" button shown before onboarding.
    Start,
    /// Daily actions shown to an onboarded user, including renewal.
    Main,
    /// Call-to-action shown when access has lapsed.
    Pay,
    /// Hide any keyboard.
    Remove,
}

impl Keyboard {
    /// Button rows, top to bottom. Empty for [`Keyboard::Remove`].
    pub fn rows(&self) -> Vec<Vec<&'static str>> {
        match self {
            Keyboard::Start => vec![vec![labels::BEGIN]],
            Keyboard::Main => vec![
                vec![labels::TODAY],
                vec![labels::SPENT],
                vec![labels::CHANGE_AMOUNT],
                vec![labels::PAY],
            ],
            Keyboard::Pay => vec![vec![labels::PAY]],
            Keyboard::Remove => Vec::new(),
        }
    }
}

/// A text message received from a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub id: String,
    pub sender: UserId,
    pub chat_id: ChatId,
    pub text: String,
    /// RFC 3339 timestamp assigned by the platform.
    pub timestamp: String,
}

/// A payment the provider has captured and the platform has confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub sender: UserId,
    pub chat_id: ChatId,
    pub charge_id: String,
    pub payload: String,
    pub currency: String,
    pub total_amount: u32,
}

/// Anything a channel can deliver to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Message(InboundMessage),
    PaymentConfirmed(PaymentConfirmation),
}

impl InboundEvent {
    /// The user who triggered the event.
    pub fn sender(&self) -> UserId {
        match self {
            InboundEvent::Message(m) => m.sender,
            InboundEvent::PaymentConfirmed(p) => p.sender,
        }
    }
}

/// A reply to be sent through a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub chat_id: ChatId,
    pub text: String,
    /// Keyboard to attach; `None` leaves the current keyboard in place.
    pub keyboard: Option<Keyboard>,
}

impl OutboundMessage {
    pub fn text(chat_id: ChatId, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}

/// Terms of the single product on sale: a fixed-length access extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub title: String,
    pub description: String,
    /// Opaque payload echoed back by the provider on pre-checkout and payment.
    pub payload: String,
    /// ISO 4217 currency code.
    pub currency: String,
    pub price_label: String,
    /// Price in the currency's minor units (e.g. kopecks).
    pub amount_minor: u32,
}

impl Invoice {
    /// Whether a provider callback describes this invoice.
    pub fn matches(&self, payload: &str, currency: &str, total_amount: u32) -> bool {
        self.payload == payload && self.currency == currency && self.amount_minor == total_amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_budget() -> UserBudget {
        UserBudget {
            user_id: UserId(7),
            money_left: 3000,
            days_left: 30,
            daily_limit: 100,
            today_spent: 40,
            last_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            paid_until: None,
        }
    }

    #[test]
    fn remaining_today_can_go_negative() {
        let mut budget = sample_budget();
        assert_eq!(budget.remaining_today(), 60);
        budget.today_spent = 130;
        assert_eq!(budget.remaining_today(), -30);
    }

    #[test]
    fn stat_keys_use_snake_case_names() {
        use std::str::FromStr;
        assert_eq!(StatKey::SpentActions.to_string(), "spent_actions");
        assert_eq!(StatKey::PayClicks.to_string(), "pay_clicks");
        assert_eq!(StatKey::from_str("starts").unwrap(), StatKey::Starts);
    }

    #[test]
    fn keyboard_layouts() {
        assert_eq!(Keyboard::Start.rows(), vec![vec!["Начать"]]);
        assert_eq!(Keyboard::Main.rows().len(), 4);
        assert_eq!(Keyboard::Main.rows().last(), Some(&vec![labels::PAY]));
        assert_eq!(Keyboard::Pay.rows(), vec![vec![labels::PAY]]);
        assert!(Keyboard::Remove.rows().is_empty());
    }

    #[test]
    fn invoice_matches_only_exact_terms() {
        let invoice = Invoice {
            title: "Access".into(),
            description: "30 days".into(),
            payload: "access_30d".into(),
            currency: "RUB".into(),
            price_label: "30 days".into(),
            amount_minor: 19900,
        };
        assert!(invoice.matches("access_30d", "RUB", 19900));
        assert!(!invoice.matches("access_30d", "USD", 19900));
        assert!(!invoice.matches("access_30d", "RUB", 100));
        assert!(!invoice.matches("other", "RUB", 19900));
    }

    #[test]
    fn user_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&UserId(42)).unwrap();
        assert_eq!(json, "42");
    }
}
