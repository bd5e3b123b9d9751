// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for MoneyLimit.
//!
//! The [`BotEngine`] is the central coordinator that:
//! - Receives events from a channel adapter
//! - Tracks each user's dialogue state
//! - Runs the access gate and the budget transitions
//! - Persists records and counters, and replies through the channel
//! - Applies confirmed payments exactly once

pub mod admin;
pub mod commands;
pub mod session;
pub mod shutdown;
pub mod texts;

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moneylimit_budget::{extend_entitlement, rollover, Access, AccessGate, BudgetPolicy, Rollover};
use moneylimit_config::model::{BillingConfig, MoneyLimitConfig};
use moneylimit_core::types::{
    ChatId, InboundEvent, InboundMessage, Invoice, Keyboard, OutboundMessage, PaymentConfirmation,
    PaymentRecord, StatKey,
};
use moneylimit_core::{
    ChannelAdapter, Clock, MoneyLimitError, PaymentAdapter, StorageAdapter, UserBudget, UserId,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::commands::{Command, GrantArgs};
use crate::session::{DialogueState, SessionStore};

/// How often expired dialogue states are swept from memory.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// The product on sale, built from `[billing]`.
pub fn invoice_from_config(billing: &BillingConfig) -> Invoice {
    Invoice {
        title: billing.title.clone(),
        description: billing.description.clone(),
        payload: format!("access_{}d", billing.entitlement_days),
        currency: billing.currency.clone(),
        price_label: billing.price_label.clone(),
        amount_minor: billing.price_minor,
    }
}

/// Routes inbound events through the access gate and the budget state machine.
pub struct BotEngine {
    storage: Arc<dyn StorageAdapter>,
    channel: Arc<dyn ChannelAdapter>,
    payments: Arc<dyn PaymentAdapter>,
    clock: Arc<dyn Clock>,
    sessions: SessionStore,
    gate: AccessGate,
    policy: BudgetPolicy,
    invoice: Invoice,
}

impl BotEngine {
    pub fn new(
        config: &MoneyLimitConfig,
        storage: Arc<dyn StorageAdapter>,
        channel: Arc<dyn ChannelAdapter>,
        payments: Arc<dyn PaymentAdapter>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let admin = config.bot.admin_id.map(UserId);
        info!(
            admin_configured = admin.is_some(),
            session_ttl_secs = config.bot.session_ttl_secs,
            "bot engine initialized"
        );

        Self {
            storage,
            channel,
            payments,
            clock,
            sessions: SessionStore::new(Duration::from_secs(config.bot.session_ttl_secs)),
            gate: AccessGate::new(admin),
            policy: BudgetPolicy::from_config(&config.budget, &config.billing),
            invoice: invoice_from_config(&config.billing),
        }
    }

    /// Dialogue state currently held for a user.
    pub fn dialogue_state(&self, user_id: UserId) -> DialogueState {
        self.sessions.get(user_id)
    }

    /// Runs the event loop until the cancellation token fires or the channel closes.
    ///
    /// A failure while handling one event is logged and does not stop the loop.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), MoneyLimitError> {
        info!("bot engine running");

        let mut sweep = tokio::time::interval(SESSION_SWEEP_INTERVAL);

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => {
                            let user_id = event.sender();
                            if let Err(e) = self.handle(event).await {
                                error!(user_id = %user_id, error = %e, "failed to handle inbound event");
                            }
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error, stopping");
                            break;
                        }
                    }
                }
                _ = sweep.tick() => {
                    let removed = self.sessions.purge_expired();
                    if removed > 0 {
                        debug!(removed, "expired dialogue states dropped");
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping bot engine");
                    break;
                }
            }
        }

        self.storage.close().await?;

        info!("bot engine stopped");
        Ok(())
    }

    /// Handles a single inbound event.
    ///
    /// Payment failures are logged here and never reach the user.
    pub async fn handle(&self, event: InboundEvent) -> Result<(), MoneyLimitError> {
        match event {
            InboundEvent::Message(msg) => self.handle_message(msg).await,
            InboundEvent::PaymentConfirmed(payment) => {
                if let Err(e) = self.handle_payment(&payment).await {
                    error!(
                        user_id = %payment.sender,
                        charge_id = %payment.charge_id,
                        error = %e,
                        "failed to apply payment"
                    );
                }
                Ok(())
            }
        }
    }

    async fn handle_message(&self, msg: InboundMessage) -> Result<(), MoneyLimitError> {
        let user_id = msg.sender;
        let chat_id = msg.chat_id;
        let today = self.clock.today();
        let command = commands::parse(&msg.text);

        debug!(user_id = %user_id, command = ?command, "inbound message");

        // Any button or command abandons a half-finished dialogue.
        if !matches!(command, Command::Text(_)) {
            self.sessions.clear(user_id);
        }

        match command {
            Command::Start => self.start(user_id, chat_id, today).await,
            Command::Begin => self.begin(user_id, chat_id, today).await,
            Command::Today => self.today(user_id, chat_id, today).await,
            Command::Spent => self.spent(user_id, chat_id, today).await,
            Command::ChangeAmount => self.change_amount(user_id, chat_id, today).await,
            Command::Pay => self.pay(user_id, chat_id, today).await,
            Command::Stats => self.stats(user_id, chat_id, today).await,
            Command::Grant(args) => self.grant(user_id, chat_id, today, args).await,
            Command::Text(text) => self.free_text(user_id, chat_id, today, &text).await,
        }
    }

    // --- Actions ---

    async fn start(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        self.storage.increment_stat(StatKey::Starts, 1).await?;
        self.storage.mark_activity(today, user_id).await?;
        self.reply(chat_id, texts::intro(), Some(Keyboard::Start)).await
    }

    async fn begin(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        // Onboarding is open to everyone; re-running setup is not.
        if let Some(budget) = self.storage.get_user(user_id).await?
            && !self.admit(&budget, chat_id, today).await?
        {
            return Ok(());
        }
        self.sessions.set(user_id, DialogueState::AwaitingAmount);
        self.reply(chat_id, texts::ask_monthly_amount(), Some(Keyboard::Remove))
            .await
    }

    async fn today(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        // Opening the view counts toward DAU even when it is then refused.
        self.storage.mark_activity(today, user_id).await?;
        let Some(mut budget) = self.gated_record(user_id, chat_id, today).await? else {
            return Ok(());
        };
        self.roll_forward(&mut budget, today).await?;
        self.reply(chat_id, texts::today(&budget), Some(Keyboard::Main))
            .await
    }

    async fn spent(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        if self.gated_record(user_id, chat_id, today).await?.is_none() {
            return Ok(());
        }
        self.sessions.set(user_id, DialogueState::AwaitingSpend);
        self.reply(chat_id, texts::ask_spend(), None).await
    }

    async fn change_amount(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        if self.gated_record(user_id, chat_id, today).await?.is_none() {
            return Ok(());
        }
        self.sessions.set(user_id, DialogueState::AwaitingAmount);
        self.reply(chat_id, texts::ask_monthly_amount(), Some(Keyboard::Remove))
            .await
    }

    async fn pay(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        self.storage.increment_stat(StatKey::PayClicks, 1).await?;
        self.storage.mark_activity(today, user_id).await?;

        match self.payments.send_invoice(chat_id, &self.invoice).await {
            Ok(_) => {
                info!(user_id = %user_id, payload = %self.invoice.payload, "invoice sent");
                Ok(())
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "failed to send invoice");
                self.reply(chat_id, texts::invoice_failed(), Some(Keyboard::Pay))
                    .await
            }
        }
    }

    async fn stats(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        if !self.gate.is_admin(user_id) {
            debug!(user_id = %user_id, "ignoring /stats from non-admin");
            return Ok(());
        }
        let report = admin::stats_report(self.storage.as_ref(), today).await?;
        self.reply(chat_id, texts::stats(&report), None).await
    }

    async fn grant(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
        args: Option<GrantArgs>,
    ) -> Result<(), MoneyLimitError> {
        if !self.gate.is_admin(user_id) {
            debug!(user_id = %user_id, "ignoring /grant from non-admin");
            return Ok(());
        }
        let Some(GrantArgs { user_id: target, days }) = args else {
            return self.reply(chat_id, texts::grant_usage(), None).await;
        };
        let text = match admin::grant_days(self.storage.as_ref(), target, days, today).await? {
            Some(until) => texts::grant_done(target, until),
            None => texts::grant_not_found(target),
        };
        self.reply(chat_id, text, None).await
    }

    // --- Dialogue input ---

    async fn free_text(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
        text: &str,
    ) -> Result<(), MoneyLimitError> {
        match self.sessions.get(user_id) {
            DialogueState::Idle => {
                let keyboard = match self.storage.get_user(user_id).await? {
                    Some(_) => Keyboard::Main,
                    None => Keyboard::Start,
                };
                self.reply(chat_id, texts::use_buttons(), Some(keyboard)).await
            }
            DialogueState::AwaitingAmount => self.amount_input(user_id, chat_id, text).await,
            DialogueState::AwaitingDays { monthly_amount } => {
                self.days_input(user_id, chat_id, today, monthly_amount, text)
                    .await
            }
            DialogueState::AwaitingSpend => self.spend_input(user_id, chat_id, today, text).await,
        }
    }

    async fn amount_input(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        text: &str,
    ) -> Result<(), MoneyLimitError> {
        match self.policy.parse_monthly_amount(text) {
            Ok(monthly_amount) => {
                self.sessions
                    .set(user_id, DialogueState::AwaitingDays { monthly_amount });
                self.reply(chat_id, texts::ask_days(self.policy.default_days), None)
                    .await
            }
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "rejected monthly amount");
                self.sessions.set(user_id, DialogueState::AwaitingAmount);
                self.reply(chat_id, texts::invalid_amount(&e), None).await
            }
        }
    }

    async fn days_input(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
        monthly_amount: i64,
        text: &str,
    ) -> Result<(), MoneyLimitError> {
        let total_days = self.policy.parse_days(text);
        let previous = self.storage.get_user(user_id).await?;

        if let Some(existing) = &previous
            && !self.admit(existing, chat_id, today).await?
        {
            self.sessions.clear(user_id);
            return Ok(());
        }

        let budget = self
            .policy
            .setup(user_id, monthly_amount, total_days, today, previous.as_ref());
        self.storage.save_user(&budget).await?;
        self.sessions.clear(user_id);

        info!(
            user_id = %user_id,
            monthly_amount,
            total_days,
            daily_limit = budget.daily_limit,
            resetup = previous.is_some(),
            "budget set up"
        );

        self.reply(chat_id, texts::setup_done(budget.daily_limit), Some(Keyboard::Main))
            .await
    }

    async fn spend_input(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
        text: &str,
    ) -> Result<(), MoneyLimitError> {
        let amount = match self.policy.parse_spend(text) {
            Ok(amount) => amount,
            Err(e) => {
                debug!(user_id = %user_id, error = %e, "rejected spend");
                self.sessions.set(user_id, DialogueState::AwaitingSpend);
                return self.reply(chat_id, texts::invalid_spend(&e), None).await;
            }
        };

        self.sessions.clear(user_id);
        let Some(mut budget) = self.gated_record(user_id, chat_id, today).await? else {
            return Ok(());
        };

        rollover(&mut budget, today);
        self.policy
            .record_spend(&mut budget, amount)
            .map_err(|e| MoneyLimitError::Internal(format!("validated spend rejected: {e}")))?;
        self.storage.save_user(&budget).await?;
        self.storage.increment_stat(StatKey::SpentActions, 1).await?;
        self.storage.mark_activity(today, user_id).await?;

        debug!(
            user_id = %user_id,
            amount,
            today_spent = budget.today_spent,
            "spend recorded"
        );

        self.reply(
            chat_id,
            texts::spend_recorded(budget.remaining_today()),
            Some(Keyboard::Main),
        )
        .await
    }

    // --- Payments ---

    async fn handle_payment(&self, payment: &PaymentConfirmation) -> Result<(), MoneyLimitError> {
        let user_id = payment.sender;
        let today = self.clock.today();

        if !self
            .invoice
            .matches(&payment.payload, &payment.currency, payment.total_amount)
        {
            warn!(
                user_id = %user_id,
                payload = %payment.payload,
                currency = %payment.currency,
                total_amount = payment.total_amount,
                "captured payment does not match current invoice terms"
            );
        }

        // A user can pay before finishing setup; keep the access on an empty record.
        let mut budget = match self.storage.get_user(user_id).await? {
            Some(budget) => budget,
            None => moneylimit_budget::setup(user_id, 0, self.policy.default_days, today, None),
        };
        let until = extend_entitlement(&mut budget, today, self.policy.entitlement_days);

        let record = PaymentRecord {
            charge_id: payment.charge_id.clone(),
            user_id,
            currency: payment.currency.clone(),
            total_amount: payment.total_amount,
            payload: payment.payload.clone(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        if !self.storage.apply_payment(&record, &budget).await? {
            info!(user_id = %user_id, charge_id = %payment.charge_id, "duplicate payment ignored");
            return Ok(());
        }

        info!(
            user_id = %user_id,
            charge_id = %payment.charge_id,
            until = %until,
            "payment applied"
        );

        self.reply(payment.chat_id, texts::payment_confirmed(until), Some(Keyboard::Main))
            .await
    }

    // --- Helpers ---

    /// Load the caller's record and run the gate. Sends the onboarding hint or
    /// the denial itself and returns `None` when the action must stop.
    async fn gated_record(
        &self,
        user_id: UserId,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<Option<UserBudget>, MoneyLimitError> {
        let Some(budget) = self.storage.get_user(user_id).await? else {
            self.reply(chat_id, texts::need_setup(), Some(Keyboard::Start))
                .await?;
            return Ok(None);
        };
        if !self.admit(&budget, chat_id, today).await? {
            return Ok(None);
        }
        Ok(Some(budget))
    }

    /// Run the gate; on denial, send the call to action.
    async fn admit(
        &self,
        budget: &UserBudget,
        chat_id: ChatId,
        today: NaiveDate,
    ) -> Result<bool, MoneyLimitError> {
        match self.gate.check(budget, today) {
            Access::Denied { expired_on } => {
                info!(user_id = %budget.user_id, "access denied");
                self.reply(chat_id, texts::access_denied(expired_on), Some(Keyboard::Pay))
                    .await?;
                Ok(false)
            }
            Access::Admin | Access::Entitled { .. } => Ok(true),
        }
    }

    /// Apply any pending rollover and persist it.
    async fn roll_forward(
        &self,
        budget: &mut UserBudget,
        today: NaiveDate,
    ) -> Result<(), MoneyLimitError> {
        if let Rollover::Advanced { .. } = rollover(budget, today) {
            self.storage.save_user(budget).await?;
        }
        Ok(())
    }

    async fn reply(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> Result<(), MoneyLimitError> {
        let mut msg = OutboundMessage::text(chat_id, text);
        if let Some(keyboard) = keyboard {
            msg = msg.with_keyboard(keyboard);
        }
        self.channel.send(msg).await?;
        Ok(())
    }
}
