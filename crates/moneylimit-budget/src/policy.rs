// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing and bounds for user-typed numbers.

use chrono::{Days, NaiveDate};
use moneylimit_config::model::{BillingConfig, BudgetConfig};
use moneylimit_core::{UserBudget, UserId};

use crate::daily;
use crate::error::BudgetError;

/// Input bounds and access terms, resolved from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetPolicy {
    pub default_days: i64,
    pub max_days: i64,
    pub max_spend: i64,
    pub max_monthly_amount: i64,
    pub trial_days: u32,
    pub entitlement_days: u32,
}

impl Default for BudgetPolicy {
    fn default() -> Self {
        Self::from_config(&BudgetConfig::default(), &BillingConfig::default())
    }
}

impl BudgetPolicy {
    pub fn from_config(budget: &BudgetConfig, billing: &BillingConfig) -> Self {
        Self {
            default_days: i64::from(budget.default_days),
            max_days: i64::from(budget.max_days),
            max_spend: budget.max_spend,
            max_monthly_amount: budget.max_monthly_amount,
            trial_days: billing.trial_days,
            entitlement_days: billing.entitlement_days,
        }
    }

    /// Monthly amount typed during setup.
    pub fn parse_monthly_amount(&self, text: &str) -> Result<i64, BudgetError> {
        bounded_positive(text, self.max_monthly_amount)
    }

    /// Horizon typed during setup. Never fails: unusable input means the default.
    pub fn parse_days(&self, text: &str) -> i64 {
        match text.trim().parse::<i64>() {
            Ok(days) if days > 0 && days <= self.max_days => days,
            _ => self.default_days,
        }
    }

    /// A single spend.
    pub fn parse_spend(&self, text: &str) -> Result<i64, BudgetError> {
        bounded_positive(text, self.max_spend)
    }

    /// Create a record for a finished setup dialogue.
    ///
    /// A user re-running setup keeps whatever access they already had. A new
    /// user starts a trial.
    pub fn setup(
        &self,
        user_id: UserId,
        monthly_amount: i64,
        total_days: i64,
        today: NaiveDate,
        previous: Option<&UserBudget>,
    ) -> UserBudget {
        let paid_until = match previous {
            Some(existing) => existing.paid_until,
            None => self.trial_until(today),
        };
        daily::setup(user_id, monthly_amount, total_days, today, paid_until)
    }

    /// Record a spend against today's allowance.
    pub fn record_spend(&self, budget: &mut UserBudget, amount: i64) -> Result<(), BudgetError> {
        daily::record_spend(budget, amount, self.max_spend)
    }

    fn trial_until(&self, today: NaiveDate) -> Option<NaiveDate> {
        if self.trial_days == 0 {
            return None;
        }
        today.checked_add_days(Days::new(u64::from(self.trial_days)))
    }
}

fn bounded_positive(text: &str, max: i64) -> Result<i64, BudgetError> {
    let trimmed = text.trim();
    let amount: i64 = trimmed
        .parse()
        .map_err(|_| BudgetError::NotANumber(trimmed.to_string()))?;
    if amount <= 0 {
        return Err(BudgetError::NotPositive(amount));
    }
    if amount > max {
        return Err(BudgetError::TooLarge { amount, max });
    }
    Ok(amount)
}
