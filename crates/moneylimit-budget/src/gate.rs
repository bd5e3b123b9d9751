// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Access gate in front of every budget action except onboarding.

use chrono::NaiveDate;
use moneylimit_core::{UserBudget, UserId};

/// Gate decision for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The configured administrator; never gated.
    Admin,
    /// Paid or trial access covering today.
    Entitled { until: NaiveDate },
    /// No access. `expired_on` is the last covered day, if there ever was one.
    Denied { expired_on: Option<NaiveDate> },
}

impl Access {
    pub fn is_granted(&self) -> bool {
        !matches!(self, Access::Denied { .. })
    }
}

/// Decides whether a user may touch their budget today.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessGate {
    admin: Option<UserId>,
}

impl AccessGate {
    pub fn new(admin: Option<UserId>) -> Self {
        Self { admin }
    }

    pub fn is_admin(&self, user_id: UserId) -> bool {
        self.admin == Some(user_id)
    }

    pub fn check(&self, budget: &UserBudget, today: NaiveDate) -> Access {
        if self.is_admin(budget.user_id) {
            return Access::Admin;
        }
        match budget.paid_until {
            Some(until) if until >= today => Access::Entitled { until },
            expired_on => Access::Denied { expired_on },
        }
    }
}
