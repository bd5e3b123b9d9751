// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A clock tests can move by hand.

use std::sync::Mutex;

use chrono::{Days, NaiveDate};
use moneylimit_core::Clock;

/// Reports a fixed date until told otherwise.
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    pub fn set(&self, day: NaiveDate) {
        *self.today.lock().unwrap_or_else(|e| e.into_inner()) = day;
    }

    /// Move forward by `days` calendar days.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = today.checked_add_days(Days::new(days)) {
            *today = next;
        }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap_or_else(|e| e.into_inner())
    }
}
