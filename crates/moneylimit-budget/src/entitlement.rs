// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Paid access extension.

use chrono::{Days, NaiveDate};
use moneylimit_core::UserBudget;

/// New expiry after adding `days` of access.
///
/// Unexpired access is extended from its current end; anything else restarts
/// from `today`.
pub fn extended_until(current: Option<NaiveDate>, today: NaiveDate, days: u32) -> NaiveDate {
    let base = match current {
        Some(until) if until > today => until,
        _ => today,
    };
    base.checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX)
}

/// Apply [`extended_until`] to a record and return the new expiry.
pub fn extend_entitlement(budget: &mut UserBudget, today: NaiveDate, days: u32) -> NaiveDate {
    let until = extended_until(budget.paid_until, today, days);
    budget.paid_until = Some(until);
    until
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneylimit_core::UserId;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 10).unwrap()
    }

    fn plus(days: u64) -> NaiveDate {
        today().checked_add_days(Days::new(days)).unwrap()
    }

    #[test]
    fn extends_from_future_expiry() {
        assert_eq!(extended_until(Some(plus(5)), today(), 30), plus(35));
    }

    #[test]
    fn restarts_from_today_without_entitlement() {
        assert_eq!(extended_until(None, today(), 30), plus(30));
    }

    #[test]
    fn restarts_from_today_when_lapsed() {
        let lapsed = today().pred_opt().unwrap();
        assert_eq!(extended_until(Some(lapsed), today(), 30), plus(30));
    }

    #[test]
    fn expiry_of_today_counts_as_lapsed_base() {
        // Access ending today is still valid today, but the extension starts now.
        assert_eq!(extended_until(Some(today()), today(), 30), plus(30));
    }

    #[test]
    fn extend_entitlement_writes_back() {
        let mut budget = crate::daily::setup(UserId(3), 1000, 10, today(), Some(plus(2)));
        let until = extend_entitlement(&mut budget, today(), 7);
        assert_eq!(until, plus(9));
        assert_eq!(budget.paid_until, Some(plus(9)));
    }
}
