// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for the allowance arithmetic.

use chrono::{Days, NaiveDate};
use moneylimit_budget::{
    daily_limit, extended_until, record_spend, rollover, setup, Access, AccessGate, Rollover,
};
use moneylimit_core::UserId;
use proptest::prelude::*;

const MAX_SPEND: i64 = 1_000_000;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 1).unwrap()
}

fn after(days: u64) -> NaiveDate {
    start().checked_add_days(Days::new(days)).unwrap()
}

proptest! {
    #[test]
    fn setup_limit_is_floor_of_ratio(monthly in 1i64..1_000_000_000, days in 1i64..=366) {
        let budget = setup(UserId(1), monthly, days, start(), None);
        prop_assert_eq!(budget.daily_limit, monthly / days);
        prop_assert_eq!(budget.days_left, days);
        prop_assert_eq!(budget.today_spent, 0);
    }

    #[test]
    fn rollover_is_idempotent_within_a_day(
        monthly in 1i64..1_000_000,
        days in 1i64..=60,
        spend in 1i64..=MAX_SPEND,
        gap in 0u64..90,
    ) {
        let mut budget = setup(UserId(1), monthly, days, start(), None);
        record_spend(&mut budget, spend, MAX_SPEND).unwrap();
        rollover(&mut budget, after(gap));
        let once = budget.clone();
        prop_assert_eq!(rollover(&mut budget, after(gap)), Rollover::Unchanged);
        prop_assert_eq!(budget, once);
    }

    #[test]
    fn daily_spends_accumulate(
        monthly in 1i64..1_000_000_000,
        days in 1i64..=60,
        spend in 1i64..=10_000,
        n in 1u64..40,
    ) {
        let mut budget = setup(UserId(1), monthly, days, start(), None);
        for d in 0..n {
            rollover(&mut budget, after(d));
            record_spend(&mut budget, spend, MAX_SPEND).unwrap();
        }
        rollover(&mut budget, after(n));

        prop_assert_eq!(budget.money_left, monthly - (n as i64) * spend);
        prop_assert_eq!(budget.days_left, (days - n as i64).max(1));
        prop_assert_eq!(budget.today_spent, 0);
    }

    #[test]
    fn limit_invariant_holds_after_rollover(
        monthly in 1i64..1_000_000,
        days in 1i64..=60,
        spend in 1i64..=MAX_SPEND,
        gap in 1u64..400,
    ) {
        let mut budget = setup(UserId(1), monthly, days, start(), None);
        record_spend(&mut budget, spend, MAX_SPEND).unwrap();
        rollover(&mut budget, after(gap));
        prop_assert!(budget.days_left >= 1);
        prop_assert!(budget.daily_limit >= 0);
        prop_assert_eq!(budget.daily_limit, daily_limit(budget.money_left, budget.days_left));
    }

    #[test]
    fn record_spend_never_decreases_today_spent(
        spends in proptest::collection::vec(-10i64..2_000_000, 1..20),
    ) {
        let mut budget = setup(UserId(1), 3000, 30, start(), None);
        for amount in spends {
            let before = budget.today_spent;
            let _ = record_spend(&mut budget, amount, MAX_SPEND);
            prop_assert!(budget.today_spent >= before);
        }
    }

    #[test]
    fn gate_requires_unexpired_access(offset in -60i64..60, user in 2i64..1000) {
        let gate = AccessGate::new(Some(UserId(1)));
        let today = after(100);
        let until = if offset >= 0 {
            today.checked_add_days(Days::new(offset as u64)).unwrap()
        } else {
            today.checked_sub_days(Days::new(offset.unsigned_abs())).unwrap()
        };
        let budget = setup(UserId(user), 1000, 10, start(), Some(until));
        prop_assert_eq!(gate.check(&budget, today).is_granted(), offset >= 0);

        let admin = setup(UserId(1), 1000, 10, start(), Some(until));
        prop_assert_eq!(gate.check(&admin, today), Access::Admin);
    }

    #[test]
    fn extension_never_shortens_access(current in 0u64..200, days in 1u32..400) {
        let today = after(100);
        let until = extended_until(Some(after(current)), today, days);
        prop_assert!(until > today);
        prop_assert!(until >= after(current));
    }
}

#[test]
fn documented_scenario_end_to_end() {
    let mut budget = setup(UserId(9), 3000, 30, start(), Some(after(30)));
    assert_eq!(budget.daily_limit, 100);

    record_spend(&mut budget, 40, MAX_SPEND).unwrap();
    assert_eq!(budget.remaining_today(), 60);

    rollover(&mut budget, after(1));
    assert_eq!(
        (budget.money_left, budget.days_left, budget.daily_limit, budget.today_spent),
        (2960, 29, 102, 0)
    );
}

#[test]
fn extension_examples() {
    let today = after(10);
    assert_eq!(extended_until(Some(after(15)), today, 30), after(45));
    assert_eq!(extended_until(None, today, 30), after(40));
}
