// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily allowance state transitions.
//!
//! A record moves forward one calendar day at a time: the previous day's
//! spending comes out of `money_left`, one day comes off the horizon, and the
//! allowance is recomputed from what is left.

use chrono::NaiveDate;
use moneylimit_core::{UserBudget, UserId};
use tracing::{debug, warn};

use crate::error::BudgetError;

/// Outcome of [`rollover`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollover {
    /// The record was already current.
    Unchanged,
    /// The record advanced by this many calendar days.
    Advanced { days: i64 },
    /// `today` is before the record's last date; nothing changed.
    ClockSkew { last_date: NaiveDate },
}

/// `money_left / days_left`, floored, never below zero.
pub fn daily_limit(money_left: i64, days_left: i64) -> i64 {
    money_left.div_euclid(days_left.max(1)).max(0)
}

/// Build a fresh record for a completed setup dialogue.
pub fn setup(
    user_id: UserId,
    monthly_amount: i64,
    total_days: i64,
    today: NaiveDate,
    paid_until: Option<NaiveDate>,
) -> UserBudget {
    let days_left = total_days.max(1);
    UserBudget {
        user_id,
        money_left: monthly_amount,
        days_left,
        daily_limit: daily_limit(monthly_amount, days_left),
        today_spent: 0,
        last_date: today,
        paid_until,
    }
}

/// Advance the record to `today`, closing every elapsed day.
///
/// Each elapsed day subtracts `today_spent`, shortens the horizon by one
/// (floor 1), recomputes the allowance, and zeroes `today_spent`. Only the
/// first closed day carries spending, so skipped days count as zero spend.
pub fn rollover(budget: &mut UserBudget, today: NaiveDate) -> Rollover {
    let elapsed = (today - budget.last_date).num_days();

    if elapsed == 0 {
        return Rollover::Unchanged;
    }

    if elapsed < 0 {
        warn!(
            user_id = %budget.user_id,
            last_date = %budget.last_date,
            today = %today,
            "date moved backwards; leaving budget untouched"
        );
        return Rollover::ClockSkew {
            last_date: budget.last_date,
        };
    }

    for _ in 0..elapsed {
        // Fixed point: nothing left to subtract and the horizon is at its floor.
        if budget.days_left <= 1 && budget.today_spent == 0 {
            break;
        }
        budget.money_left = budget.money_left.saturating_sub(budget.today_spent);
        budget.days_left = (budget.days_left - 1).max(1);
        budget.daily_limit = daily_limit(budget.money_left, budget.days_left);
        budget.today_spent = 0;
    }

    budget.daily_limit = daily_limit(budget.money_left, budget.days_left);
    budget.last_date = today;

    debug!(
        user_id = %budget.user_id,
        elapsed,
        money_left = budget.money_left,
        days_left = budget.days_left,
        daily_limit = budget.daily_limit,
        "budget rolled over"
    );

    Rollover::Advanced { days: elapsed }
}

/// Add a spend to today's total. The allowance itself is left alone.
pub fn record_spend(
    budget: &mut UserBudget,
    amount: i64,
    max_spend: i64,
) -> Result<(), BudgetError> {
    if amount <= 0 {
        return Err(BudgetError::NotPositive(amount));
    }
    if amount > max_spend {
        return Err(BudgetError::TooLarge {
            amount,
            max: max_spend,
        });
    }
    budget.today_spent = budget.today_spent.saturating_add(amount);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn setup_derives_floor_limit() {
        let budget = setup(UserId(1), 3000, 30, day(1), None);
        assert_eq!(budget.daily_limit, 100);
        assert_eq!(budget.days_left, 30);
        assert_eq!(budget.today_spent, 0);
        assert_eq!(budget.last_date, day(1));

        let budget = setup(UserId(1), 1000, 30, day(1), None);
        assert_eq!(budget.daily_limit, 33);
    }

    #[test]
    fn daily_limit_floors_and_clamps() {
        assert_eq!(daily_limit(2960, 29), 102);
        assert_eq!(daily_limit(-50, 10), 0);
        assert_eq!(daily_limit(10, 0), 10);
    }

    #[test]
    fn documented_scenario() {
        let mut budget = setup(UserId(1), 3000, 30, day(1), None);
        record_spend(&mut budget, 40, 1_000_000).unwrap();
        assert_eq!(budget.remaining_today(), 60);

        assert_eq!(rollover(&mut budget, day(2)), Rollover::Advanced { days: 1 });
        assert_eq!(budget.money_left, 2960);
        assert_eq!(budget.days_left, 29);
        assert_eq!(budget.daily_limit, 102);
        assert_eq!(budget.today_spent, 0);
        assert_eq!(budget.last_date, day(2));
    }

    #[test]
    fn rollover_same_day_is_noop() {
        let mut budget = setup(UserId(1), 3000, 30, day(1), None);
        record_spend(&mut budget, 70, 1_000_000).unwrap();
        let before = budget.clone();
        assert_eq!(rollover(&mut budget, day(1)), Rollover::Unchanged);
        assert_eq!(budget, before);
    }

    #[test]
    fn multi_day_gap_subtracts_pending_spend_once() {
        // Days the user never opened are treated as zero spend.
        let mut budget = setup(UserId(1), 3000, 30, day(1), None);
        record_spend(&mut budget, 40, 1_000_000).unwrap();

        assert_eq!(rollover(&mut budget, day(4)), Rollover::Advanced { days: 3 });
        assert_eq!(budget.money_left, 2960);
        assert_eq!(budget.days_left, 27);
        assert_eq!(budget.daily_limit, 2960 / 27);
        assert_eq!(budget.today_spent, 0);
    }

    #[test]
    fn days_left_floors_at_one() {
        let mut budget = setup(UserId(1), 500, 2, day(1), None);
        rollover(&mut budget, day(10));
        assert_eq!(budget.days_left, 1);
        assert_eq!(budget.daily_limit, 500);
    }

    #[test]
    fn overspending_drives_limit_to_zero() {
        let mut budget = setup(UserId(1), 100, 5, day(1), None);
        record_spend(&mut budget, 150, 1_000_000).unwrap();
        assert_eq!(budget.remaining_today(), -130);

        rollover(&mut budget, day(2));
        assert_eq!(budget.money_left, -50);
        assert_eq!(budget.daily_limit, 0);
    }

    #[test]
    fn clock_skew_leaves_record_untouched() {
        let mut budget = setup(UserId(1), 3000, 30, day(5), None);
        let before = budget.clone();
        assert_eq!(
            rollover(&mut budget, day(3)),
            Rollover::ClockSkew { last_date: day(5) }
        );
        assert_eq!(budget, before);
    }

    #[test]
    #[tracing_test::traced_test]
    fn clock_skew_is_logged() {
        let mut budget = setup(UserId(1), 3000, 30, day(5), None);
        rollover(&mut budget, day(4));
        assert!(logs_contain("date moved backwards"));
    }

    #[test]
    fn record_spend_rejects_out_of_range() {
        let mut budget = setup(UserId(1), 3000, 30, day(1), None);
        assert_eq!(
            record_spend(&mut budget, 0, 1_000_000),
            Err(BudgetError::NotPositive(0))
        );
        assert_eq!(
            record_spend(&mut budget, 1_000_001, 1_000_000),
            Err(BudgetError::TooLarge {
                amount: 1_000_001,
                max: 1_000_000
            })
        );
        assert_eq!(budget.today_spent, 0);
    }

    #[test]
    fn record_spend_accumulates_without_touching_limit() {
        let mut budget = setup(UserId(1), 3000, 30, day(1), None);
        record_spend(&mut budget, 10, 1_000_000).unwrap();
        record_spend(&mut budget, 25, 1_000_000).unwrap();
        assert_eq!(budget.today_spent, 35);
        assert_eq!(budget.daily_limit, 100);
    }
}
