// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget record operations.

use chrono::NaiveDate;
use moneylimit_core::{MoneyLimitError, UserBudget, UserId};
use rusqlite::{params, Connection};

use crate::database::{map_tr_err, Database};

/// Fetch a user's budget record.
pub async fn get_user(db: &Database, user_id: UserId) -> Result<Option<UserBudget>, MoneyLimitError> {
    db.connection()
        .call(move |conn| -> Result<Option<UserBudget>, rusqlite::Error> {
            let result = conn.query_row(
                "SELECT user_id, money_left, days_left, daily_limit, today_spent, last_date, paid_until
                 FROM users WHERE user_id = ?1",
                params![user_id.0],
                |row| {
                    Ok(UserBudget {
                        user_id: UserId(row.get(0)?),
                        money_left: row.get(1)?,
                        days_left: row.get(2)?,
                        daily_limit: row.get(3)?,
                        today_spent: row.get(4)?,
                        last_date: row.get(5)?,
                        paid_until: row.get(6)?,
                    })
                },
            );
            match result {
                Ok(budget) => Ok(Some(budget)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or overwrite a user's budget record.
pub async fn save_user(db: &Database, budget: &UserBudget) -> Result<(), MoneyLimitError> {
    let budget = budget.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            upsert(conn, &budget)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Upsert on an open connection or transaction.
pub(crate) fn upsert(conn: &Connection, budget: &UserBudget) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "INSERT INTO users (user_id, money_left, days_left, daily_limit, today_spent, last_date, paid_until)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(user_id) DO UPDATE SET
            money_left = excluded.money_left,
            days_left = excluded.days_left,
            daily_limit = excluded.daily_limit,
            today_spent = excluded.today_spent,
            last_date = excluded.last_date,
            paid_until = excluded.paid_until",
        params![
            budget.user_id.0,
            budget.money_left,
            budget.days_left,
            budget.daily_limit,
            budget.today_spent,
            budget.last_date,
            budget.paid_until,
        ],
    )
}

/// Count users whose entitlement still covers `today`.
pub async fn count_entitled(db: &Database, today: NaiveDate) -> Result<i64, MoneyLimitError> {
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM users WHERE paid_until IS NOT NULL AND paid_until >= ?1",
                params![today],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}
