// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Daily activity set.

use chrono::NaiveDate;
use moneylimit_core::{MoneyLimitError, UserId};
use rusqlite::params;

use crate::database::{map_tr_err, Database};

/// Record that a user was active on `day`.
pub async fn mark(db: &Database, day: NaiveDate, user_id: UserId) -> Result<(), MoneyLimitError> {
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT OR IGNORE INTO daily_activity (day, user_id) VALUES (?1, ?2)",
                params![day, user_id.0],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Distinct users active on `day`.
pub async fn count(db: &Database, day: NaiveDate) -> Result<i64, MoneyLimitError> {
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM daily_activity WHERE day = ?1",
                params![day],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}
