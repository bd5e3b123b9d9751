// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named counters.

use moneylimit_core::types::StatKey;
use moneylimit_core::MoneyLimitError;
use rusqlite::{params, Connection};

use crate::database::{map_tr_err, Database};

/// Add `amount` to a counter, creating it on first use.
pub async fn increment(db: &Database, key: StatKey, amount: i64) -> Result<(), MoneyLimitError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            bump(conn, &key, amount)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Counter increment on an open connection or transaction.
pub(crate) fn bump(conn: &Connection, key: &str, amount: i64) -> Result<usize, rusqlite::Error> {
    conn.execute(
        "INSERT INTO stats (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = value + excluded.value",
        params![key, amount],
    )
}

/// Read a counter. Counters never incremented read as zero.
pub async fn get(db: &Database, key: StatKey) -> Result<i64, MoneyLimitError> {
    let key = key.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COALESCE((SELECT value FROM stats WHERE key = ?1), 0)",
                params![key],
                |row| row.get(0),
            )
        })
        .await
        .map_err(map_tr_err)
}
