// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Processed payment ledger.

use moneylimit_core::types::{PaymentRecord, StatKey};
use moneylimit_core::{MoneyLimitError, UserBudget};
use rusqlite::params;

use crate::database::{map_tr_err, Database};
use crate::queries::{stats, users};

/// Apply a captured payment atomically.
///
/// Inside one transaction: insert the charge unless its id is already
/// present, and only when it is new, save `extended` and bump the
/// `payments` counter. Returns `true` when the payment was applied. A failure
/// anywhere rolls everything back, so the same charge can be delivered again.
pub async fn apply(
    db: &Database,
    payment: &PaymentRecord,
    extended: &UserBudget,
) -> Result<bool, MoneyLimitError> {
    let payment = payment.clone();
    let extended = extended.clone();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let tx = conn.transaction()?;

            let inserted = tx.execute(
                "INSERT OR IGNORE INTO payments (charge_id, user_id, currency, total_amount, payload, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    payment.charge_id,
                    payment.user_id.0,
                    payment.currency,
                    payment.total_amount,
                    payment.payload,
                    payment.created_at,
                ],
            )?;
            if inserted == 0 {
                return Ok(false);
            }

            users::upsert(&tx, &extended)?;
            stats::bump(&tx, &StatKey::Payments.to_string(), 1)?;

            tx.commit()?;
            Ok(true)
        })
        .await
        .map_err(map_tr_err)
}
