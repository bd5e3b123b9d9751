// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Rejected user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BudgetError {
    /// The text is not a whole number.
    #[error("`{0}` is not a whole number")]
    NotANumber(String),

    /// Zero or negative where a positive amount is required.
    #[error("amount must be positive, got {0}")]
    NotPositive(i64),

    /// Above the configured ceiling.
    #[error("amount {amount} exceeds the maximum of {max}")]
    TooLarge { amount: i64, max: i64 },
}
