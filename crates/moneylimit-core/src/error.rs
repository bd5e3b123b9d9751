// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for MoneyLimit.

use thiserror::Error;

/// The primary error type used across all adapter traits and core operations.
#[derive(Debug, Error)]
pub enum MoneyLimitError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, row decoding).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Channel adapter errors (connection failure, send failure, closed queue).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Payment provider errors (invoice rejected, malformed confirmation).
    #[error("payment error: {message}")]
    Payment { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MoneyLimitError {
    /// Wraps any error as a storage error.
    pub fn storage<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_context() {
        let err = MoneyLimitError::Channel {
            message: "send failed".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "channel error: send failed");

        let err = MoneyLimitError::storage(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "storage error: disk full");
    }
}
