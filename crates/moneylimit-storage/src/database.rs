// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use moneylimit_core::MoneyLimitError;
use tracing::debug;

use crate::migrations;

/// Convert a tokio-rusqlite error into `MoneyLimitError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> MoneyLimitError {
    MoneyLimitError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the single SQLite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path` in WAL mode and apply migrations.
    pub async fn open(path: &str) -> Result<Self, MoneyLimitError> {
        Self::open_with_options(path, true).await
    }

    /// Open the database, choosing the journal mode.
    ///
    /// Parent directories are created as needed. `":memory:"` opens a private
    /// in-memory database.
    pub async fn open_with_options(path: &str, wal_mode: bool) -> Result<Self, MoneyLimitError> {
        let conn = if path == ":memory:" {
            tokio_rusqlite::Connection::open_in_memory().await
        } else {
            if let Some(parent) = Path::new(path).parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent).map_err(MoneyLimitError::storage)?;
            }
            tokio_rusqlite::Connection::open(path).await
        }
        .map_err(MoneyLimitError::storage)?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.pragma_update(None, "journal_mode", "WAL")?;
            }
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| Ok::<_, rusqlite::Error>(migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The tokio-rusqlite connection every query goes through.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), MoneyLimitError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
