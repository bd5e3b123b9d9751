// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per table.
//!
//! Calendar days are stored as `YYYY-MM-DD` text through rusqlite's chrono
//! support, so lexical and chronological order agree.

pub mod activity;
pub mod payments;
pub mod stats;
pub mod users;
