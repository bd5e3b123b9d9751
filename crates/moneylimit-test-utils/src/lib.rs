// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for MoneyLimit integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock messaging channel with event injection and capture
//! - [`MockPayments`] - Mock invoicing provider that records invoices
//! - [`FixedClock`] - Clock pinned to a settable date
//! - [`TestHarness`] - Engine wired to the mocks and a temp SQLite database

pub mod clock;
pub mod harness;
pub mod mock_channel;
pub mod mock_payments;

pub use clock::FixedClock;
pub use harness::{TestHarness, TestHarnessBuilder};
pub use mock_channel::MockChannel;
pub use mock_payments::MockPayments;
