// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Budget arithmetic and paid access rules.
//!
//! This crate provides:
//! - **Daily allowance**: setup, day rollover, and spend recording on a [`UserBudget`]
//! - **Input policy**: parsing and bounding of user-typed amounts
//! - **Access gate**: whether a user may use the budget features today
//! - **Entitlement**: extending paid access by a number of days
//!
//! [`UserBudget`]: moneylimit_core::UserBudget

pub mod daily;
pub mod entitlement;
pub mod error;
pub mod gate;
pub mod policy;

pub use daily::{daily_limit, record_spend, rollover, setup, Rollover};
pub use entitlement::{extend_entitlement, extended_until};
pub use error::BudgetError;
pub use gate::{Access, AccessGate};
pub use policy::BudgetPolicy;
