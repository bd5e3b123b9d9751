// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for MoneyLimit.
//!
//! Provides the adapter traits, the error type, and the shared domain types
//! used throughout the workspace.

pub mod clock;
pub mod error;
pub mod traits;
pub mod types;

pub use clock::{Clock, SystemClock};
pub use error::MoneyLimitError;
pub use types::{AdapterType, HealthStatus, MessageId, UserBudget, UserId};

pub use traits::{ChannelAdapter, PaymentAdapter, PluginAdapter, StorageAdapter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adapter_type_round_trips_through_strings() {
        use std::str::FromStr;

        for variant in [AdapterType::Channel, AdapterType::Storage, AdapterType::Payment] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_channel_adapter<T: ChannelAdapter>() {}
        fn _assert_payment_adapter<T: PaymentAdapter>() {}
        fn _assert_storage_adapter<T: StorageAdapter>() {}
    }

    #[test]
    fn system_clock_reports_a_plausible_date() {
        use chrono::Datelike;
        assert!(SystemClock.today().year() >= 2024);
    }
}
