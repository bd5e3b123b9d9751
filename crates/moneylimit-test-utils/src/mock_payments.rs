// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock invoicing provider.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use moneylimit_core::types::{ChatId, Invoice};
use moneylimit_core::{
    AdapterType, HealthStatus, MessageId, MoneyLimitError, PaymentAdapter, PluginAdapter,
};

/// Records every invoice it is asked to send. Can be switched to fail.
#[derive(Default)]
pub struct MockPayments {
    invoices: Mutex<Vec<(ChatId, Invoice)>>,
    failing: AtomicBool,
}

impl MockPayments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `send_invoice` calls fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn invoices(&self) -> Vec<(ChatId, Invoice)> {
        self.invoices.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for MockPayments {
    fn name(&self) -> &str {
        "mock-payments"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Payment
    }

    async fn health_check(&self) -> Result<HealthStatus, MoneyLimitError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), MoneyLimitError> {
        Ok(())
    }
}

#[async_trait]
impl PaymentAdapter for MockPayments {
    async fn send_invoice(
        &self,
        chat_id: ChatId,
        invoice: &Invoice,
    ) -> Result<MessageId, MoneyLimitError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MoneyLimitError::Payment {
                message: "provider unavailable".to_string(),
            });
        }
        let mut invoices = self.invoices.lock().await;
        invoices.push((chat_id, invoice.clone()));
        Ok(MessageId(format!("mock-invoice-{}", invoices.len())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice() -> Invoice {
        Invoice {
            title: "t".to_string(),
            description: "d".to_string(),
            payload: "access_30d".to_string(),
            currency: "RUB".to_string(),
            price_label: "30".to_string(),
            amount_minor: 100,
        }
    }

    #[tokio::test]
    async fn records_invoices_until_failing() {
        let payments = MockPayments::new();
        payments.send_invoice(ChatId(5), &invoice()).await.unwrap();
        assert_eq!(payments.invoices().await.len(), 1);

        payments.set_failing(true);
        assert!(payments.send_invoice(ChatId(5), &invoice()).await.is_err());
        assert_eq!(payments.invoices().await.len(), 1);
    }
}
