//! Mock payment handler for testing.

use std::future::Future;
use std::sync::{Arc, Mutex};

use super::{PaymentError, PaymentHandler, PaymentOutcome, PaymentRequest};

#[derive(Debug, Clone)]
enum Script {
    Settle,
    Decline(String),
    Fail(String),
}

/// Mock payment handler.
///
/// Resolves every request with a scripted outcome without contacting a
/// payment provider, and records the requests it sees.
#[derive(Debug, Clone)]
pub struct MockPayment {
    script: Script,
    requests: Arc<Mutex<Vec<PaymentRequest>>>,
}

impl MockPayment {
    /// A handler that settles every payment.
    #[must_use]
    pub fn settling() -> Self {
        Self {
            script: Script::Settle,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A handler that declines every payment with `reason`.
    #[must_use]
    pub fn declining(reason: &str) -> Self {
        Self {
            script: Script::Decline(reason.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A handler whose provider is unreachable.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            script: Script::Fail(reason.to_string()),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The requests collected so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<PaymentRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl Default for MockPayment {
    fn default() -> Self {
        Self::settling()
    }
}

impl PaymentHandler for MockPayment {
    fn collect(
        &self,
        request: PaymentRequest,
    ) -> impl Future<Output = Result<PaymentOutcome, PaymentError>> + Send {
        if let Ok(mut guard) = self.requests.lock() {
            guard.push(request);
        }
        let script = self.script.clone();
        async move {
            match script {
                Script::Settle => Ok(PaymentOutcome::Settled),
                Script::Decline(reason) => Ok(PaymentOutcome::Declined(reason)),
                Script::Fail(reason) => Err(PaymentError::Unreachable(reason)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rust_decimal::Decimal;

    use super::*;
    use crate::types::PaymentMethod;

    fn request() -> PaymentRequest {
        PaymentRequest {
            order_id: 42.into(),
            method: PaymentMethod::Card,
            amount: Decimal::from(500),
        }
    }

    #[tokio::test]
    async fn test_settling_handler_settles_and_records() {
        let handler = MockPayment::settling();
        let outcome = handler.collect(request()).await.unwrap();
        assert_eq!(outcome, PaymentOutcome::Settled);
        assert_eq!(handler.requests(), vec![request()]);
    }

    #[tokio::test]
    async fn test_declining_handler_reports_reason() {
        let handler = MockPayment::declining("insufficient funds");
        let outcome = handler.collect(request()).await.unwrap();
        assert_eq!(
            outcome,
            PaymentOutcome::Declined("insufficient funds".to_string())
        );
    }

    #[tokio::test]
    async fn test_failing_handler_errors() {
        let handler = MockPayment::failing("gateway down");
        let err = handler.collect(request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Unreachable(_)));
    }
}
