//! Online payment collection.
//!
//! Orders paid by anything other than cash on delivery hand off to a
//! [`PaymentHandler`] after the backend accepts the order. A declined or
//! failed payment does not cancel the order; the order stays placed with
//! payment pending and can be retried out of band.

mod mock;

pub use mock::MockPayment;

use std::future::Future;

use rust_decimal::Decimal;
use thiserror::Error;
use velvet_tamarind_core::OrderId;

use crate::types::PaymentMethod;

/// Errors from a payment handler.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The payment provider could not be reached.
    #[error("Payment provider unreachable: {0}")]
    Unreachable(String),

    /// The payment provider rejected the collection request itself.
    #[error("Payment provider rejected the request: {0}")]
    Provider(String),
}

/// A request to collect payment for a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Order being paid.
    pub order_id: OrderId,
    /// Selected payment method.
    pub method: PaymentMethod,
    /// Amount to collect.
    pub amount: Decimal,
}

/// What a payment attempt produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment settled in full.
    Settled,
    /// The provider processed the request but declined the payment.
    Declined(String),
}

/// Collects online payment for placed orders.
///
/// This trait abstracts over concrete gateways (card processors, mobile
/// wallets).
pub trait PaymentHandler: Send + Sync {
    /// Collect payment for `request`.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or rejects the
    /// collection request. A decline is not an error; it is reported through
    /// [`PaymentOutcome::Declined`].
    fn collect(
        &self,
        request: PaymentRequest,
    ) -> impl Future<Output = Result<PaymentOutcome, PaymentError>> + Send;
}

/// Handler for stores without an online payment gateway.
///
/// Fails every collection request, which leaves the order placed with
/// payment pending. Cash-on-delivery orders never reach a handler, so a
/// cash-only store can use this as its handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPayment;

impl PaymentHandler for UnconfiguredPayment {
    fn collect(
        &self,
        request: PaymentRequest,
    ) -> impl Future<Output = Result<PaymentOutcome, PaymentError>> + Send {
        async move {
            Err(PaymentError::Provider(format!(
                "no payment gateway configured for {}",
                request.method
            )))
        }
    }
}
