//! Mock payment gateway for testing.
//!
//! Supports:
//! - Signature acceptance or rejection
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ports::{
    PaymentConfirmation, PaymentError, PaymentGateway, PaymentOrder, PaymentVerification,
};

/// Mock payment gateway for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentGateway::new();
/// mock.set_method_error("create_order", PaymentError::Gateway("down".into()));
/// mock.reject_signatures();
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentGateway {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    next_order_number: u64,
    reject_signatures: bool,
    next_error: Option<PaymentError>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Every later verification reports a mismatch.
    pub fn reject_signatures(&self) {
        self.state().reject_signatures = true;
    }

    pub fn accept_signatures(&self) {
        self.state().reject_signatures = false;
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(
        &self,
        amount_minor_units: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentOrder, PaymentError> {
        self.record_call(
            "create_order",
            vec![amount_minor_units.to_string(), currency.to_string(), receipt.to_string()],
        );
        self.check_error("create_order")?;

        let mut state = self.state();
        state.next_order_number += 1;
        Ok(PaymentOrder {
            order_id: format!("order_mock_{}", state.next_order_number),
            amount_minor_units,
            currency: currency.to_string(),
            key_id: Some("rzp_test_mock".to_string()),
        })
    }

    async fn verify_payment(
        &self,
        confirmation: &PaymentConfirmation,
    ) -> Result<PaymentVerification, PaymentError> {
        self.record_call(
            "verify_payment",
            vec![confirmation.order_id.clone(), confirmation.payment_id.clone()],
        );
        self.check_error("verify_payment")?;

        Ok(PaymentVerification {
            success: !self.state().reject_signatures,
        })
    }
}
