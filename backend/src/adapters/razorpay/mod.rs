//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port:
//! - Order creation through the Orders API
//! - Payment signature verification
//!
//! # Security
//!
//! - Signatures are HMAC-SHA256 over `order_id|payment_id`, compared in
//!   constant time
//! - The key secret is held in `secrecy::SecretString`

mod mock_payment_gateway;
mod razorpay_adapter;

pub use mock_payment_gateway::{MethodCall, MockPaymentGateway};
pub use razorpay_adapter::{sign_payment, RazorpayConfig, RazorpayGateway};
