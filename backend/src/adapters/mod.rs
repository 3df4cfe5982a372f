//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Gemini introduction writer and its fallbacks
//! - `auth` - Bearer-token identity providers
//! - `document` - HTML and Pandoc document renderers
//! - `http` - axum REST API
//! - `razorpay` - Payment gateway
//! - `storage` - File and in-memory draft/entitlement stores

pub mod ai;
pub mod auth;
pub mod document;
pub mod http;
pub mod razorpay;
pub mod storage;
