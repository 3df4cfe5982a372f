//! Axum router configuration for plan, entitlement and checkout endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    complete_checkout, consume_quota, get_entitlement, get_plans, start_checkout,
};
use crate::adapters::http::state::AppState;

/// Create the entitlement API router.
///
/// # Routes
///
/// ## Public
/// - `GET /plans` - Plan and unlock price list
///
/// ## User Endpoints (require authentication)
/// - `GET /entitlement` - Effective entitlement
/// - `POST /entitlement/quota/:kind` - Record a view, interest or boost
/// - `POST /checkout` - Start checkout for a plan or unlock
/// - `POST /checkout/complete` - Verify payment and apply it
pub fn entitlement_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(get_plans))
        .route("/entitlement", get(get_entitlement))
        .route("/entitlement/quota/:kind", post(consume_quota))
        .route("/checkout", post(start_checkout))
        .route("/checkout/complete", post(complete_checkout))
}
