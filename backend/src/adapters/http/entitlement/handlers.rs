//! HTTP handlers for plan, entitlement and checkout endpoints.

use axum::extract::{Json, Path, State};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CompletePurchaseCommand, ConsumeQuotaCommand, StartCheckoutCommand,
};
use crate::domain::entitlement::QuotaKind;
use crate::domain::foundation::Timestamp;

use super::dto::{
    CheckoutRequest, CheckoutResponse, CompleteCheckoutRequest, CompleteCheckoutResponse,
    EntitlementResponse, PlansResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/plans - Plan and unlock price list
pub async fn get_plans() -> impl IntoResponse {
    Json(PlansResponse::catalog())
}

/// GET /api/entitlement - Current user's effective entitlement
pub async fn get_entitlement(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state
        .entitlements
        .visible_snapshot(&user.user_id, Timestamp::now())
        .await?;
    let pending = state.entitlements.has_tentative(&user.user_id);

    Ok(Json(EntitlementResponse { snapshot, pending }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/entitlement/quota/:kind - Record a view, interest or boost
pub async fn consume_quota(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(kind): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let kind: QuotaKind = kind.parse().map_err(ApiError::BadRequest)?;

    let handler = state.consume_quota_handler();
    let result = handler
        .handle(ConsumeQuotaCommand {
            user_id: user.user_id,
            kind,
        })
        .await?;

    Ok(Json(EntitlementResponse {
        snapshot: result.snapshot,
        pending: false,
    }))
}

/// POST /api/checkout - Create a payment order for a plan or unlock
pub async fn start_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.start_checkout_handler();
    let result = handler
        .handle(StartCheckoutCommand {
            user_id: user.user_id,
            plan: request.plan,
            action: request.action,
        })
        .await?;

    Ok(Json(CheckoutResponse::from(result)))
}

/// POST /api/checkout/complete - Verify a payment and grant what was bought
pub async fn complete_checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CompleteCheckoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.complete_purchase_handler();
    let result = handler
        .handle(CompletePurchaseCommand {
            user_id: user.user_id,
            confirmation: request.into(),
        })
        .await?;

    Ok(Json(CompleteCheckoutResponse::from(result)))
}
