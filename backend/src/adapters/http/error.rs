//! Error responses shared by every endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::application::handlers::ExportError;
use crate::domain::biodata::Layout;
use crate::domain::entitlement::{EntitlementError, Plan, PlanCatalog, UnlockKind};
use crate::domain::foundation::ErrorCode;
use crate::ports::IntroError;

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// API Error
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts application errors to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    Entitlement(EntitlementError),
    Export(ExportError),
    Introduction(IntroError),
    /// Malformed request the handlers never saw.
    BadRequest(String),
    Internal(String),
}

impl From<EntitlementError> for ApiError {
    fn from(err: EntitlementError) -> Self {
        Self::Entitlement(err)
    }
}

impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::Entitlement(inner) => Self::Entitlement(inner),
            other => Self::Export(other),
        }
    }
}

impl From<IntroError> for ApiError {
    fn from(err: IntroError) -> Self {
        Self::Introduction(err)
    }
}

/// Where the user can go to lift a restriction.
fn upgrade_offers() -> serde_json::Value {
    let plans: Vec<_> = Plan::ALL
        .iter()
        .filter(|p| p.is_paid())
        .map(|p| {
            json!({
                "plan": p,
                "priceInr": p.price_inr(),
                "href": PlanCatalog::plan_href(*p),
            })
        })
        .collect();
    json!(plans)
}

fn entitlement_response(err: &EntitlementError) -> (StatusCode, ErrorResponse) {
    let code = err.code().to_string();
    let message = err.user_message();
    match err {
        EntitlementError::QuotaExceeded { kind, limit } => (
            StatusCode::PAYMENT_REQUIRED,
            ErrorResponse::with_details(
                code,
                message,
                json!({ "quota": kind, "limit": limit, "upgrade": upgrade_offers() }),
            ),
        ),
        EntitlementError::UnknownPlan(_)
        | EntitlementError::UnknownUnlock(_)
        | EntitlementError::InvalidCheckout(_)
        | EntitlementError::SignatureMismatch { .. } => {
            (StatusCode::BAD_REQUEST, ErrorResponse::new(code, message))
        }
        EntitlementError::UnknownOrder(_) => {
            (StatusCode::NOT_FOUND, ErrorResponse::new(code, message))
        }
        EntitlementError::PaymentGateway(_) => {
            (StatusCode::BAD_GATEWAY, ErrorResponse::new(code, message))
        }
        EntitlementError::PaymentsDisabled => (
            StatusCode::SERVICE_UNAVAILABLE,
            ErrorResponse::new(code, "Payments are currently unavailable"),
        ),
        EntitlementError::ApplyFailed {
            payment_reference, ..
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_details(
                code,
                message,
                json!({ "paymentReference": payment_reference }),
            ),
        ),
        EntitlementError::Store(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new(code, "Something went wrong. Please try again."),
        ),
    }
}

fn export_response(err: &ExportError) -> (StatusCode, ErrorResponse) {
    let code = err.code().to_string();
    match err {
        ExportError::DownloadLocked(layout) => {
            let unlock = match layout {
                Layout::Modern => UnlockKind::UnlockModernDownload,
                Layout::Traditional => UnlockKind::UnlockTraditional,
            };
            (
                StatusCode::FORBIDDEN,
                ErrorResponse::with_details(
                    code,
                    err.to_string(),
                    json!({
                        "layout": layout,
                        "unlock": {
                            "kind": unlock,
                            "priceInr": unlock.price_inr(),
                            "href": PlanCatalog::unlock_href(unlock),
                        },
                        "upgrade": upgrade_offers(),
                    }),
                ),
            )
        }
        ExportError::Entitlement(inner) => entitlement_response(inner),
        other => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::with_details(
                code,
                "We could not generate your file. Please try again.",
                json!({ "retryable": other.is_retryable() }),
            ),
        ),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Entitlement(err) => entitlement_response(err),
            ApiError::Export(err) => export_response(err),
            ApiError::Introduction(IntroError::NotConfigured) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorResponse::new(
                    ErrorCode::FeatureDisabled.to_string(),
                    "AI introductions are currently unavailable",
                ),
            ),
            ApiError::Introduction(err) => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse::new(ErrorCode::AIProviderError.to_string(), err.to_string()),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse::new(ErrorCode::ValidationFailed.to_string(), message.clone()),
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new(
                    ErrorCode::InternalError.to_string(),
                    "Something went wrong. Please try again.",
                ),
            ),
        };

        if status.is_server_error() {
            tracing::error!(status = %status, error = ?self, "Request failed");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entitlement::QuotaKind;
    use crate::ports::RenderError;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn quota_exceeded_is_payment_required_with_upgrade_payload() {
        let err = EntitlementError::quota_exceeded(QuotaKind::View, 5);
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "QUOTA_EXCEEDED");
        assert_eq!(body["details"]["limit"], 5);
        assert!(!body["details"]["upgrade"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn signature_mismatch_and_gateway_failure_differ() {
        let mismatch = ApiError::from(EntitlementError::SignatureMismatch {
            order_id: "order_1".into(),
        })
        .into_response();
        let err = EntitlementError::PaymentGateway("timeout".into());
        let gateway = ApiError::from(err).into_response();

        assert_eq!(mismatch.status(), StatusCode::BAD_REQUEST);
        assert_eq!(gateway.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(mismatch).await["error_code"], "PAYMENT_SIGNATURE_MISMATCH");
    }

    #[tokio::test]
    async fn apply_failure_carries_support_message() {
        let err = EntitlementError::apply_failed("pay_9", "disk full");
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body["message"].as_str().unwrap().contains("contact support"));
        assert_eq!(body["details"]["paymentReference"], "pay_9");
    }

    #[tokio::test]
    async fn render_failure_is_flagged_retryable() {
        let err = ExportError::Render(RenderError::Failed("engine crashed".into()));
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "EXPORT_FAILED");
        assert_eq!(body["details"]["retryable"], true);
    }

    #[tokio::test]
    async fn locked_download_points_to_unlock() {
        let err = ExportError::DownloadLocked(Layout::Traditional);
        let response = ApiError::from(err).into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["details"]["unlock"]["href"], "/checkout?action=unlock_traditional");
    }

    #[tokio::test]
    async fn unconfigured_ai_is_feature_disabled() {
        let response = ApiError::from(IntroError::NotConfigured).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await["error_code"], "FEATURE_DISABLED");
    }
}
