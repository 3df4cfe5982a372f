//! HTTP adapters - REST API implementations.
//!
//! - `entitlement` - Plans, entitlement snapshot, quotas and checkout
//! - `biodata` - Draft editing, preview, export and AI introductions
//! - `middleware` - Bearer-token identity and draft session extractors

pub mod biodata;
pub mod entitlement;
pub mod error;
pub mod middleware;
mod state;

use axum::Router;

pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use self::biodata::biodata_routes;
use self::entitlement::entitlement_routes;
use self::middleware::auth_middleware;

/// Complete API mounted under `/api`, with identity resolution applied to
/// every route.
///
/// # Example
///
/// ```ignore
/// let app = api_router(state).layer(TraceLayer::new_for_http());
/// axum::serve(listener, app).await?;
/// ```
pub fn api_router(state: AppState) -> Router {
    let identity = state.identity.clone();
    Router::new()
        .nest("/api", entitlement_routes().merge(biodata_routes()))
        .layer(axum::middleware::from_fn_with_state(identity, auth_middleware))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::adapters::ai::MockIntroWriter;
    use crate::adapters::auth::MockIdentityProvider;
    use crate::adapters::document::MockDocumentRenderer;
    use crate::adapters::razorpay::MockPaymentGateway;
    use crate::adapters::storage::{InMemoryDraftStore, InMemoryEntitlementStore};
    use crate::application::{DraftService, EntitlementService};
    use crate::domain::biodata::LayoutRegistry;
    use crate::domain::entitlement::EntitlementEngine;
    use crate::domain::foundation::DraftSessionId;

    const TOKEN: &str = "token-asha";

    struct Fixture {
        app: Router,
        gateway: MockPaymentGateway,
        session: DraftSessionId,
    }

    fn fixture() -> Fixture {
        let gateway = MockPaymentGateway::new();
        let state = AppState {
            entitlements: Arc::new(EntitlementService::new(
                Arc::new(InMemoryEntitlementStore::new()),
                EntitlementEngine::default(),
            )),
            drafts: Arc::new(DraftService::new(
                Arc::new(InMemoryDraftStore::new()),
                LayoutRegistry::standard(),
            )),
            payment_gateway: Arc::new(gateway.clone()),
            renderer: Arc::new(MockDocumentRenderer::new()),
            intro_writer: Arc::new(MockIntroWriter::replying("Asha is cheerful and kind.")),
            identity: Arc::new(MockIdentityProvider::new().with_user(TOKEN, "user-asha")),
        };
        Fixture {
            app: api_router(state),
            gateway,
            session: DraftSessionId::new(),
        }
    }

    fn request(
        method: &str,
        uri: &str,
        session: Option<DraftSessionId>,
        signed_in: bool,
        body: Option<serde_json::Value>,
    ) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(session) = session {
            builder = builder.header("X-Draft-Session", session.to_string());
        }
        if signed_in {
            builder = builder.header("Authorization", format!("Bearer {}", TOKEN));
        }
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(
        app: &Router,
        req: Request<Body>,
    ) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, headers, bytes.to_vec())
    }

    async fn send_json(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
        let (status, _, bytes) = send(app, req).await;
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn plans_are_public() {
        let f = fixture();
        let (status, body) =
            send_json(&f.app, request("GET", "/api/plans", None, false, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plans"][1]["priceInr"], 999);
    }

    #[tokio::test]
    async fn entitlement_requires_sign_in() {
        let f = fixture();
        let (status, _) =
            send_json(&f.app, request("GET", "/api/entitlement", None, false, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) =
            send_json(&f.app, request("GET", "/api/entitlement", None, true, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["effectivePlan"], "free");
        assert_eq!(body["pending"], false);
    }

    #[tokio::test]
    async fn draft_routes_need_session_header() {
        let f = fixture();
        let (status, body) =
            send_json(&f.app, request("GET", "/api/draft", None, false, None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "INVALID_DRAFT_SESSION");
    }

    #[tokio::test]
    async fn edits_show_up_in_draft_and_preview() {
        let f = fixture();
        let edit =
            serde_json::json!({ "fields": { "fullName": "Asha Rao" }, "layout": "traditional" });
        let (status, body) = send_json(
            &f.app,
            request("PATCH", "/api/draft/fields", Some(f.session), false, Some(edit)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["draft"]["fullName"], "Asha Rao");
        assert_eq!(body["revision"], 2);

        let (status, body) =
            send_json(&f.app, request("GET", "/api/preview", Some(f.session), false, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["layout"], "traditional");
        assert_eq!(body["locked"], true);
        assert_eq!(body["callToAction"]["buttonText"], "Upgrade Now");
    }

    #[tokio::test]
    async fn sixth_profile_view_needs_upgrade() {
        let f = fixture();
        let view = || request("POST", "/api/entitlement/quota/view", None, true, None);
        for _ in 0..5 {
            let (status, _) = send_json(&f.app, view()).await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = send_json(&f.app, view()).await;
        assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
        assert_eq!(body["error_code"], "QUOTA_EXCEEDED");

        let likes = request("POST", "/api/entitlement/quota/likes", None, true, None);
        let (status, _) = send_json(&f.app, likes).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn paying_for_traditional_unlocks_its_export() {
        let f = fixture();
        let edit =
            serde_json::json!({ "fields": { "fullName": "Asha Rao" }, "layout": "traditional" });
        send(
            &f.app,
            request("PATCH", "/api/draft/fields", Some(f.session), false, Some(edit)),
        )
        .await;

        let (status, _) =
            send_json(&f.app, request("POST", "/api/export", Some(f.session), true, None)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, checkout) = send_json(
            &f.app,
            request(
                "POST",
                "/api/checkout",
                None,
                true,
                Some(serde_json::json!({ "action": "unlock_traditional" })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(checkout["order"]["amountMinorUnits"], 1000);
        let order_id = checkout["order"]["orderId"].as_str().unwrap().to_string();

        let confirmation = serde_json::json!({
            "razorpay_order_id": order_id,
            "razorpay_payment_id": "pay_asha_1",
            "razorpay_signature": "signed",
        });
        let (status, body) = send_json(
            &f.app,
            request("POST", "/api/checkout/complete", None, true, Some(confirmation)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entitlement"]["unlocked"]["traditionalTemplateUnlocked"], true);

        let (status, headers, bytes) =
            send(&f.app, request("POST", "/api/export", Some(f.session), true, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            headers.get("content-disposition").unwrap(),
            "attachment; filename=\"Asha_Rao_Biodata.pdf\""
        );
        assert!(String::from_utf8(bytes).unwrap().contains("Asha Rao"));
    }

    #[tokio::test]
    async fn forged_signature_is_rejected() {
        let f = fixture();
        let (_, checkout) = send_json(
            &f.app,
            request(
                "POST",
                "/api/checkout",
                None,
                true,
                Some(serde_json::json!({ "plan": "gold" })),
            ),
        )
        .await;
        f.gateway.reject_signatures();

        let confirmation = serde_json::json!({
            "orderId": checkout["order"]["orderId"],
            "paymentId": "pay_x",
            "signature": "forged",
        });
        let (status, body) = send_json(
            &f.app,
            request("POST", "/api/checkout/complete", None, true, Some(confirmation)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], "PAYMENT_SIGNATURE_MISMATCH");
    }

    #[tokio::test]
    async fn introduction_is_written_into_the_draft() {
        let f = fixture();
        let (status, body) = send_json(
            &f.app,
            request("POST", "/api/introduction", Some(f.session), false, None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["introduction"], "Asha is cheerful and kind.");

        let (_, body) =
            send_json(&f.app, request("GET", "/api/draft", Some(f.session), false, None)).await;
        assert_eq!(body["draft"]["introduction"], "Asha is cheerful and kind.");
    }
}
