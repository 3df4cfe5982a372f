//! Draft session extractor.
//!
//! The browser keeps one draft per tab session and names it with a UUID in
//! the `X-Draft-Session` header.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::DraftSessionId;

pub const DRAFT_SESSION_HEADER: &str = "X-Draft-Session";

#[derive(Debug, Clone, Copy)]
pub struct DraftSessionHeader(pub DraftSessionId);

/// Rejection for a missing or malformed draft session header.
#[derive(Debug, Clone)]
pub enum DraftSessionRejection {
    Missing,
    Invalid(String),
}

impl IntoResponse for DraftSessionRejection {
    fn into_response(self) -> Response {
        let message = match self {
            DraftSessionRejection::Missing => {
                format!("{} header is required", DRAFT_SESSION_HEADER)
            }
            DraftSessionRejection::Invalid(reason) => {
                format!("{} header is not a UUID: {}", DRAFT_SESSION_HEADER, reason)
            }
        };
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("INVALID_DRAFT_SESSION", message)),
        )
            .into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for DraftSessionHeader
where
    S: Send + Sync,
{
    type Rejection = DraftSessionRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let raw = parts
                .headers
                .get(DRAFT_SESSION_HEADER)
                .and_then(|v| v.to_str().ok())
                .ok_or(DraftSessionRejection::Missing)?;

            raw.trim()
                .parse::<DraftSessionId>()
                .map(DraftSessionHeader)
                .map_err(|e| DraftSessionRejection::Invalid(e.to_string()))
        })
    }
}
