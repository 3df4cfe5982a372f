//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that resolves Bearer tokens and injects the identity into extensions
//! - `RequireAuth` - Extractor that requires a signed-in user
//! - `OptionalAuth` - Extractor for routes anonymous visitors may use
//!
//! # Architecture
//!
//! The middleware uses the `IdentityProvider` port, keeping it provider-agnostic.
//!
//! ```text
//! Request → auth_middleware → injects Identity into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::ErrorResponse;
use crate::domain::foundation::ErrorCode;
use crate::ports::{Identity, IdentityError, IdentityProvider};

/// Auth middleware state - wraps the identity provider.
pub type AuthState = Arc<dyn IdentityProvider>;

/// Resolves the Bearer token, if any.
///
/// 1. Extracts the token from the `Authorization` header
/// 2. Resolves it through the `IdentityProvider` port
/// 3. On success, injects `Identity` into request extensions
/// 4. On missing token, continues without injecting (anonymous access)
/// 5. On invalid or expired token, returns 401 Unauthorized
pub async fn auth_middleware(
    State(identity): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string);

    let Some(token) = token else {
        return next.run(request).await;
    };

    match identity.current_user(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Ok(None) => next.run(request).await,
        Err(e) => {
            let (status, message) = match &e {
                IdentityError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                IdentityError::InvalidToken(_) => (StatusCode::UNAUTHORIZED, "Invalid token"),
                IdentityError::ServiceUnavailable(msg) => {
                    tracing::error!("Identity service unavailable: {}", msg);
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "Authentication service unavailable",
                    )
                }
            };
            (status, Json(ErrorResponse::new("AUTH_ERROR", message))).into_response()
        }
    }
}

/// Extractor that requires a signed-in user.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

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
            parts
                .extensions
                .get::<Identity>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Extractor for optional authentication.
///
/// `None` for anonymous visitors.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Identity>);

impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

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
            let user = parts.extensions.get::<Identity>().cloned();
            Ok(OptionalAuth(user))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "Sign in to continue"),
        };

        let body = ErrorResponse::new(ErrorCode::Unauthorized.to_string(), message);
        (status, Json(body)).into_response()
    }
}
