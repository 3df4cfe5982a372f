//! HTTP middleware for axum.
//!
//! This module contains middleware layers and extractors for cross-cutting concerns:
//!
//! - `auth` - Authentication middleware and extractors
//! - `draft_session` - `X-Draft-Session` header extractor

pub mod auth;
pub mod draft_session;

pub use auth::{auth_middleware, AuthRejection, AuthState, OptionalAuth, RequireAuth};
pub use draft_session::{DraftSessionHeader, DRAFT_SESSION_HEADER};
