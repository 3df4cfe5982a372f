//! Axum router configuration for the biodata builder endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    draft_introduction, export_biodata, get_draft, get_preview, replace_draft, reset_draft,
    update_fields,
};
use crate::adapters::http::state::AppState;

/// Create the biodata API router.
///
/// Every route needs the `X-Draft-Session` header.
///
/// # Routes
///
/// - `GET /draft` - Current draft
/// - `PUT /draft` - Replace the draft
/// - `DELETE /draft` - Clear the draft
/// - `PATCH /draft/fields` - Edit fields and/or layout
/// - `GET /preview` - Paywalled preview (anonymous allowed)
/// - `POST /export` - Download (requires authentication)
/// - `POST /introduction` - AI-written introduction
pub fn biodata_routes() -> Router<AppState> {
    Router::new()
        .route("/draft", get(get_draft).put(replace_draft).delete(reset_draft))
        .route("/draft/fields", patch(update_fields))
        .route("/preview", get(get_preview))
        .route("/export", post(export_biodata))
        .route("/introduction", post(draft_introduction))
}
