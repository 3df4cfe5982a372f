//! HTTP handlers for draft, preview, export and introduction endpoints.

use axum::extract::{Json, Query, State};
use axum::http::{header, HeaderValue};
use axum::response::IntoResponse;

use crate::adapters::http::error::ApiError;
use crate::adapters::http::middleware::{DraftSessionHeader, OptionalAuth, RequireAuth};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    DraftIntroductionCommand, ExportBiodataCommand, GetPreviewQuery,
};
use crate::domain::biodata::BiodataDraft;

use super::dto::{
    DraftResponse, ExportQuery, IntroductionResponse, PreviewResponse, UpdateFieldsRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Draft
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/draft - Current draft, loaded from storage on first use
pub async fn get_draft(
    State(state): State<AppState>,
    DraftSessionHeader(session_id): DraftSessionHeader,
) -> impl IntoResponse {
    let current = state.drafts.current(&session_id).await;
    Json(DraftResponse::new(session_id, current))
}

/// PUT /api/draft - Replace the whole draft
pub async fn replace_draft(
    State(state): State<AppState>,
    DraftSessionHeader(session_id): DraftSessionHeader,
    Json(draft): Json<BiodataDraft>,
) -> impl IntoResponse {
    let current = state.drafts.replace(&session_id, draft).await;
    Json(DraftResponse::new(session_id, current))
}

/// PATCH /api/draft/fields - Edit some fields and/or switch layout
pub async fn update_fields(
    State(state): State<AppState>,
    DraftSessionHeader(session_id): DraftSessionHeader,
    Json(request): Json<UpdateFieldsRequest>,
) -> impl IntoResponse {
    let mut current = state.drafts.current(&session_id).await;
    if !request.fields.is_empty() {
        current = state
            .drafts
            .set_fields(&session_id, request.fields.into_iter().collect())
            .await;
    }
    if let Some(layout) = request.layout {
        current = state.drafts.set_layout(&session_id, layout).await;
    }
    Json(DraftResponse::new(session_id, current))
}

/// DELETE /api/draft - Clear the draft and its stored copy
pub async fn reset_draft(
    State(state): State<AppState>,
    DraftSessionHeader(session_id): DraftSessionHeader,
) -> impl IntoResponse {
    let current = state.drafts.reset(&session_id).await;
    Json(DraftResponse::new(session_id, current))
}

// ════════════════════════════════════════════════════════════════════════════════
// Preview & Export
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/preview - Rendered preview, masked when the layout is locked
pub async fn get_preview(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    DraftSessionHeader(session_id): DraftSessionHeader,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.get_preview_handler();
    let result = handler
        .handle(GetPreviewQuery {
            user_id: user.map(|u| u.user_id),
            session_id,
        })
        .await?;

    Ok(Json(PreviewResponse {
        revision: result.revision,
        view: result.view,
    }))
}

/// POST /api/export - Download the biodata as a file
pub async fn export_biodata(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    DraftSessionHeader(session_id): DraftSessionHeader,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.export_handler();
    let result = handler
        .handle(ExportBiodataCommand {
            user_id: user.user_id,
            session_id,
            layout: query.layout,
        })
        .await?;

    let artifact = result.artifact;
    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(artifact.content_type),
        ),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&artifact.filename)?,
        ),
    ];
    Ok((headers, artifact.bytes))
}

/// `attachment` header; non-ASCII name characters become `_`.
fn content_disposition(filename: &str) -> Result<HeaderValue, ApiError> {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", safe))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Introduction
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/introduction - Write the introduction with AI
pub async fn draft_introduction(
    State(state): State<AppState>,
    DraftSessionHeader(session_id): DraftSessionHeader,
) -> Result<impl IntoResponse, ApiError> {
    let handler = state.introduction_handler();
    let result = handler
        .handle(DraftIntroductionCommand { session_id })
        .await?;

    Ok(Json(IntroductionResponse {
        introduction: result.introduction,
        revision: result.draft.revision,
    }))
}
