//! HTTP DTOs for draft, preview, export and introduction endpoints.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::biodata::{BiodataDraft, BiodataField, DraftRevision, Layout, PreviewViewModel};
use crate::domain::foundation::DraftSessionId;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Partial edit: any subset of fields, and optionally the layout.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateFieldsRequest {
    #[serde(default)]
    pub fields: HashMap<BiodataField, String>,
    #[serde(default)]
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    /// Layout to export; the one on screen when absent.
    #[serde(default)]
    pub layout: Option<Layout>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub session_id: DraftSessionId,
    pub revision: u64,
    pub draft: BiodataDraft,
    /// Shape problems; informational, never blocking.
    pub issues: Vec<String>,
}

impl DraftResponse {
    pub fn new(session_id: DraftSessionId, current: DraftRevision) -> Self {
        let issues = match current.draft.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(ToString::to_string).collect(),
        };
        Self {
            session_id,
            revision: current.revision,
            draft: current.draft,
            issues,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub revision: u64,
    #[serde(flatten)]
    pub view: PreviewViewModel,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntroductionResponse {
    pub introduction: String,
    pub revision: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_parses_field_keys() {
        let req: UpdateFieldsRequest = serde_json::from_str(
            r#"{"fields":{"fullName":"Neha Gupta","dateOfBirth":"1995-08-21"},"layout":"traditional"}"#,
        )
        .unwrap();
        assert_eq!(req.fields.get(&BiodataField::FullName).map(String::as_str), Some("Neha Gupta"));
        assert_eq!(req.fields.len(), 2);
        assert_eq!(req.layout, Some(Layout::Traditional));
    }

    #[test]
    fn blank_draft_reports_required_fields() {
        let response = DraftResponse::new(DraftSessionId::new(), DraftRevision::default());
        assert_eq!(response.issues.len(), 2);
    }
}
