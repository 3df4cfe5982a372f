//! DraftIntroductionHandler - Fills the introduction with AI-written text.

use std::sync::Arc;

use tracing::warn;

use crate::application::DraftService;
use crate::domain::biodata::{BiodataField, DraftRevision, IntroductionRequest, FALLBACK_ERROR};
use crate::domain::foundation::DraftSessionId;
use crate::ports::{IntroError, IntroWriter};

#[derive(Debug, Clone)]
pub struct DraftIntroductionCommand {
    pub session_id: DraftSessionId,
}

#[derive(Debug, Clone)]
pub struct DraftIntroductionResult {
    pub introduction: String,
    pub draft: DraftRevision,
}

/// Writes an introduction from the current draft and stores it in the
/// draft's introduction field.
///
/// Only `IntroError::NotConfigured` is returned; any other failure is
/// replaced with fallback text so editing is never blocked.
pub struct DraftIntroductionHandler {
    drafts: Arc<DraftService>,
    writer: Arc<dyn IntroWriter>,
}

impl DraftIntroductionHandler {
    pub fn new(drafts: Arc<DraftService>, writer: Arc<dyn IntroWriter>) -> Self {
        Self { drafts, writer }
    }

    pub async fn handle(
        &self,
        cmd: DraftIntroductionCommand,
    ) -> Result<DraftIntroductionResult, IntroError> {
        let current = self.drafts.current(&cmd.session_id).await;
        let request = IntroductionRequest::from_draft(&current.draft);

        let introduction = match self.writer.draft_introduction(&request).await {
            Ok(text) => text.trim().to_string(),
            Err(IntroError::NotConfigured) => return Err(IntroError::NotConfigured),
            Err(err) => {
                warn!(session = %cmd.session_id, error = %err, "Introduction drafting failed");
                FALLBACK_ERROR.to_string()
            }
        };

        let draft = self
            .drafts
            .set_fields(
                &cmd.session_id,
                vec![(BiodataField::Introduction, introduction.clone())],
            )
            .await;

        Ok(DraftIntroductionResult {
            introduction,
            draft,
        })
    }
}
