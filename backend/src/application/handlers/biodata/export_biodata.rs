//! ExportBiodataHandler - Produces a downloadable file of the draft.
//!
//! Exporting a layout other than the one on screen switches the draft to
//! that layout, waits for the preview to render it, captures the root node
//! and switches back. The visible layout is restored whether or not the
//! export succeeds. Edits to the same draft wait until the layout is back,
//! so the temporary layout is never saved.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::application::{DraftService, EntitlementService, LiveDraft};
use crate::domain::biodata::{Layout, ROOT_NODE_ID};
use crate::domain::entitlement::EntitlementError;
use crate::domain::foundation::{DraftSessionId, ErrorCode, UserId};
use crate::ports::{DocumentRenderer, ExportedArtifact, PageFormat, RenderError, RenderOptions};

const DEFAULT_FRAME_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ExportError {
    /// Neither a plan nor a one-off unlock allows downloading this layout.
    #[error("Downloading the {0} layout requires an upgrade")]
    DownloadLocked(Layout),

    #[error("The preview did not render in time")]
    PreviewUnavailable,

    #[error("Rendered preview has no exportable root")]
    MissingRoot,

    #[error("Document rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error(transparent)]
    Entitlement(#[from] EntitlementError),
}

impl ExportError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ExportError::DownloadLocked(_) => ErrorCode::DownloadLocked,
            ExportError::Entitlement(err) => err.code(),
            ExportError::PreviewUnavailable | ExportError::MissingRoot | ExportError::Render(_) => {
                ErrorCode::ExportFailed
            }
        }
    }

    /// Whether trying again unchanged might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExportError::PreviewUnavailable | ExportError::Render(_)
        )
    }
}

#[derive(Debug, Clone)]
pub struct ExportBiodataCommand {
    pub user_id: UserId,
    pub session_id: DraftSessionId,
    /// Layout to export; the draft's own layout when `None`.
    pub layout: Option<Layout>,
}

#[derive(Debug, Clone)]
pub struct ExportBiodataResult {
    pub layout: Layout,
    pub artifact: ExportedArtifact,
}

pub struct ExportBiodataHandler {
    entitlements: Arc<EntitlementService>,
    drafts: Arc<DraftService>,
    renderer: Arc<dyn DocumentRenderer>,
    page_format: PageFormat,
    frame_timeout: Duration,
}

impl ExportBiodataHandler {
    pub fn new(
        entitlements: Arc<EntitlementService>,
        drafts: Arc<DraftService>,
        renderer: Arc<dyn DocumentRenderer>,
    ) -> Self {
        Self {
            entitlements,
            drafts,
            renderer,
            page_format: PageFormat::default(),
            frame_timeout: DEFAULT_FRAME_TIMEOUT,
        }
    }

    pub fn with_page_format(mut self, page_format: PageFormat) -> Self {
        self.page_format = page_format;
        self
    }

    pub fn with_frame_timeout(mut self, timeout: Duration) -> Self {
        self.frame_timeout = timeout;
        self
    }

    pub async fn handle(
        &self,
        cmd: ExportBiodataCommand,
    ) -> Result<ExportBiodataResult, ExportError> {
        let live = self.drafts.open(&cmd.session_id).await;
        let _edits = live.lock_edits().await;
        let current = live.session().current();
        let shown = current.draft.layout;
        let target = cmd.layout.unwrap_or(shown);

        // 1. Entitlement gate
        let snapshot = self.entitlements.snapshot(&cmd.user_id).await?;
        if !snapshot.can_download(target) {
            return Err(ExportError::DownloadLocked(target));
        }

        // 2. Switch layout if needed
        let revision = if target != shown {
            live.session().set_layout(target)
        } else {
            current.revision
        };

        let options = RenderOptions {
            page_format: self.page_format,
            ..RenderOptions::new(current.draft.export_filename())
        };
        let outcome = self.capture(&live, revision, &options).await;

        // 3. Restore what the user was looking at
        if target != shown {
            live.session().set_layout(shown);
        }

        match &outcome {
            Ok(artifact) => info!(
                user_id = %cmd.user_id,
                layout = %target,
                filename = %artifact.filename,
                "Biodata exported"
            ),
            Err(err) => warn!(
                user_id = %cmd.user_id,
                layout = %target,
                error = %err,
                "Export failed"
            ),
        }

        Ok(ExportBiodataResult {
            layout: target,
            artifact: outcome?,
        })
    }

    async fn capture(
        &self,
        live: &LiveDraft,
        revision: u64,
        options: &RenderOptions,
    ) -> Result<ExportedArtifact, ExportError> {
        let frame = live
            .preview()
            .frame_at(revision, self.frame_timeout)
            .await
            .ok_or(ExportError::PreviewUnavailable)?;
        let root = frame
            .document
            .find_by_id(ROOT_NODE_ID)
            .ok_or(ExportError::MissingRoot)?;
        Ok(self.renderer.render_node_to_file(root, options).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::document::MockDocumentRenderer;
    use crate::adapters::storage::{InMemoryDraftStore, InMemoryEntitlementStore};
    use crate::domain::biodata::{BiodataField, LayoutRegistry};
    use crate::domain::entitlement::{
        EntitlementEngine, EntitlementRecord, Plan, Subscription, UnlockKind, UnlockedFeatures,
    };
    use crate::domain::foundation::Timestamp;
    use crate::ports::DraftStore;

    struct Fixture {
        handler: ExportBiodataHandler,
        drafts: Arc<DraftService>,
        draft_store: InMemoryDraftStore,
        entitlements: InMemoryEntitlementStore,
        renderer: MockDocumentRenderer,
        session: DraftSessionId,
    }

    fn user() -> UserId {
        UserId::new("user-1").unwrap()
    }

    async fn fixture(layout: Layout) -> Fixture {
        let entitlements = InMemoryEntitlementStore::new();
        let draft_store = InMemoryDraftStore::new();
        let drafts = Arc::new(DraftService::new(
            Arc::new(draft_store.clone()),
            LayoutRegistry::standard(),
        ));
        let renderer = MockDocumentRenderer::new();
        let session = DraftSessionId::new();
        drafts
            .set_fields(
                &session,
                vec![
                    (BiodataField::FullName, "Priya Sharma".to_string()),
                    (BiodataField::Occupation, "Doctor".to_string()),
                ],
            )
            .await;
        drafts.set_layout(&session, layout).await;

        let handler = ExportBiodataHandler::new(
            Arc::new(EntitlementService::new(
                Arc::new(entitlements.clone()),
                EntitlementEngine::default(),
            )),
            drafts.clone(),
            Arc::new(renderer.clone()),
        );
        Fixture {
            handler,
            drafts,
            draft_store,
            entitlements,
            renderer,
            session,
        }
    }

    async fn grant(store: &InMemoryEntitlementStore, unlocked: UnlockedFeatures) {
        store
            .insert(EntitlementRecord {
                unlocked,
                ..EntitlementRecord::new(user())
            })
            .await;
    }

    fn command(f: &Fixture, layout: Option<Layout>) -> ExportBiodataCommand {
        ExportBiodataCommand {
            user_id: user(),
            session_id: f.session,
            layout,
        }
    }

    #[tokio::test]
    async fn free_user_cannot_download() {
        let f = fixture(Layout::Modern).await;

        let err = f.handler.handle(command(&f, None)).await.unwrap_err();

        assert!(matches!(err, ExportError::DownloadLocked(Layout::Modern)));
        assert_eq!(err.code(), ErrorCode::DownloadLocked);
        assert_eq!(f.renderer.render_count(), 0);
    }

    #[tokio::test]
    async fn modern_unlock_exports_named_file() {
        let f = fixture(Layout::Modern).await;
        grant(&f.entitlements, UnlockedFeatures::for_kind(UnlockKind::UnlockModernDownload)).await;

        let result = f.handler.handle(command(&f, None)).await.unwrap();

        assert_eq!(result.layout, Layout::Modern);
        assert_eq!(result.artifact.filename, "Priya_Sharma_Biodata.pdf");
        let (node, options) = f.renderer.rendered().remove(0);
        assert_eq!(node.id(), Some(ROOT_NODE_ID));
        assert_eq!(options.page_format, PageFormat::A4Portrait);
    }

    #[tokio::test]
    async fn exporting_other_layout_restores_visible_layout() {
        let f = fixture(Layout::Modern).await;
        grant(&f.entitlements, UnlockedFeatures::for_kind(UnlockKind::UnlockTraditional)).await;

        let result = f
            .handler
            .handle(command(&f, Some(Layout::Traditional)))
            .await
            .unwrap();

        assert_eq!(result.layout, Layout::Traditional);
        let (node, _) = f.renderer.rendered().remove(0);
        assert!(matches!(
            node,
            crate::domain::biodata::DocumentNode::Root { layout: Layout::Traditional, .. }
        ));
        assert_eq!(f.drafts.current(&f.session).await.draft.layout, Layout::Modern);
    }

    #[tokio::test]
    async fn renderer_failure_is_reported_and_not_retried() {
        let f = fixture(Layout::Traditional).await;
        let now = Timestamp::now();
        f.entitlements
            .insert(EntitlementRecord {
                subscription: Subscription::free().apply_purchased_plan(Plan::Silver, "pay", now),
                ..EntitlementRecord::new(user())
            })
            .await;
        f.renderer.fail_next(1);

        let err = f
            .handler
            .handle(command(&f, Some(Layout::Modern)))
            .await
            .unwrap_err();

        assert!(matches!(err, ExportError::Render(_)));
        assert!(err.is_retryable());
        assert_eq!(f.renderer.render_count(), 0);
        assert_eq!(f.drafts.current(&f.session).await.draft.layout, Layout::Traditional);

        // A manual retry goes through.
        assert!(f.handler.handle(command(&f, Some(Layout::Modern))).await.is_ok());
        assert_eq!(f.renderer.render_count(), 1);
    }

    #[tokio::test]
    async fn exported_document_contains_filled_fields_only() {
        let f = fixture(Layout::Modern).await;
        grant(&f.entitlements, UnlockedFeatures::for_kind(UnlockKind::UnlockModernDownload)).await;

        f.handler.handle(command(&f, None)).await.unwrap();

        let (node, _) = f.renderer.rendered().remove(0);
        let labels: Vec<&str> = node.fields().into_iter().map(|(label, _)| label).collect();
        assert!(!labels.contains(&"Height"));
        assert!(!labels.contains(&"Email"));
        assert!(node.plain_text().contains("Priya Sharma"));
        assert!(node.plain_text().contains("Doctor"));
    }

    #[tokio::test]
    async fn edit_during_export_saves_the_visible_layout() {
        let f = fixture(Layout::Modern).await;
        grant(&f.entitlements, UnlockedFeatures::for_kind(UnlockKind::UnlockTraditional)).await;
        f.renderer.delay_renders(Duration::from_millis(200));
        let Fixture {
            handler,
            drafts,
            draft_store,
            session,
            ..
        } = f;
        let handler = Arc::new(handler);

        let export = {
            let handler = handler.clone();
            tokio::spawn(async move {
                handler
                    .handle(ExportBiodataCommand {
                        user_id: user(),
                        session_id: session,
                        layout: Some(Layout::Traditional),
                    })
                    .await
            })
        };

        // Wait until the export has switched the layout.
        let live = drafts.open(&session).await;
        tokio::time::timeout(Duration::from_secs(2), async {
            while live.session().current().draft.layout != Layout::Traditional {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        let edited = drafts
            .set_fields(&session, vec![(BiodataField::Diet, "Vegetarian".to_string())])
            .await;
        assert!(export.await.unwrap().is_ok());

        assert_eq!(edited.draft.layout, Layout::Modern);
        let stored = draft_store.load(&session).await.unwrap().unwrap();
        assert_eq!(stored.layout, Layout::Modern);
        assert_eq!(stored.field(BiodataField::Diet), "Vegetarian");
        assert_eq!(drafts.current(&session).await.draft.layout, Layout::Modern);
    }
}
