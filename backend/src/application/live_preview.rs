//! LivePreview - Re-renders a draft every time it changes.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::biodata::{DocumentNode, DraftRevision, Layout, LayoutRegistry};

/// Rendered document for one draft revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewFrame {
    pub revision: u64,
    pub layout: Layout,
    pub document: DocumentNode,
}

impl PreviewFrame {
    fn render(registry: &LayoutRegistry, revision: &DraftRevision) -> Self {
        Self {
            revision: revision.revision,
            layout: revision.draft.layout,
            document: registry.render(&revision.draft),
        }
    }
}

/// Background renderer bound to one draft session.
///
/// The task stops when the session is dropped or when this handle is.
#[derive(Debug)]
pub struct LivePreview {
    frames: watch::Receiver<PreviewFrame>,
    task: JoinHandle<()>,
}

impl LivePreview {
    /// Renders the current revision immediately, then every later one.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(registry: LayoutRegistry, mut drafts: watch::Receiver<DraftRevision>) -> Self {
        let first = PreviewFrame::render(&registry, &drafts.borrow_and_update());
        let (sender, frames) = watch::channel(first);

        let task = tokio::spawn(async move {
            while drafts.changed().await.is_ok() {
                let frame = PreviewFrame::render(&registry, &drafts.borrow_and_update());
                if sender.send(frame).is_err() {
                    break;
                }
            }
        });

        Self { frames, task }
    }

    pub fn latest(&self) -> PreviewFrame {
        self.frames.borrow().clone()
    }

    /// Waits for the first frame rendered from `revision` or later.
    ///
    /// Returns `None` on timeout or if rendering has stopped.
    pub async fn frame_at(&self, revision: u64, timeout: Duration) -> Option<PreviewFrame> {
        let mut frames = self.frames.clone();
        let waited =
            tokio::time::timeout(timeout, frames.wait_for(|f| f.revision >= revision)).await;
        match waited {
            Ok(Ok(frame)) => Some(frame.clone()),
            _ => None,
        }
    }
}

impl Drop for LivePreview {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::biodata::{BiodataField, DraftSession};

    const WAIT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn first_frame_is_available_immediately() {
        let session = DraftSession::default();
        session.set_field(BiodataField::FullName, "Meera Iyer");

        let preview = LivePreview::spawn(LayoutRegistry::standard(), session.subscribe());

        let frame = preview.latest();
        assert_eq!(frame.revision, 1);
        assert!(frame.document.plain_text().contains("Meera Iyer"));
    }

    #[tokio::test]
    async fn every_revision_is_rendered() {
        let session = DraftSession::default();
        let preview = LivePreview::spawn(LayoutRegistry::standard(), session.subscribe());

        let revision = session.set_field(BiodataField::Occupation, "Architect");
        let frame = preview.frame_at(revision, WAIT).await.unwrap();
        assert!(frame.document.plain_text().contains("Architect"));

        let revision = session.set_layout(Layout::Traditional);
        let frame = preview.frame_at(revision, WAIT).await.unwrap();
        assert_eq!(frame.layout, Layout::Traditional);
        assert!(frame.document.plain_text().contains("।। बायोडाटा ।।"));
    }

    #[tokio::test]
    async fn waiting_for_a_future_revision_times_out() {
        let session = DraftSession::default();
        let preview = LivePreview::spawn(LayoutRegistry::standard(), session.subscribe());

        assert!(preview
            .frame_at(5, Duration::from_millis(20))
            .await
            .is_none());
    }
}
