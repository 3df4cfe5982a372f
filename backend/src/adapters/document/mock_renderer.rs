//! Mock document renderer for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::domain::biodata::DocumentNode;
use crate::ports::{DocumentRenderer, ExportedArtifact, RenderError, RenderOptions};

/// Records each rendered node; can be told to fail or to take its time.
#[derive(Debug, Clone, Default)]
pub struct MockDocumentRenderer {
    rendered: Arc<Mutex<Vec<(DocumentNode, RenderOptions)>>>,
    failures_left: Arc<AtomicUsize>,
    delay_ms: Arc<AtomicU64>,
}

impl MockDocumentRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next `count` renders fail.
    pub fn fail_next(&self, count: usize) {
        self.failures_left.store(count, Ordering::SeqCst);
    }

    /// Every render takes at least `delay`.
    pub fn delay_renders(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    fn guard(&self) -> MutexGuard<'_, Vec<(DocumentNode, RenderOptions)>> {
        self.rendered.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn rendered(&self) -> Vec<(DocumentNode, RenderOptions)> {
        self.guard().clone()
    }

    pub fn render_count(&self) -> usize {
        self.guard().len()
    }
}

#[async_trait]
impl DocumentRenderer for MockDocumentRenderer {
    async fn render_node_to_file(
        &self,
        node: &DocumentNode,
        options: &RenderOptions,
    ) -> Result<ExportedArtifact, RenderError> {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(RenderError::Failed("simulated render failure".into()));
        }

        self.guard().push((node.clone(), options.clone()));
        Ok(ExportedArtifact {
            filename: options.filename.clone(),
            content_type: "application/pdf",
            bytes: node.plain_text().into_bytes(),
        })
    }
}
