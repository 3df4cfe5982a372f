//! Pandoc-backed PDF renderer.
//!
//! The node is serialised to HTML and piped through Pandoc. Pandoc and a
//! PDF engine must be installed; otherwise rendering fails with
//! `RenderError::Unavailable`.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::html::render_document;
use crate::domain::biodata::DocumentNode;
use crate::ports::{DocumentRenderer, ExportedArtifact, RenderError, RenderOptions};

/// # Example
///
/// ```rust,ignore
/// let renderer = PandocPdfRenderer::new().with_pdf_engine("wkhtmltopdf");
/// let artifact = renderer.render_node_to_file(&node, &RenderOptions::new("biodata.pdf")).await?;
/// ```
#[derive(Debug, Clone)]
pub struct PandocPdfRenderer {
    /// Path to pandoc executable. If None, will search PATH.
    pandoc_path: Option<String>,
    pdf_engine: String,
    timeout: Duration,
}

impl Default for PandocPdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PandocPdfRenderer {
    pub fn new() -> Self {
        Self {
            pandoc_path: None,
            pdf_engine: "xelatex".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_pandoc_path(mut self, path: impl Into<String>) -> Self {
        self.pandoc_path = Some(path.into());
        self
    }

    pub fn with_pdf_engine(mut self, engine: impl Into<String>) -> Self {
        self.pdf_engine = engine.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn pandoc_command(&self) -> &str {
        self.pandoc_path.as_deref().unwrap_or("pandoc")
    }

    /// Check if Pandoc is installed and accessible.
    pub async fn is_available(&self) -> bool {
        Command::new(self.pandoc_command())
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl DocumentRenderer for PandocPdfRenderer {
    async fn render_node_to_file(
        &self,
        node: &DocumentNode,
        options: &RenderOptions,
    ) -> Result<ExportedArtifact, RenderError> {
        if !self.is_available().await {
            return Err(RenderError::Unavailable(
                "Pandoc is not installed. Install from https://pandoc.org/installing.html".into(),
            ));
        }

        let html = render_document(node, options.page_format);
        let mut child = Command::new(self.pandoc_command())
            .args(["-f", "html", "-t", "pdf"])
            .arg(format!("--pdf-engine={}", self.pdf_engine))
            .arg("-V")
            .arg(format!("papersize={}", options.page_format.paper()))
            .args(["-V", "geometry:margin=10mm"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| RenderError::Unavailable(format!("Failed to start Pandoc: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RenderError::Failed(format!("Pandoc timed out after {:?}", self.timeout))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Failed(format!(
                "Pandoc returned error: {}",
                stderr.trim()
            )));
        }

        Ok(ExportedArtifact {
            filename: options.filename.clone(),
            content_type: "application/pdf",
            bytes: output.stdout,
        })
    }
}
