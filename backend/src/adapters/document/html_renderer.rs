//! Pure Rust renderer producing a print-ready HTML file.

use async_trait::async_trait;

use super::html::render_document;
use crate::domain::biodata::DocumentNode;
use crate::ports::{DocumentRenderer, ExportedArtifact, RenderError, RenderOptions};

/// Renders to HTML with an `@page` rule; the browser prints it to PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentRenderer;

impl HtmlDocumentRenderer {
    pub fn new() -> Self {
        Self
    }
}

/// `name.pdf` becomes `name.html`.
fn html_filename(filename: &str) -> String {
    match filename.strip_suffix(".pdf") {
        Some(stem) => format!("{}.html", stem),
        None => format!("{}.html", filename),
    }
}

#[async_trait]
impl DocumentRenderer for HtmlDocumentRenderer {
    async fn render_node_to_file(
        &self,
        node: &DocumentNode,
        options: &RenderOptions,
    ) -> Result<ExportedArtifact, RenderError> {
        Ok(ExportedArtifact {
            filename: html_filename(&options.filename),
            content_type: "text/html; charset=utf-8",
            bytes: render_document(node, options.page_format).into_bytes(),
        })
    }
}
