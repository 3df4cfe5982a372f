//! Document Renderer port - turns a rendered biodata into a file.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::biodata::DocumentNode;

/// Physical page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageFormat {
    #[default]
    A4Portrait,
}

impl PageFormat {
    /// CSS `@page` size value.
    pub fn css_size(&self) -> &'static str {
        match self {
            PageFormat::A4Portrait => "A4 portrait",
        }
    }

    /// Pandoc `geometry` variable.
    pub fn paper(&self) -> &'static str {
        match self {
            PageFormat::A4Portrait => "a4paper",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub filename: String,
    pub page_format: PageFormat,
}

impl RenderOptions {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            page_format: PageFormat::default(),
        }
    }
}

/// Output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    #[error("Rendering failed: {0}")]
    Failed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Port for document rendering.
///
/// # Contract
///
/// Implementations must:
/// - Render exactly the node given, nothing around it
/// - Use `options.filename` as the artifact name
/// - Never retry on failure
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render_node_to_file(
        &self,
        node: &DocumentNode,
        options: &RenderOptions,
    ) -> Result<ExportedArtifact, RenderError>;
}
