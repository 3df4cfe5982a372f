//! Document adapters - Implementations of the `DocumentRenderer` port.
//!
//! - `HtmlDocumentRenderer` - Print-ready HTML (pure Rust)
//! - `PandocPdfRenderer` - PDF through an external Pandoc install
//! - `MockDocumentRenderer` - Recording mock for tests

mod html;
mod html_renderer;
mod mock_renderer;
mod pandoc_renderer;

pub use html_renderer::HtmlDocumentRenderer;
pub use mock_renderer::MockDocumentRenderer;
pub use pandoc_renderer::PandocPdfRenderer;
