//! Layout renderers.
//!
//! Each layout turns a [`BiodataDraft`] into a [`DocumentNode`] tree rooted
//! at [`ROOT_NODE_ID`](super::ROOT_NODE_ID). Blank fields are omitted and a
//! section with nothing in it is dropped entirely.

mod modern;
mod traditional;

pub use modern::ModernRenderer;
pub use traditional::TraditionalRenderer;

use std::collections::HashMap;
use std::sync::Arc;

use super::{BiodataDraft, BiodataField, DocumentNode, Layout};

/// Renders a draft in one layout.
pub trait LayoutRenderer: Send + Sync {
    fn layout(&self) -> Layout;

    fn render(&self, draft: &BiodataDraft) -> DocumentNode;
}

/// Lookup of renderers by layout.
#[derive(Clone)]
pub struct LayoutRegistry {
    renderers: HashMap<Layout, Arc<dyn LayoutRenderer>>,
}

impl LayoutRegistry {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Registry with the built-in modern and traditional renderers.
    pub fn standard() -> Self {
        Self::empty()
            .with(Arc::new(ModernRenderer))
            .with(Arc::new(TraditionalRenderer))
    }

    pub fn with(mut self, renderer: Arc<dyn LayoutRenderer>) -> Self {
        self.renderers.insert(renderer.layout(), renderer);
        self
    }

    pub fn get(&self, layout: Layout) -> Option<&Arc<dyn LayoutRenderer>> {
        self.renderers.get(&layout)
    }

    /// Renders `draft` in its own layout, falling back to modern when that
    /// layout has no renderer.
    pub fn render(&self, draft: &BiodataDraft) -> DocumentNode {
        match self.get(draft.layout).or_else(|| self.get(Layout::Modern)) {
            Some(renderer) => renderer.render(draft),
            None => ModernRenderer.render(draft),
        }
    }
}

impl Default for LayoutRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for LayoutRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut layouts: Vec<_> = self.renderers.keys().map(Layout::as_str).collect();
        layouts.sort_unstable();
        f.debug_struct("LayoutRegistry").field("layouts", &layouts).finish()
    }
}

/// Accumulates the fields of one section.
pub(crate) struct SectionBuilder<'a> {
    draft: &'a BiodataDraft,
    title: &'static str,
    children: Vec<DocumentNode>,
}

impl<'a> SectionBuilder<'a> {
    pub(crate) fn new(draft: &'a BiodataDraft, title: &'static str) -> Self {
        Self {
            draft,
            title,
            children: Vec::new(),
        }
    }

    /// Adds `label: value` when `field` is filled.
    pub(crate) fn field(self, label: &str, field: BiodataField) -> Self {
        let value = self.draft.field(field).trim().to_string();
        self.value(label, value)
    }

    /// Adds a pre-computed value when it is not blank.
    pub(crate) fn value(mut self, label: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.trim().is_empty() {
            self.children.push(DocumentNode::Field {
                label: label.to_string(),
                value,
            });
        }
        self
    }

    /// The section node, or `None` when nothing was added.
    pub(crate) fn build(self) -> Option<DocumentNode> {
        if self.children.is_empty() {
            return None;
        }
        Some(DocumentNode::Section {
            title: self.title.to_string(),
            children: self.children,
        })
    }
}

/// Non-blank values joined with `separator`.
pub(crate) fn join_present(
    draft: &BiodataDraft,
    fields: &[BiodataField],
    separator: &str,
) -> String {
    fields
        .iter()
        .map(|f| draft.field(*f).trim())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Age as shown on every layout: "28 years", or blank.
pub(crate) fn age_in_years(draft: &BiodataDraft) -> String {
    present(draft, BiodataField::Age)
        .map(|age| format!("{} years", age))
        .unwrap_or_default()
}

/// Trimmed value of `field`, or `None` when blank.
pub(crate) fn present(draft: &BiodataDraft, field: BiodataField) -> Option<String> {
    let value = draft.field(field).trim();
    (!value.is_empty()).then(|| value.to_string())
}
