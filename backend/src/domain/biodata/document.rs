//! Structured document produced by a layout renderer.

use serde::{Deserialize, Serialize};

use super::Layout;

/// Id of the single addressable root every renderer emits.
pub const ROOT_NODE_ID: &str = "biodata-preview-content";

const MASK_CHAR: char = '•';

/// Node in a rendered biodata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocumentNode {
    Root {
        id: String,
        layout: Layout,
        children: Vec<DocumentNode>,
    },
    Header {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        photo: Option<String>,
    },
    Section {
        title: String,
        children: Vec<DocumentNode>,
    },
    Paragraph {
        text: String,
    },
    Field {
        label: String,
        value: String,
    },
    Footer {
        text: String,
    },
}

impl DocumentNode {
    /// Root node for `layout`.
    pub fn root(layout: Layout, children: Vec<DocumentNode>) -> Self {
        DocumentNode::Root {
            id: ROOT_NODE_ID.to_string(),
            layout,
            children,
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            DocumentNode::Root { id, .. } => Some(id),
            _ => None,
        }
    }

    pub fn children(&self) -> &[DocumentNode] {
        match self {
            DocumentNode::Root { children, .. } | DocumentNode::Section { children, .. } => {
                children.as_slice()
            }
            _ => &[],
        }
    }

    /// Depth-first search for the node carrying `id`.
    pub fn find_by_id(&self, id: &str) -> Option<&DocumentNode> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_by_id(id))
    }

    /// Every `(label, value)` pair, depth-first.
    pub fn fields(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        if let DocumentNode::Field { label, value } = self {
            out.push((label.as_str(), value.as_str()));
        }
        for child in self.children() {
            child.collect_fields(out);
        }
    }

    /// Section titles in order.
    pub fn section_titles(&self) -> Vec<&str> {
        self.children()
            .iter()
            .filter_map(|node| match node {
                DocumentNode::Section { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    /// All visible text, one node per line.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        self.collect_text(&mut lines);
        lines.join("\n")
    }

    fn collect_text(&self, lines: &mut Vec<String>) {
        match self {
            DocumentNode::Root { children, .. } => {
                children.iter().for_each(|c| c.collect_text(lines));
            }
            DocumentNode::Header { title, subtitle, .. } => {
                lines.push(title.clone());
                lines.extend(subtitle.clone());
            }
            DocumentNode::Section { title, children } => {
                lines.push(title.clone());
                children.iter().for_each(|c| c.collect_text(lines));
            }
            DocumentNode::Paragraph { text } => lines.push(text.clone()),
            DocumentNode::Field { label, value } => lines.push(format!("{}: {}", label, value)),
            DocumentNode::Footer { text } => lines.push(text.clone()),
        }
    }

    /// Copy with user-entered content obscured.
    ///
    /// Structure, section titles and labels stay readable; values, the
    /// header text, paragraphs and photos do not.
    pub fn masked(&self) -> DocumentNode {
        match self {
            DocumentNode::Root { id, layout, children } => DocumentNode::Root {
                id: id.clone(),
                layout: *layout,
                children: children.iter().map(DocumentNode::masked).collect(),
            },
            DocumentNode::Header { title, subtitle, .. } => DocumentNode::Header {
                title: mask(title),
                subtitle: subtitle.as_deref().map(mask),
                photo: None,
            },
            DocumentNode::Section { title, children } => DocumentNode::Section {
                title: title.clone(),
                children: children.iter().map(DocumentNode::masked).collect(),
            },
            DocumentNode::Paragraph { text } => DocumentNode::Paragraph { text: mask(text) },
            DocumentNode::Field { label, value } => DocumentNode::Field {
                label: label.clone(),
                value: mask(value),
            },
            DocumentNode::Footer { text } => DocumentNode::Footer { text: text.clone() },
        }
    }
}

fn mask(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_whitespace() { c } else { MASK_CHAR })
        .collect()
}
