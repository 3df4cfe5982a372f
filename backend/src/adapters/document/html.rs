//! Serialises a rendered biodata to a standalone HTML page.

use crate::domain::biodata::{DocumentNode, Layout};
use crate::ports::PageFormat;

const BASE_CSS: &str = r#"
body { font-family: "Noto Sans", "Segoe UI", sans-serif; color: #222; margin: 0; }
.biodata { max-width: 180mm; margin: 0 auto; padding: 12mm; }
.biodata header { text-align: center; margin-bottom: 8mm; }
.biodata header img { width: 35mm; height: 45mm; object-fit: cover; border-radius: 4px; }
.biodata h1 { margin: 4mm 0 1mm; }
.biodata .subtitle { color: #555; margin: 0; }
.biodata section { margin-bottom: 6mm; page-break-inside: avoid; }
.biodata h2 { font-size: 13pt; border-bottom: 1px solid #ccc; padding-bottom: 1mm; }
.biodata dl { display: grid; grid-template-columns: 45mm 1fr; gap: 1.5mm 4mm; margin: 0; }
.biodata dt { font-weight: 600; }
.biodata dd { margin: 0; }
.biodata footer { text-align: center; font-size: 9pt; color: #888; margin-top: 10mm; }
"#;

const MODERN_CSS: &str = r#"
.layout-modern h2 { color: #b0306a; }
.layout-modern header h1 { color: #b0306a; }
"#;

const TRADITIONAL_CSS: &str = r#"
.layout-traditional { border: 3px double #8b4513; background: #fffaf0; }
.layout-traditional h1, .layout-traditional h2 { color: #8b4513; text-align: center; }
"#;

/// Full HTML document for `node`.
pub(crate) fn render_document(node: &DocumentNode, page_format: PageFormat) -> String {
    let title = document_title(node);
    let mut body = String::new();
    write_node(node, &mut body);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
@page {{ size: {page}; margin: 10mm; }}
{base}{modern}{traditional}
    </style>
</head>
<body>
{body}
</body>
</html>"#,
        title = escape(&title),
        page = page_format.css_size(),
        base = BASE_CSS,
        modern = MODERN_CSS,
        traditional = TRADITIONAL_CSS,
        body = body,
    )
}

fn document_title(node: &DocumentNode) -> String {
    node.children()
        .iter()
        .find_map(|child| match child {
            DocumentNode::Header { title, .. } => Some(title.clone()),
            _ => None,
        })
        .unwrap_or_else(|| "Biodata".to_string())
}

fn layout_class(layout: Layout) -> &'static str {
    match layout {
        Layout::Modern => "layout-modern",
        Layout::Traditional => "layout-traditional",
    }
}

fn write_node(node: &DocumentNode, out: &mut String) {
    match node {
        DocumentNode::Root { id, layout, children } => {
            out.push_str(&format!(
                "<article id=\"{}\" class=\"biodata {}\">\n",
                escape(id),
                layout_class(*layout)
            ));
            children.iter().for_each(|c| write_node(c, out));
            out.push_str("</article>\n");
        }
        DocumentNode::Header { title, subtitle, photo } => {
            out.push_str("<header>\n");
            if let Some(photo) = photo {
                out.push_str(&format!("<img src=\"{}\" alt=\"Profile photo\">\n", escape(photo)));
            }
            out.push_str(&format!("<h1>{}</h1>\n", escape(title)));
            if let Some(subtitle) = subtitle {
                out.push_str(&format!("<p class=\"subtitle\">{}</p>\n", escape(subtitle)));
            }
            out.push_str("</header>\n");
        }
        DocumentNode::Section { title, children } => {
            out.push_str(&format!("<section>\n<h2>{}</h2>\n", escape(title)));
            let (fields, others): (Vec<_>, Vec<_>) = children
                .iter()
                .partition(|c| matches!(c, DocumentNode::Field { .. }));
            others.into_iter().for_each(|c| write_node(c, out));
            if !fields.is_empty() {
                out.push_str("<dl>\n");
                fields.into_iter().for_each(|c| write_node(c, out));
                out.push_str("</dl>\n");
            }
            out.push_str("</section>\n");
        }
        DocumentNode::Paragraph { text } => {
            out.push_str(&format!("<p>{}</p>\n", escape(text)));
        }
        DocumentNode::Field { label, value } => {
            out.push_str(&format!(
                "<dt>{}</dt><dd>{}</dd>\n",
                escape(label),
                escape(value)
            ));
        }
        DocumentNode::Footer { text } => {
            out.push_str(&format!("<footer>{}</footer>\n", escape(text)));
        }
    }
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
