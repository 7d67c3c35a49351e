//! Rich text to HTML
//!
//! Body blocks come from the content API as structured text: typed blocks
//! carrying plain text plus formatting spans. The only way to get markup out
//! of them is [`as_html`], which escapes every piece of text and emits a fixed
//! set of tags, so the resulting [`SafeHtml`] can be injected into pages
//! without further escaping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A rich text block, kept verbatim apart from the fields rendering reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextBlock {
    /// Blocks without a type are plain paragraphs
    #[serde(rename = "type", default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub spans: Vec<Span>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_kind() -> String {
    "paragraph".to_string()
}

impl RichTextBlock {
    /// A block of the given type with plain text and no spans
    pub fn new(kind: &str, text: &str) -> Self {
        Self {
            kind: kind.to_string(),
            text: text.to_string(),
            spans: Vec::new(),
            url: None,
            alt: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        Self::new("paragraph", text)
    }
}

/// Inline formatting over `[start, end)` of a block's text
///
/// Offsets count UTF-16 code units, like the API that produces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

/// Markup produced by [`as_html`]; safe to inject unescaped
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for SafeHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "ul",
            ListKind::Ordered => "ol",
        }
    }
}

/// Render a sequence of blocks to sanitized HTML
pub fn as_html(blocks: &[RichTextBlock]) -> SafeHtml {
    let mut out = String::new();
    let mut list: Option<ListKind> = None;

    for block in blocks {
        let item_kind = match block.kind.as_str() {
            "list-item" => Some(ListKind::Unordered),
            "o-list-item" => Some(ListKind::Ordered),
            _ => None,
        };

        if list != item_kind {
            if let Some(kind) = list {
                out.push_str(&format!("</{}>", kind.tag()));
            }
            if let Some(kind) = item_kind {
                out.push_str(&format!("<{}>", kind.tag()));
            }
            list = item_kind;
        }

        match block.kind.as_str() {
            "heading1" | "heading2" | "heading3" | "heading4" | "heading5" | "heading6" => {
                let level = &block.kind["heading".len()..];
                out.push_str(&format!("<h{}>{}</h{}>", level, render_spans(block), level));
            }
            "paragraph" => out.push_str(&format!("<p>{}</p>", render_spans(block))),
            "preformatted" => out.push_str(&format!("<pre>{}</pre>", render_spans(block))),
            "list-item" | "o-list-item" => {
                out.push_str(&format!("<li>{}</li>", render_spans(block)))
            }
            "image" => {
                if let Some(src) = block.url.as_deref().filter(|u| is_safe_url(u, false)) {
                    out.push_str(&format!(
                        r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                        html_escape(src),
                        html_escape(block.alt.as_deref().unwrap_or(""))
                    ));
                }
            }
            "embed" => {
                tracing::debug!("Skipping embed block");
            }
            other => {
                tracing::debug!("Rendering unknown block type {} as paragraph", other);
                out.push_str(&format!("<p>{}</p>", render_spans(block)));
            }
        }
    }

    if let Some(kind) = list {
        out.push_str(&format!("</{}>", kind.tag()));
    }

    SafeHtml(out)
}

/// Opening and closing tag for a span, `None` when it renders as plain text
fn span_tags(span: &Span) -> Option<(String, &'static str)> {
    match span.kind.as_str() {
        "strong" => Some(("<strong>".to_string(), "</strong>")),
        "em" => Some(("<em>".to_string(), "</em>")),
        "label" => {
            let label = span
                .data
                .as_ref()
                .and_then(|d| d.get("label"))
                .and_then(|l| l.as_str())
                .unwrap_or("");
            Some((
                format!(r#"<span class="{}">"#, html_escape(label)),
                "</span>",
            ))
        }
        "hyperlink" => {
            let url = span
                .data
                .as_ref()
                .and_then(|d| d.get("url"))
                .and_then(|u| u.as_str())
                .filter(|u| is_safe_url(u, true))?;
            Some((
                format!(r#"<a href="{}" rel="noopener">"#, html_escape(url)),
                "</a>",
            ))
        }
        _ => None,
    }
}

/// Render a block's text with its spans applied
fn render_spans(block: &RichTextBlock) -> String {
    let mut spans: Vec<(&Span, (String, &'static str))> = block
        .spans
        .iter()
        .filter(|s| s.start < s.end)
        .filter_map(|s| span_tags(s).map(|tags| (s, tags)))
        .collect();
    // Outer spans first when several start together
    spans.sort_by(|a, b| a.0.start.cmp(&b.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut out = String::with_capacity(block.text.len());
    let mut open: Vec<usize> = Vec::new();
    let mut pos = 0usize;

    let mut chars = block.text.chars();
    loop {
        // Close spans ending here, reopening the ones that continue
        if open.iter().any(|&i| spans[i].0.end <= pos) {
            for &i in open.iter().rev() {
                out.push_str(spans[i].1 .1);
            }
            open.retain(|&i| spans[i].0.end > pos);
            for &i in &open {
                out.push_str(&spans[i].1 .0);
            }
        }

        let Some(ch) = chars.next() else { break };

        for (i, (span, tags)) in spans.iter().enumerate() {
            if span.start == pos {
                out.push_str(&tags.0);
                open.push(i);
            }
        }

        match ch {
            '\n' => out.push_str("<br />"),
            _ => push_escaped(&mut out, ch),
        }
        pos += ch.len_utf16();
    }

    for &i in open.iter().rev() {
        out.push_str(spans[i].1 .1);
    }

    out
}

/// Only plain web links (and mail links inside text) are emitted
pub fn is_safe_url(url: &str, allow_mailto: bool) -> bool {
    let lower = url.trim().to_ascii_lowercase();
    lower.starts_with("https://")
        || lower.starts_with("http://")
        || (allow_mailto && lower.starts_with("mailto:"))
}

fn push_escaped(out: &mut String, ch: char) {
    match ch {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        '\'' => out.push_str("&#39;"),
        _ => out.push(ch),
    }
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        push_escaped(&mut out, ch);
    }
    out
}
