//! HTML to plain text.

use scraper::{Html, Node};

/// Elements whose entire subtree is dropped before text extraction
pub const NOISE_TAGS: &[&str] = &["script", "style", "nav", "footer"];

/// Extract the readable text of an HTML document.
///
/// Text nodes are collected in document order with the subtrees of
/// [`NOISE_TAGS`] removed. Comments and the doctype are ignored. Whitespace
/// runs collapse to a single space and the result is trimmed.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let mut raw = String::with_capacity(html.len() / 2);

    // Explicit stack so deeply nested markup cannot exhaust the call stack
    let mut pending = vec![document.tree.root()];
    while let Some(node) = pending.pop() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(element) if NOISE_TAGS.contains(&element.name()) => {}
            Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_) => {}
            _ => pending.extend(node.children().rev()),
        }
    }

    collapse_whitespace(&raw)
}

/// Join whitespace-separated words with single spaces
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
