//! Small lexical highlighter for the headless host.
//!
//! Works per line with no state carried between lines: keywords, numbers,
//! double-quoted strings, and line comments. Kinds without a known comment
//! token fall back to plain text.

use core_events::Highlighter;
use core_text::{Style, StyleSpan, StyledLine};

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "else", "enum", "fn", "for", "if",
    "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self",
    "Self", "static", "struct", "super", "trait", "type", "unsafe", "use", "where", "while",
];

#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordHighlighter;

fn comment_token(kind: &str) -> Option<&'static str> {
    match kind {
        "rs" | "c" | "h" | "cpp" | "js" | "ts" | "go" | "java" => Some("//"),
        "toml" | "py" | "sh" | "yaml" | "yml" => Some("#"),
        _ => None,
    }
}

impl Highlighter for KeywordHighlighter {
    fn highlight(&self, text: &str, file_kind: &str) -> StyledLine {
        let Some(comment) = comment_token(file_kind) else {
            return StyledLine::plain(text);
        };
        let keywords = if file_kind == "rs" { RUST_KEYWORDS } else { &[] };
        let bytes = text.as_bytes();
        let mut spans = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let rest = &text[i..];
            let b = bytes[i];
            if rest.starts_with(comment) {
                spans.push(StyleSpan::new(i..text.len(), Style::Comment));
                break;
            }
            if b == b'"' {
                let end = rest[1..]
                    .find('"')
                    .map_or(text.len(), |off| i + 1 + off + 1);
                spans.push(StyleSpan::new(i..end, Style::String));
                i = end;
                continue;
            }
            if b.is_ascii_alphanumeric() || b == b'_' {
                let len = rest
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(rest.len());
                let token = &rest[..len];
                if b.is_ascii_digit() {
                    spans.push(StyleSpan::new(i..i + len, Style::Number));
                } else if keywords.contains(&token) {
                    spans.push(StyleSpan::new(i..i + len, Style::Keyword));
                }
                i += len;
                continue;
            }
            // Skip one whole char so slicing stays on char boundaries.
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
        StyledLine {
            text: text.to_owned(),
            spans,
        }
    }
}
