//! Word boundary detection within a single line.
//!
//! A line is tokenized into runs of one class: word characters, whitespace, or
//! a run of one *identical* break character (`, . : ; = ( ) { }`). A word is
//! therefore the maximal substring that crosses neither a break character nor
//! whitespace.

use crate::grapheme;

/// Characters that always terminate a word.
pub const BREAK_CHARS: [char; 9] = [',', '.', ':', ';', '=', '(', ')', '{', '}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Word,
    Space,
    Break(char),
}

/// Classify a grapheme cluster by its first scalar.
pub fn classify(g: &str) -> TokenClass {
    match g.chars().next() {
        Some(c) if c.is_whitespace() => TokenClass::Space,
        Some(c) if BREAK_CHARS.contains(&c) => TokenClass::Break(c),
        _ => TokenClass::Word,
    }
}

fn class_at(line: &str, byte: usize) -> TokenClass {
    let next = grapheme::next_boundary(line, byte);
    classify(&line[byte..next])
}

/// Byte range of the token containing the cluster at `col`. At end of line the
/// token ending there is used; an empty line yields an empty range.
pub fn token_at(line: &str, col: usize) -> std::ops::Range<usize> {
    if line.is_empty() {
        return 0..0;
    }
    let mut col = grapheme::floor_boundary(line, col);
    if col >= line.len() {
        col = grapheme::prev_boundary(line, line.len());
    }
    let class = class_at(line, col);
    let mut start = col;
    while start > 0 {
        let prev = grapheme::prev_boundary(line, start);
        if class_at(line, prev) != class {
            break;
        }
        start = prev;
    }
    let mut end = grapheme::next_boundary(line, col);
    while end < line.len() && class_at(line, end) == class {
        end = grapheme::next_boundary(line, end);
    }
    start..end
}

/// Range of the word under `col`, or `None` when the cluster there is whitespace
/// or a break character.
pub fn word_at(line: &str, col: usize) -> Option<std::ops::Range<usize>> {
    let range = token_at(line, col);
    if range.is_empty() || class_at(line, range.start) != TokenClass::Word {
        return None;
    }
    Some(range)
}

/// Next token end strictly after `col` (skipping leading whitespace), or
/// `None` when only whitespace remains before end of line.
pub fn next_boundary(line: &str, col: usize) -> Option<usize> {
    let mut probe = col;
    while probe < line.len() && class_at(line, probe) == TokenClass::Space {
        probe = grapheme::next_boundary(line, probe);
    }
    if probe >= line.len() {
        return None;
    }
    let end = token_at(line, probe).end;
    debug_assert!(end > col, "word boundary must strictly advance");
    Some(end)
}

/// Previous token start strictly before `col` (skipping trailing whitespace),
/// or `None` when only whitespace precedes `col`.
pub fn prev_boundary(line: &str, col: usize) -> Option<usize> {
    let mut probe = col.min(line.len());
    while probe > 0 {
        let prev = grapheme::prev_boundary(line, probe);
        if class_at(line, prev) != TokenClass::Space {
            break;
        }
        probe = prev;
    }
    if probe == 0 {
        return None;
    }
    let start = token_at(line, grapheme::prev_boundary(line, probe)).start;
    debug_assert!(start < col, "word boundary must strictly retreat");
    Some(start)
}
