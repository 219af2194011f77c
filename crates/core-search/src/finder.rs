//! Find / replace over a buffer snapshot.
//!
//! The buffer is flattened with `\n`, searched with one compiled `Regex`, and
//! every match is mapped back to cursor coordinates through a `LineIndex`.
//! Matches are recomputed only when asked (`search` / `refresh`); edits made
//! in between leave them stale until the caller refreshes.

use std::ops::Range;

use core_text::{Buffer, Cursor, Selection};
use regex::{Regex, RegexBuilder};
use thiserror::Error;
use tracing::debug;

use crate::line_index::LineIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Literal,
    /// Literal text that must stand as a whole word.
    Word,
    Regex,
}

#[derive(Debug, Error)]
pub enum FindError {
    #[error("invalid search pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Forward selection covering the match.
    pub range: Selection,
    /// Byte range in the flattened text.
    pub flat: Range<usize>,
}

/// A single planned replacement: the span to replace and its new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub range: Selection,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Finder {
    pattern: String,
    case_sensitive: bool,
    mode: SearchMode,
    regex: Option<Regex>,
    haystack: String,
    matches: Vec<Match>,
    target: Option<usize>,
}

fn compile(pattern: &str, case_sensitive: bool, mode: SearchMode) -> Result<Regex, FindError> {
    let source = match mode {
        SearchMode::Literal => regex::escape(pattern),
        SearchMode::Word => format!(r"\b{}\b", regex::escape(pattern)),
        SearchMode::Regex => pattern.to_owned(),
    };
    RegexBuilder::new(&source)
        .case_insensitive(!case_sensitive)
        .multi_line(true)
        .build()
        .map_err(|source| FindError::InvalidPattern {
            pattern: pattern.to_owned(),
            source,
        })
}

impl Finder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn target_index(&self) -> Option<usize> {
        self.target
    }

    pub fn current(&self) -> Option<&Match> {
        self.target.and_then(|i| self.matches.get(i))
    }

    pub fn is_active(&self) -> bool {
        self.regex.is_some()
    }

    /// Compile `pattern` and collect every match. The target becomes the first
    /// match at or after `from`, wrapping to the first match. An empty pattern
    /// clears the finder. Returns the match count.
    pub fn search(
        &mut self,
        buffer: &Buffer,
        pattern: &str,
        case_sensitive: bool,
        mode: SearchMode,
        from: Cursor,
    ) -> Result<usize, FindError> {
        if pattern.is_empty() {
            self.clear();
            return Ok(0);
        }
        let regex = compile(pattern, case_sensitive, mode)?;
        self.pattern = pattern.to_owned();
        self.case_sensitive = case_sensitive;
        self.mode = mode;
        self.regex = Some(regex);
        Ok(self.refresh(buffer, from))
    }

    /// Recompute matches for the current pattern against `buffer`.
    pub fn refresh(&mut self, buffer: &Buffer, from: Cursor) -> usize {
        let Some(regex) = &self.regex else {
            return 0;
        };
        let index = LineIndex::build(buffer);
        self.haystack = buffer.flatten();
        // Empty matches (e.g. `a*`) select nothing and are skipped.
        self.matches = regex
            .find_iter(&self.haystack)
            .filter(|m| !m.is_empty())
            .map(|m| Match {
                range: Selection::new(index.to_cursor(m.start()), index.to_cursor(m.end())),
                flat: m.range(),
            })
            .collect();
        self.target = if self.matches.is_empty() {
            None
        } else {
            let from = index.to_flat(buffer.clamp(from));
            let at = self.matches.partition_point(|m| m.flat.start < from);
            Some(if at == self.matches.len() { 0 } else { at })
        };
        debug!(target: "search", matches = self.matches.len(), pattern_len = self.pattern.len(), "matches_recomputed");
        self.matches.len()
    }

    /// Advance the target, wrapping. No-op (returns `None`) without matches.
    pub fn next(&mut self) -> Option<&Match> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.target = Some(self.target.map_or(0, |i| (i + 1) % n));
        self.current()
    }

    pub fn previous(&mut self) -> Option<&Match> {
        if self.matches.is_empty() {
            return None;
        }
        let n = self.matches.len();
        self.target = Some(self.target.map_or(n - 1, |i| (i + n - 1) % n));
        self.current()
    }

    /// Replacement text for `m` (capture groups expand in regex mode).
    fn replacement_text(&self, m: &Match, replacement: &str) -> String {
        match (&self.regex, self.mode) {
            (Some(regex), SearchMode::Regex) => {
                let Some(caps) = regex.captures_at(&self.haystack, m.flat.start) else {
                    return replacement.to_owned();
                };
                let mut out = String::new();
                caps.expand(replacement, &mut out);
                out
            }
            _ => replacement.to_owned(),
        }
    }

    pub fn plan_replace_current(&self, replacement: &str) -> Option<Replacement> {
        let m = self.current()?;
        Some(Replacement {
            range: m.range,
            text: self.replacement_text(m, replacement),
        })
    }

    /// Every match paired with its replacement, left to right.
    pub fn plan_replace_all(&self, replacement: &str) -> Vec<Replacement> {
        self.matches
            .iter()
            .map(|m| Replacement {
                range: m.range,
                text: self.replacement_text(m, replacement),
            })
            .collect()
    }

    /// `"k of n"` for the target, `"No results"` for an active search without
    /// matches, and an empty string when no search is active.
    pub fn match_label(&self) -> String {
        match (self.is_active(), self.target) {
            (false, _) => String::new(),
            (true, Some(i)) => format!("{} of {}", i + 1, self.matches.len()),
            (true, None) => "No results".to_owned(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
