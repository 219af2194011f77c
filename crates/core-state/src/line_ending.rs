//! Line ending detection and LF normalization for loaded text.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// LF-only text plus what is needed to write it back in its original form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub normalized: String,
    /// Majority style in the source.
    pub original: LineEnding,
    pub had_trailing_newline: bool,
    /// More than one style was present.
    pub mixed: bool,
}

impl NormalizedText {
    /// Lines of the normalized text, without the empty tail a trailing newline
    /// would otherwise produce. Never empty.
    pub fn lines(&self) -> Vec<String> {
        let body = if self.had_trailing_newline {
            self.normalized.strip_suffix('\n').unwrap_or(&self.normalized)
        } else {
            &self.normalized
        };
        body.split('\n').map(str::to_owned).collect()
    }
}

/// Normalize CRLF and lone CR to LF. The majority style wins, ties resolved
/// CRLF > LF > CR.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                out.push('\n');
            }
            '\r' => {
                cr += 1;
                out.push('\n');
            }
            '\n' => {
                lf += 1;
                out.push('\n');
            }
            other => out.push(other),
        }
    }
    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let styles_seen = [crlf, lf, cr].iter().filter(|n| **n > 0).count();
    NormalizedText {
        had_trailing_newline: input.ends_with('\n') || input.ends_with('\r'),
        normalized: out,
        original,
        mixed: styles_seen > 1,
    }
}

/// Join `lines` with `ending`, appending a final terminator when requested.
pub fn denormalize(lines: &[String], ending: LineEnding, trailing_newline: bool) -> String {
    let mut out = lines.join(ending.as_str());
    if trailing_newline {
        out.push_str(ending.as_str());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn crlf_majority_is_detected() {
        let n = normalize_line_endings("a\r\nb\nc\r\n");
        assert_eq!(n.normalized, "a\nb\nc\n");
        assert_eq!(n.original, LineEnding::Crlf);
        assert!(n.mixed);
        assert!(n.had_trailing_newline);
        assert_eq!(n.lines(), vec!["a", "b", "c"]);
    }

    #[test]
    fn lone_cr_keeps_multibyte_intact() {
        let n = normalize_line_endings("😀\rβ");
        assert_eq!(n.normalized, "😀\nβ");
        assert_eq!(n.original, LineEnding::Cr);
        assert!(!n.had_trailing_newline);
        assert!(!n.mixed);
    }

    #[test]
    fn empty_input_is_one_empty_line() {
        let n = normalize_line_endings("");
        assert_eq!(n.lines(), vec![""]);
        assert_eq!(n.original, LineEnding::Lf);
    }

    #[test]
    fn denormalize_restores_original_form() {
        let src = "one\r\ntwo\r\n";
        let n = normalize_line_endings(src);
        assert_eq!(denormalize(&n.lines(), n.original, n.had_trailing_newline), src);
    }

    proptest! {
        #[test]
        fn normalizing_twice_is_stable(s in "[a-zé\r\n]{0,40}") {
            let once = normalize_line_endings(&s);
            let twice = normalize_line_endings(&once.normalized);
            prop_assert_eq!(&once.normalized, &twice.normalized);
            prop_assert!(!twice.normalized.contains('\r'));
        }
    }
}
