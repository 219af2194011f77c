//! Display width of grapheme clusters.
//!
//! All visual column decisions (sticky vertical motion, horizontal scroll,
//! line layout) flow through `egc_width`. The classifier errs on the wide side
//! for pictographic sequences: an extra blank cell is harmless, a missing one
//! makes the caret drift.

use unicode_width::UnicodeWidthChar;

/// Number of cells a tab advances to (next multiple of this value).
pub const TAB_STOP: usize = 4;

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

// Rough Extended Pictographic heuristic (emoji blocks + misc symbols used as emoji)
fn is_extended_pictographic(c: char) -> bool {
    ('\u{1F300}'..='\u{1FAFF}').contains(&c) || ('\u{2600}'..='\u{27BF}').contains(&c)
}

fn is_combining_mark(c: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&c)
        || ('\u{1AB0}'..='\u{1AFF}').contains(&c)
        || ('\u{1DC0}'..='\u{1DFF}').contains(&c)
        || ('\u{20D0}'..='\u{20FF}').contains(&c)
        || ('\u{FE20}'..='\u{FE2F}').contains(&c)
}

/// Width in cells of a single extended grapheme cluster (tabs excluded, see `visual_width`).
pub fn egc_width(egc: &str) -> u16 {
    let mut chars = egc.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if first.is_ascii() && egc.len() == 1 {
        return if first.is_ascii_control() { 0 } else { 1 };
    }
    let mut pictographic = is_extended_pictographic(first);
    let mut regional = usize::from(is_regional_indicator(first));
    let mut wide = first.width().unwrap_or(1) == 2;
    for c in chars {
        if c == ZWJ || c == VS16 || is_combining_mark(c) {
            pictographic |= c == VS16 && !first.is_ascii_digit();
            continue;
        }
        pictographic |= is_extended_pictographic(c);
        if is_regional_indicator(c) {
            regional += 1;
        }
        wide |= c.width().unwrap_or(1) == 2;
    }
    if pictographic || regional == 2 || wide { 2 } else { 1 }
}

/// Visual width of a whole line fragment, expanding tabs to `TAB_STOP`.
pub fn visual_width(text: &str) -> usize {
    use unicode_segmentation::UnicodeSegmentation;
    text.graphemes(true).fold(0usize, |col, g| col + cell_advance(g, col))
}

/// Advance in cells for grapheme `g` placed at visual column `col`.
pub fn cell_advance(g: &str, col: usize) -> usize {
    if g == "\t" {
        TAB_STOP - (col % TAB_STOP)
    } else {
        egc_width(g) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_and_cjk() {
        assert_eq!(egc_width("a"), 1);
        assert_eq!(egc_width("漢"), 2);
    }

    #[test]
    fn emoji_sequences_are_wide() {
        assert_eq!(egc_width("😀"), 2);
        assert_eq!(egc_width("👨\u{200D}👩\u{200D}👧"), 2);
        assert_eq!(egc_width("🇩🇪"), 2);
    }

    #[test]
    fn combining_mark_is_narrow() {
        assert_eq!(egc_width("e\u{0301}"), 1);
    }

    #[test]
    fn tabs_expand_to_next_stop() {
        assert_eq!(visual_width("\t"), TAB_STOP);
        assert_eq!(visual_width("ab\tc"), TAB_STOP + 1);
    }
}
