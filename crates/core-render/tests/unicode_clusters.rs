use core_render::LineLayout;
use core_text::{Line, grapheme};

fn clusters(text: &str) -> Vec<&str> {
    let layout = LineLayout::compute(&Line::new(text, 0));
    assert!(layout.agrees_with(text));
    let mut bounds: Vec<usize> = layout.clusters.iter().map(|c| c.byte).collect();
    bounds.push(text.len());
    bounds.windows(2).map(|w| &text[w[0]..w[1]]).collect()
}

#[test]
fn variation_selector_stays_with_base() {
    // U+2699 GEAR + U+FE0F VS16
    assert_eq!(clusters("⚙️X"), vec!["⚙️", "X"]);
    let layout = LineLayout::compute(&Line::new("⚙️X", 0));
    assert_eq!(layout.width, 3);
}

#[test]
fn combining_mark_sequence_is_one_cell() {
    let text = "e\u{0301}z";
    assert_eq!(clusters(text), vec!["e\u{0301}", "z"]);
    let layout = LineLayout::compute(&Line::new(text, 0));
    assert_eq!(layout.visual_col(3), 1);
    assert_eq!(layout.byte_at_col(1), 3);
}

#[test]
fn zwj_family_single_cluster() {
    // Family: man + zwj + woman + zwj + girl + zwj + boy
    assert_eq!(clusters("👨‍👩‍👧‍👦Z"), vec!["👨‍👩‍👧‍👦", "Z"]);
}

#[test]
fn skin_tone_modifier_sequence() {
    let text = "👍🏽!";
    assert_eq!(clusters(text), vec!["👍🏽", "!"]);
    let layout = LineLayout::compute(&Line::new(text, 0));
    assert_eq!(layout.visual_col(text.len() - 1), 2);
}

#[test]
fn tabs_expand_to_stops_in_the_table() {
    let text = "a\tb\t\tc";
    let layout = LineLayout::compute(&Line::new(text, 0));
    let cols: Vec<usize> = layout.clusters.iter().map(|c| c.col).collect();
    assert_eq!(cols, vec![0, 1, 4, 5, 8, 12]);
    assert_eq!(layout.width, 13);
    assert_eq!(grapheme::visual_col(text, text.len()), layout.width);
}
