use std::time::Duration;

use core_config::Config;
use core_state::{DEBOUNCE_WINDOW, UNDO_HISTORY_MAX};

/// Engine tunables, usually derived from `inkwell.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub history_capacity: usize,
    pub debounce: Duration,
    /// Text inserted by one `indent`.
    pub indent_unit: String,
    /// Columns one `outdent` removes when the line is space-indented.
    pub indent_width: usize,
    pub comment_token: String,
    pub vertical_margin: usize,
    pub horizontal_margin: usize,
    pub case_sensitive: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            history_capacity: UNDO_HISTORY_MAX,
            debounce: DEBOUNCE_WINDOW,
            indent_unit: "    ".to_owned(),
            indent_width: 4,
            comment_token: "//".to_owned(),
            vertical_margin: 0,
            horizontal_margin: 0,
            case_sensitive: false,
        }
    }
}

impl EditorOptions {
    /// Margins are the effective ones, so call `Config::apply_context` first.
    pub fn from_config(cfg: &Config) -> Self {
        let edit = cfg.edit();
        Self {
            history_capacity: cfg.history_capacity(),
            debounce: cfg.debounce_window(),
            indent_unit: edit.indent_unit(),
            indent_width: edit.indent_width,
            comment_token: edit.comment_token.clone(),
            vertical_margin: cfg.effective_vertical_margin,
            horizontal_margin: cfg.effective_horizontal_margin,
            case_sensitive: cfg.find_case_sensitive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_config_defaults() {
        let cfg = Config::default();
        let from_cfg = EditorOptions::from_config(&cfg);
        // `Config::default()` is unsanitized but every default is already valid.
        assert_eq!(from_cfg, EditorOptions::default());
    }

    #[test]
    fn margins_follow_viewport_clamp() {
        let mut cfg = Config::default();
        cfg.file.scroll.margin.vertical = 50;
        cfg.file.edit.use_tabs = true;
        cfg.apply_context(core_config::ConfigContext::new(80, 10));
        let opts = EditorOptions::from_config(&cfg);
        assert_eq!(opts.vertical_margin, 5);
        assert_eq!(opts.indent_unit, "\t");
    }
}
