//! Configuration loading and parsing.
//!
//! Parses `inkwell.toml` (or an override path supplied by the binary). Every
//! key is optional; missing sections fall back to defaults and unknown fields
//! are ignored. Values that depend on the viewport (scroll margins) are kept
//! raw and clamped to half the viewport in `Config::apply_context`; the raw
//! value is retained so a resize can re-clamp.
//!
//! ```toml
//! [history]
//! capacity = 1000
//! debounce_ms = 400
//!
//! [edit]
//! indent_width = 4
//! use_tabs = false
//! comment_token = "//"
//!
//! [scroll.margin]
//! vertical = 0
//! horizontal = 0
//!
//! [find]
//! case_sensitive = false
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "inkwell.toml";
const MAX_INDENT_WIDTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigContext {
    pub viewport_columns: usize,
    pub viewport_rows: usize,
}

impl ConfigContext {
    pub fn new(viewport_columns: usize, viewport_rows: usize) -> Self {
        Self {
            viewport_columns,
            viewport_rows,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    #[serde(default = "HistoryConfig::default_capacity")]
    pub capacity: usize,
    #[serde(default = "HistoryConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: Self::default_capacity(),
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl HistoryConfig {
    const fn default_capacity() -> usize {
        1000
    }
    const fn default_debounce_ms() -> u64 {
        400
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditConfig {
    #[serde(default = "EditConfig::default_indent_width")]
    pub indent_width: usize,
    #[serde(default)]
    pub use_tabs: bool,
    #[serde(default = "EditConfig::default_comment_token")]
    pub comment_token: String,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            indent_width: Self::default_indent_width(),
            use_tabs: false,
            comment_token: Self::default_comment_token(),
        }
    }
}

impl EditConfig {
    const fn default_indent_width() -> usize {
        4
    }
    fn default_comment_token() -> String {
        "//".to_owned()
    }

    /// One level of indentation as text.
    pub fn indent_unit(&self) -> String {
        if self.use_tabs {
            "\t".to_owned()
        } else {
            " ".repeat(self.indent_width)
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct MarginConfig {
    #[serde(default)]
    pub vertical: usize,
    #[serde(default)]
    pub horizontal: usize,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ScrollConfig {
    #[serde(default)]
    pub margin: MarginConfig,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FindConfig {
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub edit: EditConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub find: FindConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>,
    pub file: ConfigFile,
    pub source: Option<PathBuf>,
    pub effective_vertical_margin: usize,
    pub effective_horizontal_margin: usize,
}

/// Config path following platform conventions: a local `inkwell.toml` wins,
/// then `<config_dir>/inkwell/inkwell.toml`.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("inkwell").join(CONFIG_FILE_NAME);
    }
    local
}

/// Load from `path` (or the discovered path). A missing or malformed file
/// yields defaults.
pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default().sanitized());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
                ..Config::default()
            }
            .sanitized())
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default().sanitized())
        }
    }
}

impl Config {
    /// Clamp values that are invalid regardless of viewport.
    fn sanitized(mut self) -> Self {
        let history = &mut self.file.history;
        if history.capacity == 0 {
            info!(target: "config", raw = 0, clamped = 1, "history_capacity_clamped");
            history.capacity = 1;
        }
        let edit = &mut self.file.edit;
        let width = edit.indent_width.clamp(1, MAX_INDENT_WIDTH);
        if width != edit.indent_width {
            info!(target: "config", raw = edit.indent_width, clamped = width, "indent_width_clamped");
            edit.indent_width = width;
        }
        self
    }

    pub fn history_capacity(&self) -> usize {
        self.file.history.capacity
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.file.history.debounce_ms)
    }

    pub fn edit(&self) -> &EditConfig {
        &self.file.edit
    }

    pub fn find_case_sensitive(&self) -> bool {
        self.file.find.case_sensitive
    }

    /// Clamp both scroll margins to half the viewport along their axis.
    /// Returns the effective `(vertical, horizontal)` margins.
    pub fn apply_context(&mut self, ctx: ConfigContext) -> (usize, usize) {
        let raw = &self.file.scroll.margin;
        let vertical = clamp_margin("vertical", raw.vertical, ctx.viewport_rows);
        let horizontal = clamp_margin("horizontal", raw.horizontal, ctx.viewport_columns);
        self.effective_vertical_margin = vertical;
        self.effective_horizontal_margin = horizontal;
        (vertical, horizontal)
    }

    /// Re-clamp on a viewport change. `Some` when either margin changed.
    pub fn recompute_with_context(&mut self, ctx: ConfigContext) -> Option<(usize, usize)> {
        let prev = (self.effective_vertical_margin, self.effective_horizontal_margin);
        let current = self.apply_context(ctx);
        (current != prev).then_some(current)
    }
}

fn clamp_margin(axis: &'static str, raw: usize, extent: usize) -> usize {
    let max = extent / 2;
    let clamped = raw.min(max);
    if clamped != raw {
        info!(target: "config", axis, raw, clamped, max, extent, "scroll_margin_clamped");
    }
    clamped
}
