//! `DocumentSource` backed by a file on disk.
//!
//! Loading normalizes CRLF / CR to LF and remembers the majority style and
//! whether the file ended with a newline; saving writes both back.

use std::path::{Path, PathBuf};

use anyhow::Context;
use core_events::DocumentSource;
use core_state::{LineEnding, denormalize, normalize_line_endings};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    kind: String,
    ending: LineEnding,
    trailing_newline: bool,
    mixed: bool,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_owned();
        Self {
            path,
            kind,
            ending: LineEnding::Lf,
            trailing_newline: true,
            mixed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    pub fn had_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// The last load saw more than one line ending style.
    pub fn mixed_line_endings(&self) -> bool {
        self.mixed
    }
}

impl DocumentSource for FileSource {
    /// A missing file loads as one empty line so it can be created on save.
    fn load_lines(&mut self) -> anyhow::Result<Vec<String>> {
        if !self.path.exists() {
            debug!(target: "io", path = %self.path.display(), "new_file");
            return Ok(vec![String::new()]);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let norm = normalize_line_endings(&content);
        if norm.mixed {
            warn!(target: "io", path = %self.path.display(), "mixed_line_endings");
        }
        self.ending = norm.original;
        self.trailing_newline = norm.had_trailing_newline;
        self.mixed = norm.mixed;
        let lines = norm.lines();
        debug!(target: "io", lines = lines.len(), ending = ?self.ending, "file_loaded");
        Ok(lines)
    }

    fn save(&mut self, lines: &[String]) -> anyhow::Result<()> {
        let out = denormalize(lines, self.ending, self.trailing_newline);
        std::fs::write(&self.path, out.as_bytes())
            .with_context(|| format!("writing {}", self.path.display()))?;
        debug!(target: "io", bytes = out.len(), "file_saved");
        Ok(())
    }

    fn file_kind(&self) -> &str {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.rs");
        std::fs::write(&path, "a\r\nb\r\n").unwrap();
        let mut src = FileSource::new(&path);
        assert_eq!(src.file_kind(), "rs");
        assert_eq!(src.load_lines().unwrap(), vec!["a", "b"]);
        assert_eq!(src.line_ending(), LineEnding::Crlf);
        src.save(&["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\r\nb\r\nc\r\n");
    }

    #[test]
    fn missing_trailing_newline_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        std::fs::write(&path, "x\ny").unwrap();
        let mut src = FileSource::new(&path);
        let lines = src.load_lines().unwrap();
        assert!(!src.had_trailing_newline());
        src.save(&lines).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\ny");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = FileSource::new(dir.path().join("new.md"));
        assert_eq!(src.load_lines().unwrap(), vec![String::new()]);
    }

    #[test]
    fn unreadable_path_reports_context() {
        let dir = tempfile::tempdir().unwrap();
        let mut src = FileSource::new(dir.path());
        let err = src.load_lines().unwrap_err();
        assert!(format!("{err:#}").contains("reading"));
    }
}
