//! Line-oriented edit scripts: the headless host's command decoder.
//!
//! One command per line; blank lines and `#` comments are skipped. Positions
//! are 1-based (`goto 3 5` is row 3, column 5). Text arguments take the rest
//! of the line with `\n`, `\t` and `\\` escapes. `resize W H` reports a new
//! viewport size to the host.

use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use core_events::{AsyncEventSource, Edge, EditCommand, Event};
use core_search::SearchMode;
use core_text::Cursor;
use core_text::motion::Direction;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptStep {
    Command(EditCommand),
    Resize { width: usize, height: usize },
    /// Pause the script; ticks keep flowing meanwhile.
    Wait(Duration),
    Save,
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            // Unknown escapes pass through so regex classes like `\d` survive.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn position(row: &str, col: &str) -> Result<Cursor> {
    let row: usize = row.parse().with_context(|| format!("bad row `{row}`"))?;
    let col: usize = col.parse().with_context(|| format!("bad column `{col}`"))?;
    Ok(Cursor::new(row.saturating_sub(1), col.saturating_sub(1)))
}

fn motion(name: &str, selecting: bool) -> Result<EditCommand> {
    use Direction::{Backward, Forward};
    Ok(match name {
        "left" => EditCommand::MoveChar { dir: Backward, selecting },
        "right" => EditCommand::MoveChar { dir: Forward, selecting },
        "up" => EditCommand::MoveLine { dir: Backward, selecting },
        "down" => EditCommand::MoveLine { dir: Forward, selecting },
        "word-left" => EditCommand::MoveWord { dir: Backward, selecting },
        "word-right" => EditCommand::MoveWord { dir: Forward, selecting },
        "para-up" => EditCommand::MoveParagraph { dir: Backward, selecting },
        "para-down" => EditCommand::MoveParagraph { dir: Forward, selecting },
        "page-up" => EditCommand::MovePage { dir: Backward, selecting },
        "page-down" => EditCommand::MovePage { dir: Forward, selecting },
        "home" => EditCommand::MoveLineEdge { edge: Edge::Start, selecting },
        "end" => EditCommand::MoveLineEdge { edge: Edge::End, selecting },
        "top" => EditCommand::MoveDocumentEdge { edge: Edge::Start, selecting },
        "bottom" => EditCommand::MoveDocumentEdge { edge: Edge::End, selecting },
        other => bail!("unknown motion `{other}`"),
    })
}

fn find(rest: &str, default_case_sensitive: bool) -> Result<EditCommand> {
    let mut mode = SearchMode::Literal;
    let mut case_sensitive = default_case_sensitive;
    let mut rest = rest;
    loop {
        let (flag, tail) = rest.split_once(' ').unwrap_or((rest, ""));
        match flag {
            "--regex" => mode = SearchMode::Regex,
            "--word" => mode = SearchMode::Word,
            "--case" => case_sensitive = true,
            "--nocase" => case_sensitive = false,
            _ => break,
        }
        rest = tail;
    }
    Ok(EditCommand::Find {
        pattern: unescape(rest),
        case_sensitive,
        mode,
    })
}

/// Decode one script line. `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str, default_case_sensitive: bool) -> Result<Option<ScriptStep>> {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args: Vec<&str> = rest.split_whitespace().collect();
    let selecting = args.last() == Some(&"select");
    let cmd = match word {
        "insert" => EditCommand::InsertText(unescape(rest)),
        "newline" => EditCommand::InsertText("\n".into()),
        "backspace" => EditCommand::Backspace,
        "delete" => EditCommand::DeleteForward,
        "delete-selection" => EditCommand::DeleteSelection,
        "indent" => EditCommand::Indent,
        "outdent" => EditCommand::Outdent,
        "comment" => EditCommand::ToggleComment,
        "duplicate-line" => EditCommand::DuplicateLine,
        "duplicate-selection" => EditCommand::DuplicateSelection,
        "line-up" => EditCommand::ReorderLineUp,
        "line-down" => EditCommand::ReorderLineDown,
        "undo" => EditCommand::Undo,
        "redo" => EditCommand::Redo,
        "copy" => EditCommand::Copy,
        "cut" => EditCommand::Cut,
        "paste" => EditCommand::Paste,
        "move" => {
            let name = args.first().ok_or_else(|| anyhow!("move needs a motion"))?;
            motion(name, selecting)?
        }
        "goto" => match args.as_slice() {
            [row, col, ..] => EditCommand::MoveTo {
                to: position(row, col)?,
                selecting,
            },
            _ => bail!("goto needs a row and a column"),
        },
        "select" => match args.as_slice() {
            ["all"] => EditCommand::SelectAll,
            ["none"] => EditCommand::SelectNone,
            ["word", row, col] => EditCommand::SelectWordAt(position(row, col)?),
            ["word", row, col, "extend"] => EditCommand::ExtendWordTo(position(row, col)?),
            ["line", row] => EditCommand::SelectLineAt(position(row, "1")?),
            ["line", row, "extend"] => EditCommand::ExtendLineTo(position(row, "1")?),
            _ => bail!("unknown selection `{rest}`"),
        },
        "find" => find(rest, default_case_sensitive)?,
        "find-next" => EditCommand::FindNext,
        "find-prev" => EditCommand::FindPrevious,
        "find-clear" => EditCommand::ClearFind,
        "replace" => EditCommand::ReplaceCurrent(unescape(rest)),
        "replace-all" => EditCommand::ReplaceAll(unescape(rest)),
        "blur" => EditCommand::FocusLost,
        "clear-history" => EditCommand::ClearHistory,
        "wait" => {
            let ms: u64 = rest
                .trim()
                .parse()
                .with_context(|| format!("bad wait duration `{rest}`"))?;
            return Ok(Some(ScriptStep::Wait(Duration::from_millis(ms))));
        }
        "save" => return Ok(Some(ScriptStep::Save)),
        "resize" => match args.as_slice() {
            [width, height] => {
                let width = width.parse().with_context(|| format!("bad width `{width}`"))?;
                let height = height.parse().with_context(|| format!("bad height `{height}`"))?;
                return Ok(Some(ScriptStep::Resize { width, height }));
            }
            _ => bail!("resize needs a width and a height"),
        },
        other => bail!("unknown command `{other}`"),
    };
    Ok(Some(ScriptStep::Command(cmd)))
}

/// Streams a script into the event channel, then requests shutdown.
pub struct ScriptEventSource<R> {
    reader: R,
    case_sensitive: bool,
}

impl<R> ScriptEventSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    pub fn new(reader: R, case_sensitive: bool) -> Self {
        Self {
            reader,
            case_sensitive,
        }
    }
}

impl<R> AsyncEventSource for ScriptEventSource<R>
where
    R: AsyncBufRead + Unpin + Send + 'static,
{
    fn name(&self) -> &'static str {
        "script"
    }

    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()> {
        let ScriptEventSource {
            reader,
            case_sensitive,
        } = *self;
        tokio::spawn(async move {
            let mut lines = reader.lines();
            let mut number = 0usize;
            loop {
                let line = match lines.next_line().await {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        warn!(target: "runtime.script", ?err, "script_read_failed");
                        break;
                    }
                };
                number += 1;
                let event = match parse_line(&line, case_sensitive) {
                    Ok(None) => continue,
                    Ok(Some(ScriptStep::Wait(dur))) => {
                        tokio::time::sleep(dur).await;
                        continue;
                    }
                    Ok(Some(ScriptStep::Save)) => Event::Save,
                    Ok(Some(ScriptStep::Resize { width, height })) => Event::Resize { width, height },
                    Ok(Some(ScriptStep::Command(cmd))) => Event::Command(cmd),
                    Err(err) => {
                        warn!(target: "runtime.script", line = number, error = %err, "script_line_rejected");
                        continue;
                    }
                };
                if tx.send(event).await.is_err() {
                    debug!(target: "runtime.script", "script source stopping: channel closed");
                    return;
                }
            }
            debug!(target: "runtime.script", lines = number, "script_finished");
            let _ = tx.send(Event::Shutdown).await;
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn cmd(line: &str) -> EditCommand {
        match parse_line(line, false).unwrap() {
            Some(ScriptStep::Command(c)) => c,
            other => panic!("expected command, got {other:?}"),
        }
    }

    #[test]
    fn text_arguments_keep_spaces_and_unescape() {
        assert_eq!(cmd("insert  a b\\nc\\\\"), EditCommand::InsertText(" a b\nc\\".into()));
        assert_eq!(cmd("replace-all x\\ty"), EditCommand::ReplaceAll("x\ty".into()));
    }

    #[test]
    fn positions_are_one_based() {
        assert_eq!(
            cmd("goto 2 3 select"),
            EditCommand::MoveTo {
                to: Cursor::new(1, 2),
                selecting: true
            }
        );
        assert_eq!(cmd("select word 1 1"), EditCommand::SelectWordAt(Cursor::origin()));
        assert_eq!(cmd("select line 4"), EditCommand::SelectLineAt(Cursor::new(3, 0)));
        assert_eq!(cmd("select word 2 5 extend"), EditCommand::ExtendWordTo(Cursor::new(1, 4)));
        assert_eq!(cmd("select line 1 extend"), EditCommand::ExtendLineTo(Cursor::origin()));
    }

    #[test]
    fn motions_and_selection_flag() {
        assert_eq!(
            cmd("move word-right select"),
            EditCommand::MoveWord {
                dir: Direction::Forward,
                selecting: true
            }
        );
        assert_eq!(
            cmd("move bottom"),
            EditCommand::MoveDocumentEdge {
                edge: Edge::End,
                selecting: false
            }
        );
        assert!(parse_line("move sideways", false).is_err());
    }

    #[test]
    fn find_flags() {
        assert_eq!(
            cmd("find --regex --case a\\d+ b"),
            EditCommand::Find {
                pattern: "a\\d+ b".into(),
                case_sensitive: true,
                mode: SearchMode::Regex
            }
        );
        assert_eq!(
            cmd("find --word cat"),
            EditCommand::Find {
                pattern: "cat".into(),
                case_sensitive: false,
                mode: SearchMode::Word
            }
        );
    }

    #[test]
    fn comments_waits_and_errors() {
        assert_eq!(parse_line("   # note", false).unwrap(), None);
        assert_eq!(parse_line("", false).unwrap(), None);
        assert_eq!(
            parse_line("wait 250", false).unwrap(),
            Some(ScriptStep::Wait(Duration::from_millis(250)))
        );
        assert_eq!(parse_line("save", false).unwrap(), Some(ScriptStep::Save));
        assert_eq!(
            parse_line("resize 40 12", false).unwrap(),
            Some(ScriptStep::Resize { width: 40, height: 12 })
        );
        assert!(parse_line("resize 40", false).is_err());
        assert_eq!(cmd("find-clear"), EditCommand::ClearFind);
        let err = parse_line("frobnicate", false).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
        assert!(parse_line("wait soon", false).is_err());
    }

    #[tokio::test]
    async fn source_streams_events_then_shuts_down() {
        let script: &'static [u8] = b"insert hi\nbogus\nwait 1\nsave\n";
        let (tx, mut rx) = mpsc::channel(8);
        let handle = Box::new(ScriptEventSource::new(tokio::io::BufReader::new(script), false)).spawn(tx);
        let mut got = Vec::new();
        while let Some(ev) = rx.recv().await {
            let stop = ev == Event::Shutdown;
            got.push(ev);
            if stop {
                break;
            }
        }
        handle.await.unwrap();
        assert_eq!(
            got,
            vec![
                Event::Command(EditCommand::InsertText("hi".into())),
                Event::Save,
                Event::Shutdown
            ]
        );
    }
}
