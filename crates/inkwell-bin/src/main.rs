//! Inkwell headless entrypoint: open a file, run an edit script, save.
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use core_config::{Config, ConfigContext, load_from};
use core_editor::{Editor, EditorOptions, FileSource};
use core_events::{
    EVENT_CHANNEL_CAP, EditorEvent, Event, EventSourceRegistry, FixedViewport, Notifier,
    TickEventSource,
};
use core_render::ViewportSize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod highlight;
mod script;

use highlight::KeywordHighlighter;
use script::ScriptEventSource;

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "inkwell", version, about = "Inkwell headless text editor")]
struct Args {
    /// File to edit. Created on save if it does not exist.
    pub path: Option<PathBuf>,
    /// Edit script to run; reads stdin when omitted.
    #[arg(long)]
    pub script: Option<PathBuf>,
    /// Configuration file (overrides discovery of `inkwell.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Log file; logging is off unless this or `RUST_LOG` is set.
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
    /// Filter directive used when `RUST_LOG` is unset.
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
    /// Virtual viewport columns.
    #[arg(long, default_value_t = 80)]
    pub width: usize,
    /// Virtual viewport rows.
    #[arg(long, default_value_t = 24)]
    pub height: usize,
    /// Tick interval driving the debounce timer, in milliseconds.
    #[arg(long = "tick-ms", default_value_t = 50)]
    pub tick_ms: u64,
    /// Print the final content to stdout.
    #[arg(long)]
    pub print: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    ScriptFinished,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::ScriptFinished => "script_finished",
            ShutdownReason::ChannelClosed => "channel_closed",
        }
    }
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn log_shutdown_stage(reason: ShutdownReason, stage: &'static str) {
    info!(
        target: "runtime.shutdown",
        reason = reason.as_str(),
        stage = stage,
        "shutdown_stage"
    );
}

/// Forwards engine notifications into the log.
struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &EditorEvent) {
        match event {
            EditorEvent::ContentCommitted { version, rows, ops } => {
                debug!(target: "runtime.notify", version, first_row = rows.start(), last_row = rows.end(), ops, "content_committed")
            }
            EditorEvent::ReadOnlyRejected => warn!(target: "runtime.notify", "read_only_rejected"),
            other => debug!(target: "runtime.notify", ?other, "editor_event"),
        }
    }
}

fn configure_logging(args: &Args) -> Option<WorkerGuard> {
    let env_set = std::env::var_os("RUST_LOG").is_some();
    let log_path = match (&args.log_file, env_set) {
        (Some(path), _) => path.clone(),
        (None, true) => PathBuf::from("inkwell.log"),
        (None, false) => return None,
    };
    let dir = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let name = log_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "inkwell.log".into());
    let file_appender = tracing_appender::rolling::never(dir, name);
    let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(nb_writer)
        .try_init()
    {
        Ok(_) => Some(guard),
        // Global subscriber already installed; dropping the guard shuts the writer down.
        Err(_) => None,
    }
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            tracing::error!(target: "runtime.panic", ?info, "panic");
            default_panic(info);
        }));
    });
}

struct Runtime {
    editor: Editor,
    config: Config,
    source: Option<FileSource>,
    rx: mpsc::Receiver<Event>,
    tx: Option<mpsc::Sender<Event>>,
    source_handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Runtime {
    async fn run(&mut self) -> Result<()> {
        let span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter = span.enter();

        let mut reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            match event {
                Event::Command(cmd) => {
                    let mutation = cmd.is_mutation();
                    match self.editor.execute(cmd) {
                        Ok(changed) => {
                            trace!(target: "runtime", mutation, changed, version = self.editor.version(), "command_handled")
                        }
                        Err(err) => warn!(target: "runtime", error = %err, "command_failed"),
                    }
                }
                Event::Tick => {
                    self.editor.tick();
                }
                Event::Save => self.save(),
                Event::Resize { width, height } => self.resize(width, height),
                Event::Shutdown => {
                    reason = ShutdownReason::ScriptFinished;
                    break;
                }
            }
        }

        self.rx.close();
        self.finalize_shutdown(reason).await;
        Ok(())
    }

    fn save(&mut self) {
        let Some(source) = self.source.as_mut() else {
            warn!(target: "runtime", "save_without_path");
            return;
        };
        if let Err(err) = self.editor.save(source) {
            error!(target: "runtime", error = %format!("{err:#}"), "save_failed");
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.editor.resize(ViewportSize::new(width, height));
        if let Some((vertical, horizontal)) =
            self.config.recompute_with_context(ConfigContext::new(width, height))
        {
            debug!(target: "config", vertical, horizontal, "effective_margins");
            self.editor.set_scroll_margins(vertical, horizontal);
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        self.editor.dispose();
        if let Some(tx) = self.tx.take() {
            trace!(target: "runtime.shutdown", reason = reason.as_str(), "dropping_runtime_sender");
            drop(tx);
        }
        while let Some(handle) = self.source_handles.pop() {
            match tokio::time::timeout(Duration::from_millis(200), handle).await {
                Ok(Ok(_)) => trace!(target: "runtime.shutdown", reason = reason.as_str(), "event_source_task_stopped"),
                Ok(Err(err)) if err.is_cancelled() => {
                    trace!(target: "runtime.shutdown", reason = reason.as_str(), "event_source_task_cancelled")
                }
                Ok(Err(err)) => {
                    error!(target: "runtime.shutdown", reason = reason.as_str(), ?err, "event_source_task_error")
                }
                Err(_) => warn!(target: "runtime.shutdown", reason = reason.as_str(), "event_source_task_timeout"),
            }
        }
        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _log_guard = configure_logging(&args);
    install_panic_hook();
    info!(target: "runtime", "startup");

    let mut config = load_from(args.config.clone())?;
    let (vertical, horizontal) = config.apply_context(ConfigContext::new(args.width, args.height));
    debug!(target: "config", vertical, horizontal, "effective_margins");
    let options = EditorOptions::from_config(&config);
    let case_sensitive = options.case_sensitive;

    let mut editor = Editor::new(options)
        .with_highlighter(Box::new(KeywordHighlighter))
        .with_viewport(Box::new(FixedViewport::new(args.width, args.height)));
    editor.add_notifier(Arc::new(LogNotifier));

    let source = match &args.path {
        Some(path) => {
            let mut src = FileSource::new(path);
            editor
                .open(&mut src)
                .with_context(|| format!("opening {}", path.display()))?;
            Some(src)
        }
        None => None,
    };
    info!(
        target: "runtime.startup",
        path = args.path.as_ref().map(|p| p.display().to_string()).as_deref(),
        lines = editor.line_count(),
        config_override = args.config.is_some(),
        effective_margin = config.effective_vertical_margin,
        "bootstrap_complete"
    );

    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let mut registry = EventSourceRegistry::new();
    registry.register(TickEventSource::new(Duration::from_millis(args.tick_ms.max(1))));
    match &args.script {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("opening script {}", path.display()))?;
            registry.register(ScriptEventSource::new(tokio::io::BufReader::new(file), case_sensitive));
        }
        None => registry.register(ScriptEventSource::new(
            tokio::io::BufReader::new(tokio::io::stdin()),
            case_sensitive,
        )),
    }
    let source_handles = registry.spawn_all(&tx);

    let mut runtime = Runtime {
        editor,
        config,
        source,
        rx,
        tx: Some(tx),
        source_handles,
    };
    runtime.run().await?;

    if args.print {
        println!("{}", runtime.editor.content());
    }
    Ok(())
}
