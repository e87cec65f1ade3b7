//! codeline entrypoint.
use anyhow::Result;
use clap::Parser;
use core_actions::io_ops::{read_scratch, write_scratch};
use core_actions::{CommandCatalog, DispatchResult, Effect, finish_shell};
use core_events::{EVENT_CHANNEL_CAP, Event, InputEvent};
use core_render::{FrameStyle, Renderer};
use core_state::{HistoryStore, ModelInfo, SessionPaths, SessionState};
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalGuard, terminal_size};
use std::fmt;
use std::io::{IsTerminal, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};
use tracing_appender::non_blocking::WorkerGuard;

mod exec;
mod status_line;

use status_line::StatusLineScheduler;

const DATA_DIR_NAME: &str = ".codeline";
const LOG_FILE_NAME: &str = "codeline.log";
const HISTORY_FILE_NAME: &str = "history";

/// CLI arguments.
#[derive(Parser, Debug)]
#[command(name = "codeline", version, about = "Interactive prompt-line session")]
struct Args {
    /// Configuration file path (overrides discovery of `codeline.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
    /// Project directory; defaults to the current directory.
    #[arg(long = "project-dir")]
    pub project_dir: Option<PathBuf>,
}

struct AppStartup {
    backend: CrosstermBackend,
    log_guard: Option<WorkerGuard>,
}

struct RuntimeContext<'a> {
    state: SessionState,
    config: core_config::Config,
    terminal_guard: TerminalGuard<'a>,
}

impl AppStartup {
    fn new() -> Self {
        Self {
            backend: CrosstermBackend::new(),
            log_guard: None,
        }
    }

    fn run<'a>(&'a mut self, args: &Args) -> Result<RuntimeContext<'a>> {
        let project_dir = match &args.project_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        let data_dir = project_dir.join(DATA_DIR_NAME);
        std::fs::create_dir_all(&data_dir)?;

        self.configure_logging(&data_dir)?;
        Self::install_panic_hook();
        info!(target: "runtime", project = %project_dir.display(), "startup");

        let config_path = args.config.clone().unwrap_or_else(core_config::discover);
        let config = core_config::load_from(Some(config_path))?;
        let state = Self::load_session(&config, project_dir, data_dir);
        info!(
            target: "runtime.startup",
            session = %state.session_id,
            history = state.history.len(),
            config = config.source.as_ref().map(|p| p.display().to_string()).as_deref(),
            status_line = config.file.status_line.command().is_some(),
            "bootstrap_complete"
        );

        self.backend.set_title("codeline")?;
        let guard = self.backend.enter_guard()?;
        Ok(RuntimeContext {
            state,
            config,
            terminal_guard: guard,
        })
    }

    fn configure_logging(&mut self, log_dir: &Path) -> Result<()> {
        let log_path = log_dir.join(LOG_FILE_NAME);
        if log_path.exists() {
            let _ = std::fs::remove_file(&log_path);
        }

        let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
        let (nb_writer, guard) = tracing_appender::non_blocking(file_appender);
        match tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(nb_writer)
            .with_ansi(false)
            .try_init()
        {
            Ok(_) => self.log_guard = Some(guard),
            Err(_err) => {
                // Subscriber already installed; dropping the guard stops the writer.
            }
        }
        Ok(())
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

    fn load_session(
        config: &core_config::Config,
        project_dir: PathBuf,
        data_dir: PathBuf,
    ) -> SessionState {
        let history_path = config
            .file
            .history
            .file
            .clone()
            .unwrap_or_else(|| data_dir.join(HISTORY_FILE_NAME));
        let history = HistoryStore::load(history_path);
        let models = config
            .file
            .models
            .iter()
            .map(|m| ModelInfo::new(m.id.clone(), m.display_name.clone()))
            .collect();
        let paths = SessionPaths {
            project_dir,
            data_dir,
            config_path: config.source.clone(),
        };
        let mut state = SessionState::new(paths, history, models);
        state.version = env!("CARGO_PKG_VERSION").to_string();
        state
    }
}

enum LoopControl {
    Continue { redraw: bool },
    Break { reason: ShutdownReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShutdownReason {
    Quit,
    ShutdownEvent,
    ChannelClosed,
}

impl ShutdownReason {
    fn as_str(&self) -> &'static str {
        match self {
            ShutdownReason::Quit => "quit",
            ShutdownReason::ShutdownEvent => "shutdown_event",
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

struct SessionRuntime<'a> {
    state: SessionState,
    config: core_config::Config,
    catalog: CommandCatalog,
    renderer: Renderer,
    status_line: StatusLineScheduler,
    seen_revision: Option<u64>,
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
    input_task: Option<JoinHandle<()>>,
    input_shutdown: Option<core_input::AsyncInputShutdown>,
    terminal_guard: TerminalGuard<'a>,
}

impl<'a> SessionRuntime<'a> {
    fn new(
        context: RuntimeContext<'a>,
        tx: mpsc::Sender<Event>,
        rx: mpsc::Receiver<Event>,
        input_task: JoinHandle<()>,
        input_shutdown: core_input::AsyncInputShutdown,
    ) -> Self {
        let RuntimeContext {
            state,
            config,
            terminal_guard,
        } = context;
        let status_line =
            StatusLineScheduler::new(&config.file.status_line, config.shell_invocation());
        Self {
            state,
            config,
            catalog: CommandCatalog::builtin(),
            renderer: Renderer::new(FrameStyle {
                color: stdout().is_terminal(),
            }),
            status_line,
            seen_revision: None,
            rx,
            tx,
            input_task: Some(input_task),
            input_shutdown: Some(input_shutdown),
            terminal_guard,
        }
    }

    async fn run(&mut self) -> Result<()> {
        self.finish_cycle(true);

        let loop_span = tracing::debug_span!(target: "runtime", "event_loop");
        let _enter_loop = loop_span.enter();

        let mut shutdown_reason = ShutdownReason::ChannelClosed;
        while let Some(event) = self.rx.recv().await {
            let control = match event {
                Event::Input(input) => self.handle_input_event(input).await,
                Event::StatusLine { revision, text } => self.handle_status_line(revision, text),
                Event::ShellFinished { command, output } => {
                    debug!(target: "runtime", command = %command, "shell_finished");
                    finish_shell(&mut self.state, &output);
                    LoopControl::Continue { redraw: true }
                }
                Event::RenderRequested => LoopControl::Continue { redraw: true },
                Event::Shutdown => LoopControl::Break {
                    reason: ShutdownReason::ShutdownEvent,
                },
            };

            match control {
                LoopControl::Break { reason } => {
                    shutdown_reason = reason;
                    break;
                }
                LoopControl::Continue { redraw } => self.finish_cycle(redraw),
            }
        }

        self.rx.close();
        self.finalize_shutdown(shutdown_reason).await;
        Ok(())
    }

    async fn handle_input_event(&mut self, input: InputEvent) -> LoopControl {
        let now = Instant::now();
        let result = match input {
            InputEvent::Key(key) => {
                core_actions::handle_key(&key, &mut self.state, &self.catalog, now)
            }
            InputEvent::Paste(text) => {
                core_actions::handle_paste(&text, &mut self.state, &self.catalog, now)
            }
            InputEvent::Resize(columns, rows) => {
                trace!(target: "runtime", columns, rows, "resize");
                DispatchResult::redraw()
            }
        };
        self.apply_result(result).await
    }

    async fn apply_result(&mut self, result: DispatchResult) -> LoopControl {
        match result.effect {
            Some(Effect::Quit) => LoopControl::Break {
                reason: ShutdownReason::Quit,
            },
            Some(Effect::RunShell(command)) => {
                self.spawn_shell(command);
                LoopControl::Continue { redraw: true }
            }
            Some(Effect::OpenEditor) => {
                self.open_editor().await;
                LoopControl::Continue { redraw: true }
            }
            None => LoopControl::Continue {
                redraw: result.redraw,
            },
        }
    }

    fn handle_status_line(&mut self, revision: u64, text: String) -> LoopControl {
        if revision != self.state.transcript.revision() {
            trace!(target: "runtime", revision, "status_line_stale");
            return LoopControl::Continue { redraw: false };
        }
        self.state.status_line = text;
        LoopControl::Continue { redraw: true }
    }

    fn spawn_shell(&self, command: String) {
        let (program, args) = self.config.shell_invocation();
        let cwd = self.state.paths.project_dir.clone();
        let tx = self.tx.clone();
        info!(target: "exec", program = %program, "shell_spawn");
        tokio::spawn(async move {
            let output = exec::run_shell(&program, &args, &command, &cwd).await;
            if tx
                .send(Event::ShellFinished { command, output })
                .await
                .is_err()
            {
                debug!(target: "exec", "shell_result_receiver_closed");
            }
        });
    }

    /// Hand the buffer to the external editor. Input is stopped and the
    /// terminal restored for the duration; the buffer is replaced only when
    /// the editor exits successfully.
    async fn open_editor(&mut self) {
        self.stop_input().await;
        let path = self.state.paths.scratch_path();
        let editor = self.config.editor_command();
        info!(target: "exec", editor = %editor, "editor_open");

        let outcome = match write_scratch(&path, &self.state.buffer.value()) {
            Ok(()) => {
                if let Err(e) = self.terminal_guard.backend().leave() {
                    warn!(target: "terminal", error = %e, "leave_failed");
                }
                let run = exec::run_editor(&editor, &path).await;
                if let Err(e) = self.terminal_guard.backend().enter() {
                    error!(target: "terminal", error = %e, "reenter_failed");
                }
                run.and_then(|()| read_scratch(&path).map_err(anyhow::Error::from))
            }
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(text) => self.state.buffer.set_value(&text),
            Err(e) => {
                warn!(target: "exec", error = %e, "editor_failed");
                self.state.append_system(format!("Editor failed: {e}"));
            }
        }
        self.start_input();
    }

    async fn stop_input(&mut self) {
        if let Some(shutdown) = self.input_shutdown.take() {
            shutdown.signal();
        }
        if let Some(handle) = self.input_task.take()
            && let Err(err) = handle.await
            && !err.is_cancelled()
        {
            error!(target: "runtime", ?err, "input_task_join_failed");
        }
    }

    fn start_input(&mut self) {
        let (task, shutdown) = core_input::spawn_async_input(self.tx.clone());
        self.input_task = Some(task);
        self.input_shutdown = Some(shutdown);
    }

    fn finish_cycle(&mut self, redraw: bool) {
        let revision = self.state.transcript.revision();
        if self.seen_revision != Some(revision) {
            if self.seen_revision.is_some()
                && let Err(e) = self.state.save_transcript()
            {
                warn!(target: "io", error = %e, "transcript_save_failed");
            }
            self.status_line.schedule(&self.state, &self.tx);
            self.seen_revision = Some(revision);
        }
        if !redraw {
            return;
        }
        let suggestions = core_actions::suggestions(&self.state, &self.catalog);
        let mut out = stdout().lock();
        if let Err(e) = self
            .renderer
            .render(&self.state, &suggestions, terminal_size(), &mut out)
        {
            error!(target: "render.frame", error = %e, "render_failed");
        }
    }

    async fn finalize_shutdown(&mut self, reason: ShutdownReason) {
        log_shutdown_stage(reason, "begin");
        self.status_line.cancel();

        if let Some(shutdown) = self.input_shutdown.take() {
            trace!(
                target: "runtime.shutdown",
                reason = reason.as_str(),
                "input_task_shutdown_signal"
            );
            shutdown.signal();
        }

        if let Some(handle) = self.input_task.take() {
            match handle.await {
                Ok(_) => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_joined"
                ),
                Err(err) if err.is_cancelled() => trace!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    "input_task_cancelled"
                ),
                Err(err) => error!(
                    target: "runtime.shutdown",
                    reason = reason.as_str(),
                    ?err,
                    "input_task_join_failed"
                ),
            }
        }

        log_shutdown_stage(reason, "complete");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut startup = AppStartup::new();
    let context = startup.run(&args)?;
    let (tx, rx) = mpsc::channel::<Event>(EVENT_CHANNEL_CAP);
    let (input_task, input_shutdown) = core_input::spawn_async_input(tx.clone());

    let mut runtime = SessionRuntime::new(context, tx, rx, input_task, input_shutdown);
    runtime.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shutdown_reason_labels() {
        assert_eq!(ShutdownReason::Quit.as_str(), "quit");
        assert_eq!(ShutdownReason::ShutdownEvent.to_string(), "shutdown_event");
        assert_eq!(ShutdownReason::ChannelClosed.to_string(), "channel_closed");
    }

    #[test]
    fn args_accept_config_and_project_dir() {
        let args = Args::parse_from([
            "codeline",
            "--config",
            "custom.toml",
            "--project-dir",
            "/tmp/project",
        ]);
        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(args.project_dir, Some(PathBuf::from("/tmp/project")));
    }

    #[test]
    fn session_uses_configured_models_and_history_path() {
        let dir = tempfile::tempdir().unwrap();
        let history_file = dir.path().join("hist");
        std::fs::write(&history_file, "one\ntwo\n").unwrap();
        let config = core_config::Config {
            raw: None,
            file: core_config::ConfigFile {
                history: core_config::HistoryConfig {
                    file: Some(history_file),
                },
                models: vec![core_config::ModelConfig {
                    id: "m-1".into(),
                    display_name: "One".into(),
                }],
                ..Default::default()
            },
            source: None,
        };
        let state = AppStartup::load_session(
            &config,
            dir.path().to_path_buf(),
            dir.path().join(DATA_DIR_NAME),
        );
        assert_eq!(state.history.len(), 2);
        assert_eq!(state.active_model().id, "m-1");
        assert_eq!(state.version, env!("CARGO_PKG_VERSION"));
        assert!(state.paths.config_path.is_none());
    }
}
