//! Debounced status-line command.
//!
//! After each transcript change the runtime schedules a run. A newer schedule
//! aborts the pending one, so only the last change within the debounce window
//! reaches the command. The command receives a JSON snapshot on stdin and its
//! first stdout line is posted back as `Event::StatusLine`.

use core_config::StatusLineConfig;
use core_events::Event;
use core_state::SessionState;
use serde::Serialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

#[derive(Debug, Serialize)]
pub struct StatusPayload {
    pub hook_event_name: &'static str,
    pub session_id: String,
    pub transcript_path: String,
    pub cwd: String,
    pub model: ModelPayload,
    pub workspace: WorkspacePayload,
    pub version: String,
    pub output_style: OutputStylePayload,
    pub cost: CostPayload,
}

#[derive(Debug, Serialize)]
pub struct ModelPayload {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct WorkspacePayload {
    pub current_dir: String,
    pub project_dir: String,
}

#[derive(Debug, Serialize)]
pub struct OutputStylePayload {
    pub name: &'static str,
}

/// No model backend is connected; every counter stays zero.
#[derive(Debug, Default, Serialize)]
pub struct CostPayload {
    pub total_cost_usd: f64,
    pub total_duration_ms: u64,
    pub total_api_duration_ms: u64,
    pub total_lines_added: u64,
    pub total_lines_removed: u64,
}

impl StatusPayload {
    pub fn from_state(state: &SessionState) -> Self {
        let project_dir = display(&state.paths.project_dir);
        let model = state.active_model();
        Self {
            hook_event_name: "Status",
            session_id: state.session_id.to_string(),
            transcript_path: display(&state.paths.transcript_path()),
            cwd: project_dir.clone(),
            model: ModelPayload {
                id: model.id.clone(),
                display_name: model.display_name.clone(),
            },
            workspace: WorkspacePayload {
                current_dir: project_dir.clone(),
                project_dir,
            },
            version: state.version.clone(),
            output_style: OutputStylePayload { name: "default" },
            cost: CostPayload {
                total_duration_ms: duration_ms(state.started_at.elapsed()),
                ..CostPayload::default()
            },
        }
    }
}

/// Whole milliseconds, saturating at `u64::MAX`.
fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// First line of `stdout`, left-padded by `padding` spaces. Empty output stays empty.
pub fn header_line(stdout: &str, padding: usize) -> String {
    let first = stdout.lines().next().unwrap_or("").trim_end();
    if first.is_empty() {
        return String::new();
    }
    format!("{}{first}", " ".repeat(padding))
}

pub struct StatusLineScheduler {
    command: Option<String>,
    padding: usize,
    debounce: Duration,
    shell: (String, Vec<String>),
    pending: Option<JoinHandle<()>>,
}

impl StatusLineScheduler {
    pub fn new(config: &StatusLineConfig, shell: (String, Vec<String>)) -> Self {
        Self {
            command: config.command().map(str::to_string),
            padding: config.padding,
            debounce: config.debounce(),
            shell,
            pending: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.command.is_some()
    }

    /// Replace any pending run with a new one for the current transcript revision.
    pub fn schedule(&mut self, state: &SessionState, tx: &mpsc::Sender<Event>) {
        let Some(command) = self.command.clone() else {
            return;
        };
        self.cancel();
        let revision = state.transcript.revision();
        let payload = match serde_json::to_string(&StatusPayload::from_state(state)) {
            Ok(json) => json,
            Err(e) => {
                warn!(target: "exec", error = %e, "status_payload_encode_failed");
                return;
            }
        };
        let (program, args) = self.shell.clone();
        let cwd = state.paths.project_dir.clone();
        let padding = self.padding;
        let debounce = self.debounce;
        let tx = tx.clone();
        trace!(target: "exec", revision, "status_line_scheduled");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let Some(stdout) = run_with_stdin(&program, &args, &command, &cwd, &payload).await
            else {
                return;
            };
            let text = header_line(&stdout, padding);
            if tx.send(Event::StatusLine { revision, text }).await.is_err() {
                debug!(target: "exec", "status_line_receiver_closed");
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for StatusLineScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_with_stdin(
    program: &str,
    args: &[String],
    command: &str,
    cwd: &Path,
    input: &str,
) -> Option<String> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    if !cwd.as_os_str().is_empty() {
        cmd.current_dir(cwd);
    }
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(target: "exec", program, error = %e, "status_line_spawn_failed");
            return None;
        }
    };
    if let Some(mut stdin) = child.stdin.take() {
        // A command that ignores stdin may close it early.
        let _ = stdin.write_all(input.as_bytes()).await;
    }
    match child.wait_with_output().await {
        Ok(output) => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
        Err(e) => {
            warn!(target: "exec", error = %e, "status_line_wait_failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::SessionPaths;
    use std::path::PathBuf;

    #[test]
    fn payload_shape() {
        let mut state = SessionState::ephemeral();
        state.paths = SessionPaths {
            project_dir: PathBuf::from("/work/demo"),
            data_dir: PathBuf::from("/work/demo/.codeline"),
            config_path: None,
        };
        state.version = "1.2.3".into();
        let json = serde_json::to_value(StatusPayload::from_state(&state)).unwrap();
        assert_eq!(json["hook_event_name"], "Status");
        assert_eq!(json["session_id"], state.session_id.to_string());
        assert_eq!(json["cwd"], "/work/demo");
        assert_eq!(json["workspace"]["project_dir"], "/work/demo");
        assert_eq!(json["model"]["id"], "model-large");
        assert_eq!(json["model"]["display_name"], "Large");
        assert_eq!(json["version"], "1.2.3");
        assert_eq!(json["output_style"]["name"], "default");
        assert_eq!(json["cost"]["total_cost_usd"], 0.0);
        assert_eq!(json["cost"]["total_lines_added"], 0);
    }

    #[test]
    fn duration_saturates_instead_of_wrapping() {
        assert_eq!(duration_ms(Duration::from_millis(1500)), 1500);
        assert_eq!(duration_ms(Duration::MAX), u64::MAX);
    }

    #[test]
    fn header_takes_first_line_with_padding() {
        assert_eq!(header_line("main ✓\nsecond\n", 2), "  main ✓");
        assert_eq!(header_line("", 4), "");
        assert_eq!(header_line("x", 0), "x");
    }

    #[test]
    fn disabled_without_command() {
        let sched = StatusLineScheduler::new(
            &StatusLineConfig::default(),
            ("sh".into(), vec!["-c".into()]),
        );
        assert!(!sched.is_enabled());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn newer_schedule_replaces_pending_run() {
        let config = StatusLineConfig {
            command: Some("head -c 20; echo".into()),
            padding: 0,
            debounce_ms: 20,
        };
        let mut sched = StatusLineScheduler::new(&config, ("sh".into(), vec!["-c".into()]));
        let (tx, mut rx) = mpsc::channel(4);
        let mut state = SessionState::ephemeral();
        sched.schedule(&state, &tx);
        state.append_system("changed");
        sched.schedule(&state, &tx);
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .unwrap()
            .unwrap();
        match event {
            Event::StatusLine { revision, text } => {
                assert_eq!(revision, state.transcript.revision());
                assert!(text.starts_with("{\"hook_event_name\""), "{text:?}");
            }
            other => panic!("unexpected event {other:?}"),
        }
        drop(sched);
        drop(tx);
        assert!(rx.recv().await.is_none());
    }
}
