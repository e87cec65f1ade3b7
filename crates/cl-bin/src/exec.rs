//! External process collaborators: `!` shell commands and the editor.
//!
//! Shell commands run as tokio child processes with stdout and stderr merged in
//! arrival order. Failures never propagate; they become text for the
//! transcript.

use anyhow::{Result, anyhow};
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, warn};

const READ_CHUNK: usize = 4096;

/// Run `command` through `program args...` in `cwd` and return the merged
/// output. A non-zero exit appends `(exit code: N)`.
pub async fn run_shell(program: &str, args: &[String], command: &str, cwd: &Path) -> String {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .arg(command)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if !cwd.as_os_str().is_empty() {
        cmd.current_dir(cwd);
    }
    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(target: "exec", program, error = %e, "shell_spawn_failed");
            return format!("Failed to start {program}: {e}");
        }
    };

    let mut merged = Vec::new();
    if let (Some(mut stdout), Some(mut stderr)) = (child.stdout.take(), child.stderr.take()) {
        let mut out_buf = [0u8; READ_CHUNK];
        let mut err_buf = [0u8; READ_CHUNK];
        let (mut out_done, mut err_done) = (false, false);
        while !(out_done && err_done) {
            tokio::select! {
                r = stdout.read(&mut out_buf), if !out_done => match r {
                    Ok(0) | Err(_) => out_done = true,
                    Ok(n) => merged.extend_from_slice(&out_buf[..n]),
                },
                r = stderr.read(&mut err_buf), if !err_done => match r {
                    Ok(0) | Err(_) => err_done = true,
                    Ok(n) => merged.extend_from_slice(&err_buf[..n]),
                },
            }
        }
    }

    let mut text = String::from_utf8_lossy(&merged).into_owned();
    match child.wait().await {
        Ok(status) if status.success() => {}
        Ok(status) => {
            let code = status
                .code()
                .map_or_else(|| "signal".to_string(), |c| c.to_string());
            text.push_str(&format!("\n(exit code: {code})"));
        }
        Err(e) => text.push_str(&format!("\n(wait failed: {e})")),
    }
    debug!(target: "exec", bytes = text.len(), "shell_finished");
    text
}

/// Run the editor on `path` with the terminal inherited. The command may carry
/// arguments (`code --wait`); the path is appended last.
pub async fn run_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| anyhow!("no editor configured"))?;
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .await
        .map_err(|e| anyhow!("failed to start {program}: {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!("{program} exited with {status}"))
    }
}
