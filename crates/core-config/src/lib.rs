//! Configuration loading and parsing.
//!
//! Parses `codeline.toml` (or an override path provided by the binary). Every
//! section is optional and every field has a default, so a missing file, an
//! unreadable file or a malformed file all yield `Config::default()`; the
//! latter is logged under the `config` target. Unknown fields are ignored.
//!
//! ```toml
//! [status_line]
//! command = "~/.config/codeline/status.sh"
//! padding = 1
//! debounce_ms = 300
//!
//! [editor]
//! command = "nvim"
//!
//! [shell]
//! program = "bash"
//! args = ["-lc"]
//!
//! [history]
//! file = "/tmp/codeline-history"
//!
//! [[models]]
//! id = "model-large"
//! display_name = "Large"
//! ```

use anyhow::Result;
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "codeline.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct StatusLineConfig {
    /// Shell command whose first stdout line becomes the header.
    #[serde(default)]
    pub command: Option<String>,
    /// Spaces prepended to the header text.
    #[serde(default)]
    pub padding: usize,
    #[serde(default = "StatusLineConfig::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for StatusLineConfig {
    fn default() -> Self {
        Self {
            command: None,
            padding: 0,
            debounce_ms: Self::default_debounce_ms(),
        }
    }
}

impl StatusLineConfig {
    const fn default_debounce_ms() -> u64 {
        300
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Configured command, ignoring blank values.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EditorConfig {
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ShellConfig {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct HistoryConfig {
    /// Override for the history file (defaults to `<data dir>/history`).
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub status_line: StatusLineConfig,
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub shell: ShellConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    /// Path the configuration was read from, when a file was found and parsed.
    pub source: Option<PathBuf>,
}

/// Best-effort config path: `./codeline.toml`, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("codeline").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_absent_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), models = file.models.len(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                source: Some(path),
            })
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Editor command: config, then `$EDITOR`, then `$VISUAL`, then a platform default.
    pub fn editor_command(&self) -> String {
        self.editor_command_with(|k| std::env::var(k).ok())
    }

    pub fn editor_command_with<F>(&self, env: F) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        self.file
            .editor
            .command
            .clone()
            .filter(|c| !c.trim().is_empty())
            .or_else(|| env("EDITOR").filter(|c| !c.trim().is_empty()))
            .or_else(|| env("VISUAL").filter(|c| !c.trim().is_empty()))
            .unwrap_or_else(|| default_editor().to_string())
    }

    /// Program and leading arguments used to run a `!` shell command.
    pub fn shell_invocation(&self) -> (String, Vec<String>) {
        let (default_program, default_args) = default_shell();
        let program = self
            .file
            .shell
            .program
            .clone()
            .unwrap_or_else(|| default_program.to_string());
        let args = self
            .file
            .shell
            .args
            .clone()
            .unwrap_or_else(|| default_args.iter().map(|a| a.to_string()).collect());
        (program, args)
    }
}

#[cfg(windows)]
fn default_shell() -> (&'static str, &'static [&'static str]) {
    ("cmd", &["/C"])
}

#[cfg(not(windows))]
fn default_shell() -> (&'static str, &'static [&'static str]) {
    ("sh", &["-c"])
}

#[cfg(windows)]
fn default_editor() -> &'static str {
    "notepad"
}

#[cfg(not(windows))]
fn default_editor() -> &'static str {
    "vi"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl Write for LockedWriter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn write_config(body: &str) -> tempfile::NamedTempFile {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), body).unwrap();
        tmp
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.source.is_none());
        assert_eq!(cfg.file.status_line.debounce_ms, 300);
        assert!(cfg.file.status_line.command().is_none());
        assert!(cfg.file.models.is_empty());
    }

    #[test]
    fn parses_all_sections() {
        let tmp = write_config(
            r#"
[status_line]
command = "echo hi"
padding = 2
debounce_ms = 50

[editor]
command = "nano"

[shell]
program = "bash"
args = ["-lc"]

[history]
file = "/tmp/h"

[[models]]
id = "a"
display_name = "Alpha"

[[models]]
id = "b"
display_name = "Beta"
"#,
        );
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
        assert_eq!(cfg.file.status_line.command(), Some("echo hi"));
        assert_eq!(cfg.file.status_line.padding, 2);
        assert_eq!(cfg.file.status_line.debounce(), Duration::from_millis(50));
        assert_eq!(cfg.file.history.file, Some(PathBuf::from("/tmp/h")));
        assert_eq!(cfg.file.models.len(), 2);
        assert_eq!(cfg.file.models[1].display_name, "Beta");
        assert_eq!(
            cfg.shell_invocation(),
            ("bash".to_string(), vec!["-lc".to_string()])
        );
        assert_eq!(cfg.editor_command_with(|_| None), "nano");
    }

    #[test]
    fn blank_status_command_is_none() {
        let tmp = write_config("[status_line]\ncommand = \"   \"\n");
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.file.status_line.command().is_none());
    }

    #[test]
    fn editor_falls_back_through_environment() {
        let cfg = Config::default();
        let env = |k: &str| match k {
            "EDITOR" => Some(String::new()),
            "VISUAL" => Some("emacs".to_string()),
            _ => None,
        };
        assert_eq!(cfg.editor_command_with(env), "emacs");
        assert_eq!(cfg.editor_command_with(|_| None), default_editor());
    }

    #[test]
    fn default_shell_used_without_config() {
        let (program, args) = Config::default().shell_invocation();
        let (p, a) = default_shell();
        assert_eq!(program, p);
        assert_eq!(args, a);
    }

    #[test]
    fn malformed_file_falls_back_and_logs() {
        let tmp = write_config("[status_line\ncommand = 3");
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        let cfg = with_default(subscriber, || {
            load_from(Some(tmp.path().to_path_buf())).unwrap()
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("WARN config:"), "{log_output}");
        assert!(log_output.contains("config_parse_failed"));
        assert!(cfg.source.is_none());
        assert_eq!(cfg.file.status_line.debounce_ms, 300);
    }
}
