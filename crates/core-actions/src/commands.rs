//! Slash-command catalog, parsing and suggestion lines.
//!
//! The catalog is ordered; suggestions preserve that order. Commands flagged
//! unimplemented are listed with a ` (stub)` suffix and answer with a notice
//! when executed.

/// Suggestion entries shown before collapsing into `... N more`.
pub const MAX_SUGGESTIONS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub implemented: bool,
}

const fn cmd(name: &'static str, description: &'static str) -> CommandSpec {
    CommandSpec {
        name,
        description,
        implemented: true,
    }
}

const fn stub(name: &'static str, description: &'static str) -> CommandSpec {
    CommandSpec {
        name,
        description,
        implemented: false,
    }
}

const BUILTIN: &[CommandSpec] = &[
    cmd("help", "Show help"),
    cmd("clear", "Clear conversation + history"),
    cmd("config", "Show config path"),
    cmd("permissions", "Show or change permission mode"),
    cmd("plan", "Switch to plan mode"),
    cmd("model", "Switch model"),
    cmd("status", "Show session info"),
    cmd("statusline", "Show status line help"),
    cmd("rewind", "Rewind to previous user input"),
    cmd("tasks", "Toggle task list"),
    cmd("todos", "Manage the task list"),
    stub("compact", "Compact context"),
    stub("context", "Show context"),
    stub("cost", "Show cost summary"),
    stub("doctor", "Diagnostics"),
    stub("export", "Export conversation"),
    stub("init", "Initialize project settings"),
    stub("mcp", "MCP configuration"),
    stub("memory", "Manage memory"),
    stub("rename", "Rename session"),
    stub("resume", "Resume session"),
    stub("stats", "Show stats"),
    stub("teleport", "Teleport between sessions"),
    stub("theme", "Change theme"),
    stub("usage", "Show usage"),
    stub("vim", "Toggle vim mode"),
    stub("terminal-setup", "Configure terminal input"),
];

/// `exit` is handled but deliberately absent from suggestions.
const HIDDEN: &[&str] = &["exit"];

const SHORTCUTS_HELP: &str = "\
Shortcuts:
Ctrl+C cancel, Ctrl+D exit, Ctrl+L redraw, Ctrl+G open editor, Ctrl+R reverse search
Ctrl+K delete to end, Ctrl+U delete line, Ctrl+Y paste, Alt+Y cycle paste
Alt+B/Alt+F word move, Shift+Tab/Alt+M mode toggle, Alt+P model, Alt+T thinking
Use ! for shell mode, / for commands, \\ + Enter or Ctrl+J for multiline";

const STATUSLINE_HELP: &str = "\
Status line is configured in codeline.toml:
[status_line]
command = \"path-to-your-script\"
padding = 0
The command receives a JSON session snapshot on stdin; its first output line is shown.";

/// A submitted `/name arg...` line split on whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub name: String,
    pub args: Vec<String>,
}

impl ParsedCommand {
    pub fn parse(input: &str) -> Self {
        let body = input.trim();
        let body = body.strip_prefix('/').unwrap_or(body);
        let mut parts = body.split_whitespace().map(str::to_string);
        let name = parts.next().unwrap_or_default();
        Self {
            name,
            args: parts.collect(),
        }
    }

    pub fn arg(&self, idx: usize) -> Option<&str> {
        self.args.get(idx).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct CommandCatalog {
    commands: Vec<CommandSpec>,
}

impl Default for CommandCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CommandCatalog {
    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    pub fn new(commands: Vec<CommandSpec>) -> Self {
        Self { commands }
    }

    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn get(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Commands whose name starts with `prefix`, in catalog order.
    pub fn matching(&self, prefix: &str) -> Vec<&CommandSpec> {
        self.commands
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .collect()
    }

    /// Suggestion lines for a first input line starting with `/`. The token is
    /// everything after the slash up to the first whitespace.
    pub fn suggestions(&self, first_line: &str) -> Vec<String> {
        let Some(rest) = first_line.strip_prefix('/') else {
            return Vec::new();
        };
        let token = rest.split(char::is_whitespace).next().unwrap_or("");
        let matches = self.matching(token);
        if matches.is_empty() {
            return Vec::new();
        }
        let mut lines = Vec::with_capacity(matches.len().min(MAX_SUGGESTIONS) + 2);
        lines.push("Commands:".to_string());
        for spec in matches.iter().take(MAX_SUGGESTIONS) {
            let suffix = if spec.implemented { "" } else { " (stub)" };
            lines.push(format!("/{} - {}{}", spec.name, spec.description, suffix));
        }
        if matches.len() > MAX_SUGGESTIONS {
            lines.push(format!("... {} more", matches.len() - MAX_SUGGESTIONS));
        }
        lines
    }

    /// `/help` text: every command name (sorted) plus the shortcut summary.
    pub fn help_text(&self) -> String {
        let mut names: Vec<&str> = self
            .commands
            .iter()
            .map(|c| c.name)
            .chain(HIDDEN.iter().copied())
            .collect();
        names.sort_unstable();
        let mut out = vec!["Built-in commands:".to_string()];
        for chunk in names.chunks(12) {
            let line: Vec<String> = chunk.iter().map(|n| format!("/{n}")).collect();
            out.push(line.join(" "));
        }
        out.push(String::new());
        out.push("Shortcuts:".to_string());
        out.push("Ctrl+C Ctrl+D Ctrl+L Ctrl+O Ctrl+R Ctrl+G Ctrl+K Ctrl+U Ctrl+Y".to_string());
        out.push("Alt+B Alt+F Alt+M Alt+P Alt+T Shift+Tab".to_string());
        out.push("Use ! for shell mode. Use \\ + Enter for multiline.".to_string());
        out.join("\n")
    }
}

pub fn shortcuts_help() -> &'static str {
    SHORTCUTS_HELP
}

pub fn statusline_help() -> &'static str {
    STATUSLINE_HELP
}
