//! Chrome around the input: header, separators, mode line, welcome banner,
//! transcript and tasks panel lines.

use crate::ansi::tint;
use core_state::{Message, PermissionMode, TaskItem};
use core_text::display_width;

/// Magenta, used for the mode indicator.
const MODE_COLOR: &str = "35";
const SEPARATOR: char = '─';
/// Below this width the banner collapses to two plain lines.
pub const BANNER_MIN_WIDTH: usize = 50;
const TASKS_SHOWN: usize = 10;

/// `accept edits off` / `plan mode` / `accept edits on`, tinted when `color`.
pub fn mode_line(mode: PermissionMode, color: bool) -> String {
    let label = mode.indicator();
    let label = if color {
        tint(label, MODE_COLOR)
    } else {
        label.to_string()
    };
    format!("{label} (shift+tab to cycle)")
}

pub fn separator(columns: usize) -> String {
    std::iter::repeat_n(SEPARATOR, columns).collect()
}

/// Header text (status-line command output); `None` when blank.
pub fn header_line(status_line: &str) -> Option<&str> {
    let trimmed = status_line.trim_end();
    (!trimmed.trim_start().is_empty()).then_some(trimmed)
}

/// Render transcript messages: role prefix on the first line, continuation
/// lines indented by the prefix width.
pub fn transcript_lines(messages: &[Message]) -> Vec<String> {
    let mut out = Vec::new();
    for msg in messages {
        let prefix = msg.role.prefix();
        let indent = " ".repeat(display_width(prefix));
        let mut parts = msg.content.split('\n');
        let first = parts.next().unwrap_or_default();
        out.push(format!("{prefix}{first}"));
        out.extend(parts.map(|p| format!("{indent}{p}")));
    }
    out
}

pub fn tasks_lines(tasks: &[TaskItem]) -> Vec<String> {
    let mut out = vec!["Tasks:".to_string()];
    if tasks.is_empty() {
        out.push("  (none)".to_string());
    } else {
        out.extend(
            tasks
                .iter()
                .take(TASKS_SHOWN)
                .map(|t| format!("  [{}] {} {}", t.status.as_str(), t.id, t.title)),
        );
    }
    out
}

/// Values shown inside the welcome banner.
pub struct BannerInfo<'a> {
    pub version: &'a str,
    pub project: &'a str,
    pub model: &'a str,
}

const LOGO: [&str; 5] = [
    "           _ _          ",
    "  ___ ___ | (_)_ __   ___ ",
    " / __/ _ \\| | | '_ \\ / _ \\",
    "| (_| (_) | | | | | |  __/",
    " \\___\\___/|_|_|_| |_|\\___|",
];

pub fn banner_lines(width: usize, info: &BannerInfo<'_>) -> Vec<String> {
    if width < BANNER_MIN_WIDTH {
        return vec![
            format!("codeline v{}", info.version),
            "Welcome back!".to_string(),
        ];
    }
    let inner = width - 2;
    let title = clip(&format!(" codeline v{} ", info.version), inner);
    let title_w = display_width(&title);
    let top = format!("┌{}{}┐", title, separator(inner - title_w));
    let bottom = format!("└{}┘", separator(inner));

    let left_w = ((inner - 1) * 45 / 100).max(10);
    let right_w = inner - 1 - left_w;

    let mut left: Vec<String> = vec!["Welcome back!".into(), String::new()];
    left.extend(LOGO.iter().map(|l| l.to_string()));
    left.push(String::new());
    left.push(format!("Project: {}", info.project));
    left.push(format!("Model: {}", info.model));
    let right = [
        "Tips for getting started",
        "Run /help to list commands",
        "",
        "Recent activity",
        "No recent activity",
    ];

    let rows = left.len().max(right.len());
    let mut out = Vec::with_capacity(rows + 2);
    out.push(top);
    for i in 0..rows {
        let l = fit(left.get(i).map(String::as_str).unwrap_or(""), left_w);
        let r = fit(right.get(i).copied().unwrap_or(""), right_w);
        out.push(format!("│{l}│{r}│"));
    }
    out.push(bottom);
    out
}

/// Longest prefix of `text` fitting in `width` columns.
fn clip(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = core_text::width::char_width(c);
        if used + w > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out
}

/// Truncate or right-pad `text` to exactly `width` columns.
fn fit(text: &str, width: usize) -> String {
    let mut out = clip(text, width);
    let used = display_width(&out);
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::{Role, TaskStatus};

    #[test]
    fn mode_line_labels() {
        assert_eq!(
            mode_line(PermissionMode::Normal, false),
            "accept edits off (shift+tab to cycle)"
        );
        assert_eq!(
            mode_line(PermissionMode::Plan, true),
            "\x1b[35mplan mode\x1b[0m (shift+tab to cycle)"
        );
        assert!(mode_line(PermissionMode::Auto, false).starts_with("accept edits on"));
    }

    #[test]
    fn separator_spans_width() {
        assert_eq!(separator(3), "───");
        assert_eq!(separator(0), "");
    }

    #[test]
    fn header_blank_is_none() {
        assert_eq!(header_line("   "), None);
        assert_eq!(header_line("  ok \n"), Some("  ok"));
    }

    #[test]
    fn transcript_indents_continuations() {
        let msgs = vec![
            Message::new(Role::User, "hi"),
            Message::new(Role::Tool, "a\nb"),
        ];
        assert_eq!(
            transcript_lines(&msgs),
            vec!["You: hi", "Tool: a", "      b"]
        );
    }

    #[test]
    fn tasks_panel_placeholder_and_items() {
        assert_eq!(tasks_lines(&[]), vec!["Tasks:", "  (none)"]);
        let t = TaskItem {
            id: "1".into(),
            status: TaskStatus::InProgress,
            title: "build".into(),
        };
        assert_eq!(tasks_lines(&[t])[1], "  [in_progress] 1 build");
    }

    #[test]
    fn narrow_banner_is_two_lines() {
        let info = BannerInfo {
            version: "1.2.3",
            project: "demo",
            model: "Large",
        };
        assert_eq!(
            banner_lines(40, &info),
            vec!["codeline v1.2.3", "Welcome back!"]
        );
    }

    #[test]
    fn wide_banner_rows_have_full_width() {
        let info = BannerInfo {
            version: "1.2.3",
            project: "demo",
            model: "Large",
        };
        let lines = banner_lines(80, &info);
        assert!(lines[0].starts_with("┌ codeline v1.2.3 ─"));
        for l in &lines {
            assert_eq!(display_width(l), 80, "row {l:?}");
        }
        assert!(lines.iter().any(|l| l.contains("Project: demo")));
    }
}
