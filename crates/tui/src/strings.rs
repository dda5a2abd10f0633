// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const INPUT_HINT: &str = "Enter text to generate roasts...";
pub const RESPONSE_EMPTY: &str = "Submit something to see the raw JSON response here.";
pub const SAVED_EMPTY: &str = "Nothing saved yet. Ctrl+S keeps the current result.";
pub const NOTHING_TO_SAVE: &str = "Nothing to save yet.";
pub const SAVE_FAILED: &str = "Could not write saved roasts.";
pub const REQUEST_CANCELED: &str = "Request canceled.";

// UI block titles (keep surrounding spaces for visual padding)
pub const TITLE_APP: &str = " Roast API ";
pub const TITLE_INPUT: &str = " Content to Roast ";
pub const TITLE_RESPONSE: &str = " Response ";
pub const TITLE_SAVED: &str = " Saved Roasts ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";
pub const TITLE_DOCS: &str = " API Reference ";

/// Local wall-clock time for a Unix-millisecond timestamp.
pub fn format_timestamp(ms: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(ms) {
        Some(t) => t
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "-".to_string(),
    }
}

pub fn title_saved_view(when: &str) -> String {
    format!(" Saved {} (Esc to close) ", when)
}

// Build the status line with width-aware compaction.
// - state: controller state label, e.g. "Generating..."
// - focus: "Input" or "Saved"
// - saved: (count, capacity)
// - notice: text of the active notice, shown right after the state
// - pending: a request is in flight; Enter restarts it
pub fn build_status_line(
    state: &str,
    focus: &str,
    saved: (usize, usize),
    notice: Option<&str>,
    pending: bool,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[{}]", state));
    if let Some(n) = notice {
        segments.push(n.to_string());
    }
    if pending {
        segments.push("Enter: restart request; Ctrl+C: cancel".to_string());
    }
    segments.push(format!("[{}] Saved:{}/{}", focus, saved.0, saved.1));
    // Hints ordered by importance; appended while space allows.
    let hints: [&str; 5] = [
        "Enter: generate; Shift+Enter: newline",
        "Ctrl+S: save",
        "Tab: saved list",
        "F3: API docs",
        "F1: help",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Basic",
        "  Enter: Generate roasts    Shift+Enter: Newline    Esc: Close / Quit",
        "  Ctrl+C: Cancel request (quit when idle)    Enter while generating: replace request",
        "Input Editing",
        "  Left/Right: Cursor move    Backspace/Delete: Delete prev/next char",
        "  Home/End or Ctrl+A/E: Line start/end",
        "  Ctrl+Left/Right: Word move    Ctrl+W: Delete prev word",
        "Response",
        "  PgUp/PgDn: Scroll    Mouse wheel: Scroll",
        "Saved Roasts (last 5)",
        "  Ctrl+S: Save current result    Tab: Focus saved list",
        "  Up/Down: Select    Enter: View    D/Delete: Remove",
        "Other",
        "  F2: Dark/light theme    F3: API reference & code samples",
        "  F1 or ?: Open/close this panel",
    ]
}
