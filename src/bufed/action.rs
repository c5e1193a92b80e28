//! Named actions the buffer list registers with the command layer

use std::collections::HashMap;

use super::sort::{SortDirection, SortKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufedAction {
    /// Switch the origin window to the row's buffer and close the list
    Select,
    /// Restore the origin window's buffers and close the list
    Abort,
    ClearModified,
    ToggleReadOnly,
    /// Flip the show-system-buffers filter and rebuild
    ToggleAllVisible,
    Refresh,
    /// Kill the marked buffers, or the current row's buffer
    KillBuffer,
    Sort(SortKey, Option<SortDirection>),
    ToggleMark,
    UnmarkAll,
    NextLine,
    PreviousLine,
    PageDown,
    PageUp,
    FirstLine,
    LastLine,
    /// Show or hide the key binding listing
    Help,
}

impl BufedAction {
    /// Every action, in help order
    pub const ALL: [BufedAction; 22] = [
        BufedAction::Select,
        BufedAction::Abort,
        BufedAction::ClearModified,
        BufedAction::ToggleReadOnly,
        BufedAction::ToggleAllVisible,
        BufedAction::Refresh,
        BufedAction::KillBuffer,
        BufedAction::Sort(SortKey::Unsorted, None),
        BufedAction::Sort(SortKey::Name, None),
        BufedAction::Sort(SortKey::Filename, None),
        BufedAction::Sort(SortKey::Size, None),
        BufedAction::Sort(SortKey::Time, None),
        BufedAction::Sort(SortKey::Modified, None),
        BufedAction::ToggleMark,
        BufedAction::UnmarkAll,
        BufedAction::NextLine,
        BufedAction::PreviousLine,
        BufedAction::PageDown,
        BufedAction::PageUp,
        BufedAction::FirstLine,
        BufedAction::LastLine,
        BufedAction::Help,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BufedAction::Select => "bufed-select",
            BufedAction::Abort => "bufed-abort",
            BufedAction::ClearModified => "bufed-clear-modified",
            BufedAction::ToggleReadOnly => "bufed-toggle-read-only",
            BufedAction::ToggleAllVisible => "bufed-toggle-all-visible",
            BufedAction::Refresh => "bufed-refresh",
            BufedAction::KillBuffer => "bufed-kill-buffer",
            BufedAction::Sort(SortKey::Unsorted, _) => "bufed-unsorted",
            BufedAction::Sort(SortKey::Name, _) => "bufed-sort-name",
            BufedAction::Sort(SortKey::Filename, _) => "bufed-sort-filename",
            BufedAction::Sort(SortKey::Size, _) => "bufed-sort-size",
            BufedAction::Sort(SortKey::Time, _) => "bufed-sort-time",
            BufedAction::Sort(SortKey::Modified, _) => "bufed-sort-modified",
            BufedAction::ToggleMark => "bufed-toggle-mark",
            BufedAction::UnmarkAll => "bufed-unmark-all",
            BufedAction::NextLine => "next-line",
            BufedAction::PreviousLine => "previous-line",
            BufedAction::PageDown => "scroll-up",
            BufedAction::PageUp => "scroll-down",
            BufedAction::FirstLine => "beginning-of-buffer",
            BufedAction::LastLine => "end-of-buffer",
            BufedAction::Help => "bufed-help",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BufedAction::Select => "Select buffer from current line and close the buffer list",
            BufedAction::Abort => "Abort and close the buffer list",
            BufedAction::ClearModified => "Clear buffer modified indicator",
            BufedAction::ToggleReadOnly => "Toggle buffer read-only flag",
            BufedAction::ToggleAllVisible => "Show all buffers including system buffers",
            BufedAction::Refresh => "Refresh buffer list",
            BufedAction::KillBuffer => "Kill buffer at current line",
            BufedAction::Sort(SortKey::Unsorted, _) => "Sort the buffer list by creation time",
            BufedAction::Sort(SortKey::Name, _) => "Sort the buffer list by buffer name",
            BufedAction::Sort(SortKey::Filename, _) => "Sort the buffer list by buffer file name",
            BufedAction::Sort(SortKey::Size, _) => "Sort the buffer list by buffer size",
            BufedAction::Sort(SortKey::Time, _) => {
                "Sort the buffer list by buffer modification time"
            }
            BufedAction::Sort(SortKey::Modified, _) => {
                "Sort the buffer list with modified buffers first"
            }
            BufedAction::ToggleMark => "Mark or unmark the current line",
            BufedAction::UnmarkAll => "Remove all marks",
            BufedAction::NextLine => "Move to the next line",
            BufedAction::PreviousLine => "Move to the previous line",
            BufedAction::PageDown => "Scroll down one page",
            BufedAction::PageUp => "Scroll up one page",
            BufedAction::FirstLine => "Move to the first line",
            BufedAction::LastLine => "Move to the last line",
            BufedAction::Help => "Show the buffer list key bindings",
        }
    }

    /// Parse an action name with optional arguments
    ///
    /// Sort actions accept `{"direction": "ascending" | "descending"}` to
    /// force a direction instead of toggling.
    pub fn from_name(name: &str, args: &HashMap<String, serde_json::Value>) -> Option<Self> {
        let direction = args
            .get("direction")
            .and_then(|v| serde_json::from_value::<SortDirection>(v.clone()).ok());

        let action = match name {
            "bufed-select" => BufedAction::Select,
            "bufed-abort" => BufedAction::Abort,
            "bufed-clear-modified" => BufedAction::ClearModified,
            "bufed-toggle-read-only" => BufedAction::ToggleReadOnly,
            "bufed-toggle-all-visible" => BufedAction::ToggleAllVisible,
            "bufed-refresh" => BufedAction::Refresh,
            "bufed-kill-buffer" => BufedAction::KillBuffer,
            "bufed-unsorted" => BufedAction::Sort(SortKey::Unsorted, None),
            "bufed-sort-name" => BufedAction::Sort(SortKey::Name, direction),
            "bufed-sort-filename" => BufedAction::Sort(SortKey::Filename, direction),
            "bufed-sort-size" => BufedAction::Sort(SortKey::Size, direction),
            "bufed-sort-time" => BufedAction::Sort(SortKey::Time, direction),
            "bufed-sort-modified" => BufedAction::Sort(SortKey::Modified, direction),
            "bufed-toggle-mark" => BufedAction::ToggleMark,
            "bufed-unmark-all" => BufedAction::UnmarkAll,
            "next-line" => BufedAction::NextLine,
            "previous-line" => BufedAction::PreviousLine,
            "scroll-up" => BufedAction::PageDown,
            "scroll-down" => BufedAction::PageUp,
            "beginning-of-buffer" => BufedAction::FirstLine,
            "end-of-buffer" => BufedAction::LastLine,
            "bufed-help" => BufedAction::Help,
            _ => return None,
        };
        Some(action)
    }
}
