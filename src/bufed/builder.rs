//! Rebuilding the list from the registry and rendering it into rows
//!
//! A row looks like
//!
//! ```text
//!  * main.rs                    1234   utf8     rust        ~/src/main.rs
//! ```
//!
//! flags, fitted buffer name, size, style bytes, charset, mode and the
//! user-facing path. Dead rows keep their flags and name columns only.

use std::path::{Path, MAIN_SEPARATOR};

use super::item::ListItem;
use super::sort::{compare_items, SortMask};
use super::state::ViewState;
use crate::config::MIN_NAME_COLUMN_WIDTH;
use crate::model::buffer::{BufferFlags, BufferInfo};
use crate::model::collate::Collator;
use crate::model::registry::BufferRegistry;
use crate::model::text_buffer::{StyledBuffer, TextStyle};

/// Chars kept from the end of a truncated name
const NAME_TAIL: usize = 5;
const ELLIPSIS: &str = "...";
/// Longest mode column before truncation
const MAX_MODE_LEN: usize = 63;

/// Regenerate `state.items` and the rendered rows from the registry
///
/// The cursor lands on the row remembered in `state.last_index` (clamped to
/// the last row) or, when nothing is remembered, on the row of the buffer
/// that was current when the list opened. The cursor's offset from the top
/// of the window is kept when possible.
pub fn rebuild<R>(
    state: &mut ViewState,
    display: &mut StyledBuffer,
    registry: &R,
    sort_mask: SortMask,
    collator: &dyn Collator,
    name_width: usize,
) where
    R: BufferRegistry + ?Sized,
{
    let filter = state.filter;
    state.items = registry
        .enumerate()
        .into_iter()
        .filter(|info| filter.admits(info))
        .map(ListItem::new)
        .collect();

    state.sort_mask = sort_mask;
    if !sort_mask.is_empty() {
        state.items.sort_by(|a, b| {
            compare_items(
                a.buffer.peek().and_then(|id| registry.get(id)),
                b.buffer.peek().and_then(|id| registry.get(id)),
                sort_mask,
                collator,
            )
        });
    }

    // Preserve the cursor's position within the window
    let vpos = if display.is_empty() {
        None
    } else {
        Some(display.cursor_line().saturating_sub(display.top_line()))
    };
    display.clear();

    let last_index = state.last_index;
    let cur_buffer = state.cur_buffer.peek();
    let mut line = 0;
    for (index, item) in state.items.iter_mut().enumerate() {
        let info = item.buffer.resolve(registry);
        let restore = match last_index {
            Some(last) => last >= index,
            None => info.is_some_and(|b| cur_buffer == Some(b.id)),
        };
        if restore {
            line = index;
        }
        format_row(display, &item.label, info, name_width);
    }

    tracing::debug!(
        "Rebuilt buffer list: {} rows, filter {:?}, sort {:?}",
        state.items.len(),
        filter,
        sort_mask
    );

    state.last_index = None;
    display.set_modified(false);
    display.set_read_only(true);
    let line = display.goto_line(line);
    if let Some(vpos) = vpos {
        if line > vpos {
            display.set_top_line(line - vpos);
        }
    }
}

/// Append one row for `label` to the display
pub fn format_row(
    display: &mut StyledBuffer,
    label: &str,
    info: Option<&BufferInfo>,
    name_width: usize,
) {
    let base = match info {
        Some(b) if b.is_system() => TextStyle::System,
        _ => TextStyle::Default,
    };
    display.set_style(base);
    display.puts(&format!(" {:<2}", flag_field(info)));
    display.puts_styled(&fit_name(label, name_width), TextStyle::BufName);

    if let Some(b) = info {
        let style_bytes = match b.style_bytes & 7 {
            0 => " ".to_string(),
            n => n.to_string(),
        };
        display.puts(&format!(
            " {:>10} {} {:<8.8} {:<11} ",
            b.size,
            style_bytes,
            b.charset,
            mode_field(b)
        ));
        let path_style = if b.flags.contains(BufferFlags::DIRED) {
            TextStyle::Directory
        } else {
            TextStyle::Filename
        };
        display.puts_styled(&user_path(b.filename.as_deref()), path_style);
    }
    display.puts("\n");
}

/// Single flag for the row, highest priority first: system, modified,
/// read-only
pub fn flag_field(info: Option<&BufferInfo>) -> &'static str {
    match info {
        Some(b) if b.is_system() => "S",
        Some(b) if b.is_modified() => "*",
        Some(b) if b.is_read_only() => "%",
        _ => "",
    }
}

/// Fit `name` into `width` columns, keeping its head and tail around an
/// ellipsis when it is too long; `width` is raised to the minimum column
pub fn fit_name(name: &str, width: usize) -> String {
    let width = width.max(MIN_NAME_COLUMN_WIDTH);
    let len = name.chars().count();
    if len <= width {
        return format!("{name:<width$}");
    }
    let head_len = width.saturating_sub(NAME_TAIL + ELLIPSIS.len());
    let head: String = name.chars().take(head_len).collect();
    let tail: String = name.chars().skip(len - NAME_TAIL.min(len)).collect();
    format!("{head}{ELLIPSIS}{tail}")
}

/// Mode column: optional data type prefix, primary mode, then extra modes
pub fn mode_field(info: &BufferInfo) -> String {
    let mut out = String::new();
    if let Some(data_type) = &info.data_type {
        out.push_str(data_type);
        out.push('+');
    }
    out.push_str(info.primary_mode_name());
    for mode in &info.extra_modes {
        if Some(mode.as_str()) != info.saved_mode.as_deref() {
            out.push(',');
            out.push_str(mode);
        }
    }
    if out.chars().count() > MAX_MODE_LEN {
        out = out.chars().take(MAX_MODE_LEN).collect();
    }
    out
}

/// Path as shown to the user, with the home directory abbreviated to `~`
pub fn user_path(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return String::new();
    };
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~{}{}", MAIN_SEPARATOR, rest.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bufed::state::Filter;
    use crate::model::buffer::{BufferId, WindowId};
    use crate::model::collate::NaturalCollator;
    use crate::model::workbench::Workbench;
    use std::path::PathBuf;

    fn row_text(info: Option<&BufferInfo>, label: &str) -> String {
        let mut display = StyledBuffer::new();
        format_row(&mut display, label, info, 20);
        display.line(0).map(|l| l.text()).unwrap_or_default()
    }

    #[test]
    fn test_fit_name_truncates_head_and_tail() {
        let name = "abcdefghijklmnopqrstuvwxyz0123"; // 30 chars
        let fitted = fit_name(name, 20);
        assert_eq!(fitted, "abcdefghijkl...z0123");
        assert_eq!(fitted.chars().count(), 20);
    }

    #[test]
    fn test_fit_name_never_narrower_than_minimum() {
        let fitted = fit_name("a-rather-long-buffer-name.txt", 4);
        assert_eq!(fitted, "a...e.txt");
        assert_eq!(fitted.chars().count(), MIN_NAME_COLUMN_WIDTH);
        assert_eq!(fit_name("ab", 0).chars().count(), MIN_NAME_COLUMN_WIDTH);
    }

    #[test]
    fn test_fit_name_pads_short_names() {
        assert_eq!(fit_name("a.txt", 9), "a.txt    ");
        assert_eq!(fit_name("exactly-twenty-chars", 20), "exactly-twenty-chars");
    }

    #[test]
    fn test_flag_priority() {
        let mut info = BufferInfo::new(BufferId(1), "x");
        assert_eq!(flag_field(Some(&info)), "");
        info.flags |= BufferFlags::READ_ONLY;
        assert_eq!(flag_field(Some(&info)), "%");
        info.flags |= BufferFlags::MODIFIED;
        assert_eq!(flag_field(Some(&info)), "*");
        info.flags |= BufferFlags::SYSTEM;
        assert_eq!(flag_field(Some(&info)), "S");
        assert_eq!(flag_field(None), "");
    }

    #[test]
    fn test_row_layout() {
        let mut info = BufferInfo::new(BufferId(1), "main.rs");
        info.flags |= BufferFlags::MODIFIED;
        info.size = 1234;
        info.syntax_mode = Some("rust".into());
        info.filename = Some(PathBuf::from("/src/main.rs"));

        let expected = format!(
            " * main.rs{}1234{}utf8{}rust{}/src/main.rs",
            " ".repeat(20),
            " ".repeat(3),
            " ".repeat(5),
            " ".repeat(8)
        );
        assert_eq!(row_text(Some(&info), "main.rs"), expected);
    }

    #[test]
    fn test_dead_row_shows_name_only() {
        assert_eq!(
            row_text(None, "gone.txt"),
            format!("   gone.txt{}", " ".repeat(12))
        );
    }

    #[test]
    fn test_row_styles() {
        let mut info = BufferInfo::new(BufferId(1), "*log*");
        info.flags |= BufferFlags::SYSTEM | BufferFlags::DIRED;
        info.filename = Some(PathBuf::from("/var"));
        let mut display = StyledBuffer::new();
        format_row(&mut display, "*log*", Some(&info), 20);

        let styles: Vec<TextStyle> = display.lines()[0].spans.iter().map(|s| s.style).collect();
        assert_eq!(
            styles,
            vec![
                TextStyle::System,
                TextStyle::BufName,
                TextStyle::System,
                TextStyle::Directory
            ]
        );
    }

    #[test]
    fn test_mode_field_composition() {
        let mut info = BufferInfo::new(BufferId(1), "x");
        info.data_type = Some("raw".into());
        info.saved_mode = Some("hex".into());
        info.extra_modes = vec!["hex".into(), "overwrite".into(), "spell".into()];
        assert_eq!(mode_field(&info), "raw+hex,overwrite,spell");
    }

    #[test]
    fn test_style_bytes_column() {
        let mut info = BufferInfo::new(BufferId(1), "x");
        info.style_bytes = 2;
        assert!(row_text(Some(&info), "x").contains("          0 2 utf8"));
    }

    #[test]
    fn test_user_path_abbreviates_home() {
        assert_eq!(user_path(None), "");
        assert_eq!(user_path(Some(Path::new("/etc/hosts"))), "/etc/hosts");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(user_path(Some(&home)), "~");
            let file = home.join("notes.txt");
            assert_eq!(
                user_path(Some(&file)),
                format!("~{}notes.txt", MAIN_SEPARATOR)
            );
        }
    }

    fn rebuild_bench(bench: &Workbench, state: &mut ViewState, display: &mut StyledBuffer) {
        rebuild(state, display, bench, SortMask::empty(), &NaturalCollator, 20);
    }

    #[test]
    fn test_rebuild_applies_filter_and_flags_display() {
        let mut bench = Workbench::new();
        bench.add_buffer("a");
        bench.add_buffer_with("*messages*", |b| b.flags |= BufferFlags::SYSTEM);
        bench.add_buffer("b");

        let mut state = ViewState::new(WindowId(1), None, None, Filter::HideSystem);
        let mut display = StyledBuffer::new();
        rebuild_bench(&bench, &mut state, &mut display);

        let labels: Vec<_> = state.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(display.line_count(), 2);
        assert!(!display.is_modified());
        assert!(display.is_read_only());

        state.filter = Filter::ShowAll;
        rebuild_bench(&bench, &mut state, &mut display);
        assert_eq!(state.items.len(), 3);
    }

    #[test]
    fn test_rebuild_restores_current_buffer_row() {
        let mut bench = Workbench::new();
        bench.add_buffer("a");
        let b = bench.add_buffer("b");
        bench.add_buffer("c");

        let mut state = ViewState::new(WindowId(1), Some(b), None, Filter::HideSystem);
        let mut display = StyledBuffer::new();
        rebuild_bench(&bench, &mut state, &mut display);
        assert_eq!(display.cursor_line(), 1);
    }

    #[test]
    fn test_rebuild_consumes_last_index_and_clamps() {
        let mut bench = Workbench::new();
        let a = bench.add_buffer("a");
        bench.add_buffer("b");
        let c = bench.add_buffer("c");

        let mut state = ViewState::new(WindowId(1), Some(a), None, Filter::HideSystem);
        let mut display = StyledBuffer::new();
        state.last_index = Some(2);
        rebuild_bench(&bench, &mut state, &mut display);
        assert_eq!(display.cursor_line(), 2);
        assert_eq!(state.last_index, None);

        bench.destroy_now(c);
        state.last_index = Some(2);
        rebuild_bench(&bench, &mut state, &mut display);
        assert_eq!(display.cursor_line(), 1);
    }

    #[test]
    fn test_rebuild_preserves_window_offset() {
        let mut bench = Workbench::new();
        let ids: Vec<_> = (0..30).map(|i| bench.add_buffer(&format!("buf{i:02}"))).collect();

        let mut state = ViewState::new(WindowId(1), Some(ids[0]), None, Filter::HideSystem);
        let mut display = StyledBuffer::new();
        rebuild_bench(&bench, &mut state, &mut display);

        // Cursor 3 lines below the top of the window
        display.set_top_line(10);
        display.goto_line(13);
        state.last_index = Some(20);
        rebuild_bench(&bench, &mut state, &mut display);

        assert_eq!(display.cursor_line(), 20);
        assert_eq!(display.top_line(), 17);
    }
}
