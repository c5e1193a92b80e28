//! Buffer list popup rendering
//!
//! Renders the panel's styled rows inside a bordered block. The title names
//! the active sort order; the cursor row is highlighted and marked rows are
//! drawn in the marked style.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme::BufedTheme;
use crate::bufed::panel::{BufferList, BUFED_TITLE};
use crate::bufed::sort::describe;

/// Area of the popup inside `screen`: full width, bottom two thirds
pub fn popup_area(screen: Rect) -> Rect {
    let height = (screen.height * 2 / 3).max(3).min(screen.height);
    Rect::new(
        screen.x,
        screen.y + screen.height - height,
        screen.width,
        height,
    )
}

/// Number of rows visible inside a popup of `area`
pub fn visible_rows(area: Rect) -> usize {
    area.height.saturating_sub(2) as usize
}

/// Render a buffer list
pub fn render_buffer_list(frame: &mut Frame, area: Rect, list: &BufferList, theme: &BufedTheme) {
    if area.height < 3 || area.width < 4 {
        return;
    }

    let state = list.state();
    let mut title = format!(" {} [{}] ", BUFED_TITLE, describe(list.sort_mask()));
    if state.marked_count() > 0 {
        title.push_str(&format!("{} marked ", state.marked_count()));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(title, theme.title_style()));

    let display = list.display();
    let top = display.top_line();
    let cursor = list.current_index();
    let lines: Vec<Line> = display
        .lines()
        .iter()
        .enumerate()
        .skip(top)
        .take(visible_rows(area))
        .map(|(index, line)| {
            let marked = state.item(index).is_some_and(|item| item.selected);
            let spans: Vec<Span> = line
                .spans
                .iter()
                .map(|span| {
                    let style = if marked {
                        theme.marked_style()
                    } else {
                        theme.style_for(span.style)
                    };
                    Span::styled(span.text.clone(), style)
                })
                .collect();
            let line = Line::from(spans);
            if cursor == Some(index) {
                line.style(theme.cursor_style())
            } else {
                line
            }
        })
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bufed::action::BufedAction;
    use crate::bufed::sort::SharedSortOrder;
    use crate::config::BufferListConfig;
    use crate::model::workbench::Workbench;
    use ratatui::backend::TestBackend;
    use ratatui::style::Color;
    use ratatui::Terminal;

    fn open_list(names: &[&str]) -> (Workbench, BufferList) {
        let mut bench = Workbench::new();
        let ids: Vec<_> = names.iter().map(|n| bench.add_buffer(n)).collect();
        let origin = bench.open_window(ids[0]);
        let settings = BufferListConfig {
            preview_on_move: false,
            ..BufferListConfig::default()
        };
        let list =
            BufferList::open(&mut bench, origin, false, SharedSortOrder::default(), settings)
                .unwrap();
        (bench, list)
    }

    fn draw(list: &BufferList, width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = Rect::new(0, 0, width, height);
                render_buffer_list(frame, area, list, &BufedTheme::default());
            })
            .unwrap();
        terminal
    }

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_renders_title_and_rows() {
        let (_bench, list) = open_list(&["alpha.txt", "beta.txt"]);
        let terminal = draw(&list, 60, 6);

        assert!(row_text(&terminal, 0).contains("Buffer list [unsorted]"));
        assert!(row_text(&terminal, 1).contains("alpha.txt"));
        assert!(row_text(&terminal, 2).contains("beta.txt"));
    }

    #[test]
    fn test_cursor_and_marked_rows_are_styled() {
        let (mut bench, mut list) = open_list(&["alpha.txt", "beta.txt"]);
        list.dispatch(&mut bench, BufedAction::ToggleMark);
        let terminal = draw(&list, 60, 6);
        let theme = BufedTheme::default();
        let buffer = terminal.backend().buffer();

        // alpha is marked, the cursor moved on to beta
        assert_eq!(buffer[(3, 1)].fg, theme.marked_fg);
        assert_eq!(buffer[(3, 2)].bg, theme.cursor_bg);
        assert_ne!(buffer[(3, 1)].bg, theme.cursor_bg);
        assert!(row_text(&terminal, 0).contains("1 marked"));
        assert_eq!(buffer[(4, 2)].fg, Color::Cyan);
    }

    #[test]
    fn test_scrolled_list_starts_at_top_line() {
        let names: Vec<String> = (0..20).map(|i| format!("buf{i:02}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (mut bench, mut list) = open_list(&refs);
        list.dispatch(&mut bench, BufedAction::LastLine);
        list.scroll_to_cursor(visible_rows(Rect::new(0, 0, 60, 7)));

        let terminal = draw(&list, 60, 7);
        assert!(row_text(&terminal, 5).contains("buf19"));
        assert!(row_text(&terminal, 1).contains("buf15"));
    }

    #[test]
    fn test_popup_area_fits_screen() {
        let area = popup_area(Rect::new(0, 0, 80, 24));
        assert_eq!(area, Rect::new(0, 8, 80, 16));
        assert_eq!(visible_rows(area), 14);
    }
}
