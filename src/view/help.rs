//! Key binding listing shown over the buffer list

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::theme::BufedTheme;
use crate::bufed::panel::BUFED_TITLE;
use crate::model::text_buffer::TextStyle;

/// Render `bindings` as (key, description) rows, keys aligned in one column
pub fn render_help(frame: &mut Frame, area: Rect, bindings: &[(String, String)], theme: &BufedTheme) {
    if area.height < 3 || area.width < 4 {
        return;
    }

    let key_width = bindings
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    let lines: Vec<Line> = bindings
        .iter()
        .map(|(key, description)| {
            Line::from(vec![
                Span::styled(format!(" {key:<key_width$}  "), theme.title_style()),
                Span::styled(description.clone(), theme.style_for(TextStyle::Default)),
            ])
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(
            format!(" {BUFED_TITLE} keys "),
            theme.title_style(),
        ));

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
