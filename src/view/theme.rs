//! Colors for the buffer list

use ratatui::style::{Color, Modifier, Style};

use crate::model::text_buffer::TextStyle;

/// Colors for the buffer list popup
#[derive(Debug, Clone, Copy)]
pub struct BufedTheme {
    pub default_fg: Color,
    /// Buffer name column
    pub buffer_name_fg: Color,
    pub filename_fg: Color,
    pub directory_fg: Color,
    /// Rows of system buffers
    pub system_fg: Color,
    pub cursor_bg: Color,
    /// Marked rows
    pub marked_fg: Color,
    pub border_fg: Color,
    pub title_fg: Color,
}

impl Default for BufedTheme {
    fn default() -> Self {
        Self {
            default_fg: Color::White,
            buffer_name_fg: Color::Cyan,
            filename_fg: Color::Yellow,
            directory_fg: Color::Blue,
            system_fg: Color::DarkGray,
            cursor_bg: Color::Rgb(58, 58, 58),
            marked_fg: Color::LightRed,
            border_fg: Color::Gray,
            title_fg: Color::White,
        }
    }
}

impl BufedTheme {
    /// Style of a span
    pub fn style_for(&self, style: TextStyle) -> Style {
        let fg = match style {
            TextStyle::Default => self.default_fg,
            TextStyle::BufName => self.buffer_name_fg,
            TextStyle::Filename => self.filename_fg,
            TextStyle::Directory => self.directory_fg,
            TextStyle::System => self.system_fg,
        };
        Style::default().fg(fg)
    }

    pub fn cursor_style(&self) -> Style {
        Style::default().bg(self.cursor_bg)
    }

    pub fn marked_style(&self) -> Style {
        Style::default()
            .fg(self.marked_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_fg)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.title_fg)
            .add_modifier(Modifier::BOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_rows_are_dimmed() {
        let theme = BufedTheme::default();
        assert_eq!(theme.style_for(TextStyle::System).fg, Some(Color::DarkGray));
        assert_eq!(theme.style_for(TextStyle::BufName).fg, Some(Color::Cyan));
    }
}
