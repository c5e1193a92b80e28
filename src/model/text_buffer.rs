//! Styled render buffer backing the list display
//!
//! Append-only between clears. Text is stored as lines of styled spans; the
//! cursor and top-of-window are tracked as line numbers. A buffer holding
//! `n` complete rows has `n + 1` cursor positions: the extra one is the
//! empty position after the final newline.

/// Style tag attached to a span of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextStyle {
    #[default]
    Default,
    BufName,
    Filename,
    Directory,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledSpan {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledLine {
    pub spans: Vec<StyledSpan>,
}

impl StyledLine {
    /// Plain text of the line without styles
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.spans.push(StyledSpan {
                text: text.to_string(),
                style,
            }),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StyledBuffer {
    /// Completed lines, each terminated by a newline
    lines: Vec<StyledLine>,
    /// Line being appended to (not yet terminated)
    pending: StyledLine,
    cur_style: TextStyle,
    cursor_line: usize,
    top_line: usize,
    modified: bool,
    read_only: bool,
}

impl StyledBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all content and reset the cursor and window to the start
    pub fn clear(&mut self) {
        self.lines.clear();
        self.pending = StyledLine::default();
        self.cur_style = TextStyle::Default;
        self.cursor_line = 0;
        self.top_line = 0;
        self.modified = true;
    }

    pub fn set_style(&mut self, style: TextStyle) {
        self.cur_style = style;
    }

    /// Append text in the current style. Newlines terminate lines.
    pub fn puts(&mut self, text: &str) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.pending.push(first, self.cur_style);
        }
        for part in parts {
            let done = std::mem::take(&mut self.pending);
            self.lines.push(done);
            self.pending.push(part, self.cur_style);
        }
        self.modified = true;
    }

    /// Append text in the given style, leaving the current style unchanged
    pub fn puts_styled(&mut self, text: &str, style: TextStyle) {
        let saved = self.cur_style;
        self.cur_style = style;
        self.puts(text);
        self.cur_style = saved;
    }

    /// Completed lines
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&StyledLine> {
        self.lines.get(index)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.pending.spans.is_empty()
    }

    /// Full text content, for tests and debugging
    pub fn text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text());
            out.push('\n');
        }
        out.push_str(&self.pending.text());
        out
    }

    /// Index of the last valid cursor line (the position after the last row)
    pub fn last_position(&self) -> usize {
        self.lines.len()
    }

    /// Clamp `line` to a valid cursor line and return it
    pub fn goto_line(&mut self, line: usize) -> usize {
        self.cursor_line = line.min(self.last_position());
        self.cursor_line
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn set_top_line(&mut self, line: usize) {
        self.top_line = line.min(self.last_position());
    }

    /// Whether the cursor sits after the last row of a non-empty buffer
    pub fn cursor_at_end(&self) -> bool {
        !self.lines.is_empty() && self.cursor_line == self.last_position()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }
}
