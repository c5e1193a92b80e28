//! The buffer list panel and its commands
//!
//! A `BufferList` is bound to one popup window showing the `*bufed*`
//! buffer. Every command resolves rows through their weak references, so
//! buffers created or destroyed elsewhere between commands are tolerated:
//! dead rows are inert and out-of-range rows are no-ops.

use super::action::BufedAction;
use super::builder;
use super::item::selection_targets;
use super::sort::{SharedSortOrder, SortDirection, SortKey, SortMask};
use super::state::{Filter, ViewState};
use crate::config::BufferListConfig;
use crate::model::buffer::{BufferFlags, BufferId, BufferInfo, WindowId};
use crate::model::collate::{Collator, NaturalCollator};
use crate::model::registry::{Host, WindowKind};
use crate::model::text_buffer::StyledBuffer;

/// Name of the buffer hosting the list
pub const BUFED_BUFFER_NAME: &str = "*bufed*";
/// Title of the popup window
pub const BUFED_TITLE: &str = "Buffer list";

const DEFAULT_PAGE_HEIGHT: usize = 10;

/// Lifecycle of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelPhase {
    /// Normal browsing
    Open,
    /// A command is being applied
    ActionPending,
    /// The panel has been closed; every command is a no-op
    Closed,
}

/// How a selection switches buffers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SelectMode {
    /// Switch and close
    Confirm,
    /// Switch and stay open
    Preview,
    /// Restore the buffers shown before the list opened, then close
    Abort,
}

pub struct BufferList {
    state: ViewState,
    display: StyledBuffer,
    /// The `*bufed*` buffer; never killed from the list
    buffer: BufferId,
    /// Popup window showing the list
    window: WindowId,
    /// Whether the list is shown as an overlay over the origin window
    overlay: bool,
    phase: PanelPhase,
    sort_order: SharedSortOrder,
    settings: BufferListConfig,
    collator: Box<dyn Collator>,
    page_height: usize,
    /// Key binding listing shown over the rows
    help_visible: bool,
}

impl BufferList {
    /// Open a buffer list for `origin`
    ///
    /// Returns `None` when invoked from a popup or minibuffer window or when
    /// the host cannot show the popup.
    pub fn open<H: Host + ?Sized>(
        host: &mut H,
        origin: WindowId,
        show_all: bool,
        sort_order: SharedSortOrder,
        settings: BufferListConfig,
    ) -> Option<Self> {
        match host.window_kind(origin) {
            Some(WindowKind::Normal) => {}
            kind => {
                tracing::debug!("Not opening buffer list from {:?} window", kind);
                return None;
            }
        }

        let buffer =
            host.find_or_create_scratch(BUFED_BUFFER_NAME, BufferFlags::SYSTEM | BufferFlags::READ_ONLY);
        let current = host.buffer_of(origin);
        let previous = host.last_buffer_of(origin);
        let window = host.show_popup(buffer, BUFED_TITLE)?;
        let overlay = host.window_kind(window) == Some(WindowKind::Popup);

        let mut list = Self {
            state: ViewState::new(origin, current, previous, Filter::from_show_all(show_all)),
            display: StyledBuffer::new(),
            buffer,
            window,
            overlay,
            phase: PanelPhase::Open,
            sort_order,
            settings,
            collator: Box::new(NaturalCollator),
            page_height: DEFAULT_PAGE_HEIGHT,
            help_visible: false,
        };
        list.rebuild(host);

        // Go directly to the active buffer if it is listed
        let current_name = current.and_then(|id| host.get(id)).map(|b| b.name.clone());
        if let Some(name) = current_name {
            if let Some(row) = list.state.items.iter().position(|item| item.label == name) {
                list.display.goto_line(row);
            }
        }
        tracing::debug!(
            "Opened buffer list with {} rows in {:?}",
            list.state.items.len(),
            window
        );

        list.after_command(host);
        Some(list)
    }

    /// Replace the string collation used by later rebuilds
    pub fn with_collator(mut self, collator: impl Collator + 'static) -> Self {
        self.collator = Box::new(collator);
        self
    }

    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    pub fn is_closed(&self) -> bool {
        self.phase == PanelPhase::Closed
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn display(&self) -> &StyledBuffer {
        &self.display
    }

    pub fn buffer_id(&self) -> BufferId {
        self.buffer
    }

    pub fn window_id(&self) -> WindowId {
        self.window
    }

    pub fn is_overlay(&self) -> bool {
        self.overlay
    }

    pub fn is_help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn filter(&self) -> Filter {
        self.state.filter
    }

    /// Sort mask the rows are currently ordered by
    pub fn sort_mask(&self) -> SortMask {
        self.state.sort_mask
    }

    pub fn labels(&self) -> Vec<&str> {
        self.state.items.iter().map(|item| item.label.as_str()).collect()
    }

    pub fn cursor_line(&self) -> usize {
        self.display.cursor_line()
    }

    /// Row index under the cursor, if the cursor is on a row
    pub fn current_index(&self) -> Option<usize> {
        let index = self.display.cursor_line();
        (index < self.state.items.len()).then_some(index)
    }

    /// Resolve the buffer of the row under the cursor
    pub fn current_buffer<'h, H: Host + ?Sized>(&mut self, host: &'h H) -> Option<&'h BufferInfo> {
        let index = self.current_index()?;
        self.state.items[index].buffer.resolve(host)
    }

    /// Run one command
    pub fn dispatch<H: Host + ?Sized>(&mut self, host: &mut H, action: BufedAction) {
        if self.phase == PanelPhase::Closed {
            return;
        }
        self.phase = PanelPhase::ActionPending;
        tracing::debug!("Buffer list action: {}", action.name());
        // Any command dismisses the help listing
        let help_was_visible = std::mem::take(&mut self.help_visible);

        match action {
            BufedAction::Select => self.select(host, SelectMode::Confirm),
            BufedAction::Abort => self.select(host, SelectMode::Abort),
            BufedAction::ClearModified => self.clear_modified(host),
            BufedAction::ToggleReadOnly => self.toggle_read_only(host),
            BufedAction::ToggleAllVisible => self.refresh(host, true),
            BufedAction::Refresh => self.refresh(host, false),
            BufedAction::KillBuffer => self.kill_buffer(host),
            BufedAction::Sort(key, direction) => self.set_sort(host, key, direction),
            BufedAction::ToggleMark => self.toggle_mark(),
            BufedAction::UnmarkAll => self.unmark_all(),
            BufedAction::NextLine => self.move_cursor(1),
            BufedAction::PreviousLine => self.move_cursor(-1),
            BufedAction::PageDown => self.move_cursor(self.page_height as isize),
            BufedAction::PageUp => self.move_cursor(-(self.page_height as isize)),
            BufedAction::FirstLine => {
                self.display.goto_line(0);
            }
            BufedAction::LastLine => {
                self.display.goto_line(self.state.items.len().saturating_sub(1));
            }
            BufedAction::Help => self.help_visible = !help_was_visible,
        }

        if self.phase == PanelPhase::ActionPending {
            self.phase = PanelPhase::Open;
            self.after_command(host);
        }
    }

    /// Display hook run after every command and redraw
    ///
    /// Keeps the cursor off the empty position after the last row, and in
    /// overlay mode previews the buffer under the cursor.
    pub fn after_command<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.phase != PanelPhase::Open {
            return;
        }
        if self.display.cursor_at_end() {
            self.move_cursor(-1);
        }
        if self.overlay && self.settings.preview_on_move {
            self.select(host, SelectMode::Preview);
        }
    }

    /// Regenerate the rows from the registry
    pub fn rebuild<H: Host + ?Sized>(&mut self, host: &mut H) {
        let mask = self.sort_order.get();
        builder::rebuild(
            &mut self.state,
            &mut self.display,
            &*host,
            mask,
            self.collator.as_ref(),
            self.settings.name_column_width,
        );
        for (flag, value) in [(BufferFlags::MODIFIED, false), (BufferFlags::READ_ONLY, true)] {
            if let Err(e) = host.set_flag(self.buffer, flag, value) {
                tracing::debug!("Cannot update buffer list flags: {}", e);
            }
        }
    }

    fn select<H: Host + ?Sized>(&mut self, host: &mut H, mode: SelectMode) {
        let (buffer, last_buffer, index) = match mode {
            SelectMode::Abort => (
                self.state.cur_buffer.resolve(&*host).map(|b| b.id),
                self.state.last_buffer.resolve(&*host).map(|b| b.id),
                None,
            ),
            SelectMode::Confirm | SelectMode::Preview => {
                let Some(index) = self.current_index() else {
                    return;
                };
                if mode == SelectMode::Preview && self.state.last_index == Some(index) {
                    return;
                }
                let buffer = self.state.items[index].buffer.resolve(&*host).map(|b| b.id);
                // A dead row is inert: nothing to switch to, and the list stays open
                if mode == SelectMode::Confirm && buffer.is_none() {
                    return;
                }
                let last_buffer = self.state.cur_buffer.resolve(&*host).map(|b| b.id);
                (buffer, last_buffer, Some(index))
            }
        };

        let window = self.state.cur_window.resolve(&*host);
        if let (Some(window), Some(buffer)) = (window, buffer) {
            host.switch_to_buffer(window, buffer);
            host.set_last_buffer(window, last_buffer);
        }

        match mode {
            SelectMode::Preview => self.state.last_index = index,
            SelectMode::Confirm | SelectMode::Abort => {
                self.close(host);
                if let Some(window) = window {
                    host.set_active_window(window);
                }
            }
        }
    }

    /// Close the popup and release the rows
    pub fn close<H: Host + ?Sized>(&mut self, host: &mut H) {
        if self.phase == PanelPhase::Closed {
            return;
        }
        host.close_window(self.window);
        self.state.items.clear();
        self.help_visible = false;
        self.phase = PanelPhase::Closed;
        tracing::debug!("Closed buffer list {:?}", self.window);
    }

    fn kill_buffer<H: Host + ?Sized>(&mut self, host: &mut H) {
        let targets = selection_targets(&self.state.items, self.current_index());

        for index in targets {
            let Some(id) = self.state.items[index].buffer.resolve(&*host).map(|b| b.id) else {
                continue;
            };
            if id == self.buffer {
                tracing::debug!("Refusing to kill the buffer list's own buffer");
                continue;
            }
            match host.destroy(id) {
                Ok(()) => {
                    self.state.items[index].buffer.clear();
                    if self.state.cur_buffer.is(id) {
                        self.state.cur_buffer.clear();
                    }
                }
                Err(e) => tracing::debug!("Buffer not killed: {}", e),
            }
        }

        self.select(host, SelectMode::Preview);
        self.rebuild(host);
    }

    fn clear_modified<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(id) = self.current_buffer(&*host).map(|b| b.id) else {
            return;
        };
        if let Err(e) = host.set_flag(id, BufferFlags::MODIFIED, false) {
            tracing::debug!("Cannot clear modified flag: {}", e);
        }
        self.rebuild(host);
    }

    fn toggle_read_only<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some((id, read_only)) = self
            .current_buffer(&*host)
            .map(|b| (b.id, b.is_read_only()))
        else {
            return;
        };
        if let Err(e) = host.set_flag(id, BufferFlags::READ_ONLY, !read_only) {
            tracing::debug!("Cannot toggle read-only flag: {}", e);
        }
        self.rebuild(host);
    }

    fn refresh<H: Host + ?Sized>(&mut self, host: &mut H, toggle_filter: bool) {
        if toggle_filter {
            self.state.filter = self.state.filter.toggled();
        }
        self.rebuild(host);
    }

    fn set_sort<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        key: SortKey,
        direction: Option<SortDirection>,
    ) {
        self.sort_order.apply(key, direction);
        self.state.last_index = None;
        self.rebuild(host);
    }

    /// Flip the mark on the current row and move to the next one
    fn toggle_mark(&mut self) {
        let Some(index) = self.current_index() else {
            return;
        };
        if let Some(item) = self.state.item_mut(index) {
            item.selected = !item.selected;
        }
        self.move_cursor(1);
    }

    fn unmark_all(&mut self) {
        for item in &mut self.state.items {
            item.selected = false;
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let target = self.display.cursor_line().saturating_add_signed(delta);
        self.display.goto_line(target);
    }

    /// Scroll so the cursor is inside a window of `height` rows
    pub fn scroll_to_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        self.page_height = height;
        let cursor = self.display.cursor_line();
        let top = self.display.top_line();
        if cursor < top {
            self.display.set_top_line(cursor);
        } else if cursor >= top + height {
            self.display.set_top_line(cursor + 1 - height);
        }
    }
}
