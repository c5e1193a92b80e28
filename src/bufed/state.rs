//! Per-panel view state

use super::item::ListItem;
use super::sort::SortMask;
use crate::model::buffer::{BufferId, BufferInfo, WindowId};
use crate::model::weak_ref::{WeakBufferRef, WeakWindowRef};

/// Which buffers the list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    HideSystem,
    ShowAll,
}

impl Filter {
    pub fn from_show_all(show_all: bool) -> Self {
        if show_all {
            Filter::ShowAll
        } else {
            Filter::HideSystem
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Filter::HideSystem => Filter::ShowAll,
            Filter::ShowAll => Filter::HideSystem,
        }
    }

    /// Whether a buffer passes the filter
    pub fn admits(self, info: &BufferInfo) -> bool {
        self == Filter::ShowAll || !info.is_system()
    }
}

/// State of one open buffer list
///
/// `items` is the snapshot taken by the last rebuild. `last_index` is the
/// row remembered by the last preview; the next rebuild consumes it and
/// resets it to `None`.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub filter: Filter,
    /// Mask the items were sorted with at the last rebuild
    pub sort_mask: SortMask,
    pub last_index: Option<usize>,
    /// Window the list was opened from
    pub cur_window: WeakWindowRef,
    /// Buffer that window showed when the list opened
    pub cur_buffer: WeakBufferRef,
    /// Buffer that window showed before that
    pub last_buffer: WeakBufferRef,
    pub items: Vec<ListItem>,
}

impl ViewState {
    pub fn new(
        window: WindowId,
        cur_buffer: Option<BufferId>,
        last_buffer: Option<BufferId>,
        filter: Filter,
    ) -> Self {
        Self {
            filter,
            sort_mask: SortMask::empty(),
            last_index: None,
            cur_window: WeakWindowRef::new(window),
            cur_buffer: WeakBufferRef::from_option(cur_buffer),
            last_buffer: WeakBufferRef::from_option(last_buffer),
            items: Vec::new(),
        }
    }

    pub fn item(&self, index: usize) -> Option<&ListItem> {
        self.items.get(index)
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut ListItem> {
        self.items.get_mut(index)
    }

    pub fn marked_count(&self) -> usize {
        self.items.iter().filter(|item| item.selected).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::buffer::BufferFlags;

    #[test]
    fn test_filter_admits() {
        let user = BufferInfo::new(BufferId(1), "a.txt");
        let mut system = BufferInfo::new(BufferId(2), "*messages*");
        system.flags |= BufferFlags::SYSTEM;

        assert!(Filter::HideSystem.admits(&user));
        assert!(!Filter::HideSystem.admits(&system));
        assert!(Filter::ShowAll.admits(&system));
        assert_eq!(Filter::HideSystem.toggled(), Filter::ShowAll);
        assert_eq!(Filter::ShowAll.toggled(), Filter::HideSystem);
    }
}
