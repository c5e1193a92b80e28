//! Interfaces the buffer list consumes from its host
//!
//! `BufferRegistry` is the authoritative set of live buffers and
//! `WindowHost` is the window/layout manager. The list never holds on to
//! anything these return across calls; every access goes back to the host.

use super::buffer::{BufferFlags, BufferId, BufferInfo, WindowId};

/// Errors reported by a registry when a request cannot be honored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No live buffer has this id
    NotFound(BufferId),
    /// The host (or the user, through a confirmation prompt) refused to
    /// destroy the named buffer
    Declined(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::NotFound(id) => write!(f, "No such buffer: {}", id.0),
            RegistryError::Declined(name) => write!(f, "Kill declined for buffer {name}"),
        }
    }
}

impl std::error::Error for RegistryError {}

/// The authoritative, mutable set of live buffers
pub trait BufferRegistry {
    /// All live buffers in creation order
    fn enumerate(&self) -> Vec<&BufferInfo>;

    /// Look up a live buffer
    fn get(&self, id: BufferId) -> Option<&BufferInfo>;

    /// Whether `id` still names a live buffer
    fn exists(&self, id: BufferId) -> bool {
        self.get(id).is_some()
    }

    /// Destroy a buffer. May consult the user for modified buffers.
    fn destroy(&mut self, id: BufferId) -> Result<(), RegistryError>;

    /// Set or clear flags on a live buffer
    fn set_flag(&mut self, id: BufferId, flag: BufferFlags, value: bool)
        -> Result<(), RegistryError>;

    /// Return the buffer called `name`, creating it with `flags` if absent
    fn find_or_create_scratch(&mut self, name: &str, flags: BufferFlags) -> BufferId;
}

/// Kind of window, used to refuse opening the list from transient windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Normal,
    Popup,
    Minibuffer,
}

/// The window/layout manager
pub trait WindowHost {
    fn window_exists(&self, window: WindowId) -> bool;

    fn window_kind(&self, window: WindowId) -> Option<WindowKind>;

    /// Buffer currently displayed in `window`
    fn buffer_of(&self, window: WindowId) -> Option<BufferId>;

    /// Buffer displayed in `window` before its current one
    fn last_buffer_of(&self, window: WindowId) -> Option<BufferId>;

    /// Display `buffer` in `window`
    fn switch_to_buffer(&mut self, window: WindowId, buffer: BufferId);

    fn set_last_buffer(&mut self, window: WindowId, buffer: Option<BufferId>);

    fn set_active_window(&mut self, window: WindowId);

    /// Show `buffer` in a new popup window
    fn show_popup(&mut self, buffer: BufferId, title: &str) -> Option<WindowId>;

    fn close_window(&mut self, window: WindowId);
}

/// Everything the panel needs from its host
pub trait Host: BufferRegistry + WindowHost {}

impl<T: BufferRegistry + WindowHost + ?Sized> Host for T {}
