//! Non-owning references to host objects
//!
//! A `WeakRef` stores the identity an object had when the reference was
//! taken. Before it is used the identity is re-validated against the host;
//! a dead target clears the slot so later checks are free and can never
//! resurrect it.

use super::buffer::{BufferId, BufferInfo, WindowId};
use super::registry::{BufferRegistry, WindowHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeakRef<T> {
    slot: Option<T>,
}

pub type WeakBufferRef = WeakRef<BufferId>;
pub type WeakWindowRef = WeakRef<WindowId>;

impl<T> Default for WeakRef<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T: Copy + PartialEq> WeakRef<T> {
    pub fn new(target: T) -> Self {
        Self { slot: Some(target) }
    }

    pub fn from_option(target: Option<T>) -> Self {
        Self { slot: target }
    }

    /// Re-validate the slot with `alive`, clearing it if the target is gone
    pub fn check(&mut self, alive: impl FnOnce(T) -> bool) -> Option<T> {
        let target = self.slot?;
        if alive(target) {
            Some(target)
        } else {
            self.slot = None;
            None
        }
    }

    /// The stored identity without validation. Only for identity
    /// comparisons; never dereference through it.
    pub fn peek(&self) -> Option<T> {
        self.slot
    }

    /// Whether the slot currently holds `target` (no validation)
    pub fn is(&self, target: T) -> bool {
        self.slot == Some(target)
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }
}

impl WeakRef<BufferId> {
    /// Resolve against the registry, clearing the slot if the buffer died
    pub fn resolve<'r, R>(&mut self, registry: &'r R) -> Option<&'r BufferInfo>
    where
        R: BufferRegistry + ?Sized,
    {
        let id = self.check(|id| registry.exists(id))?;
        registry.get(id)
    }
}

impl WeakRef<WindowId> {
    pub fn resolve<W>(&mut self, windows: &W) -> Option<WindowId>
    where
        W: WindowHost + ?Sized,
    {
        self.check(|id| windows.window_exists(id))
    }
}
