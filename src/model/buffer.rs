//! Buffer handles as seen by the buffer list
//!
//! A `BufferInfo` is owned by the host registry and may be mutated or
//! destroyed at any time. The list only reads these attributes after
//! re-validating its weak reference.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::SystemTime;

/// Unique identifier for a buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub usize);

/// Unique identifier for a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(pub usize);

bitflags! {
    /// Per-buffer flags consumed by the list
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BufferFlags: u32 {
        /// Content differs from the last save
        const MODIFIED = 1 << 0;
        /// Edits are refused
        const READ_ONLY = 1 << 1;
        /// Internal/utility buffer rather than user content
        const SYSTEM = 1 << 2;
        /// Message log buffer
        const IS_LOG = 1 << 3;
        /// Style side-buffer of another buffer
        const IS_STYLE = 1 << 4;
        /// Directory listing
        const DIRED = 1 << 5;
    }
}

/// Snapshot of the attributes of a live buffer
#[derive(Debug, Clone, PartialEq)]
pub struct BufferInfo {
    pub id: BufferId,
    pub name: String,
    pub flags: BufferFlags,
    /// Content size in bytes
    pub size: u64,
    /// Last modification time of the content, if known
    pub mtime: Option<SystemTime>,
    pub filename: Option<PathBuf>,
    /// Character set name, e.g. "utf8"
    pub charset: String,
    /// Data type prefix shown before the mode name (e.g. "raw")
    pub data_type: Option<String>,
    /// Mode the buffer was last displayed with
    pub saved_mode: Option<String>,
    /// Mode selected when the buffer was created
    pub default_mode: Option<String>,
    /// Mode inferred from the content or file extension
    pub syntax_mode: Option<String>,
    /// Additional modes attached to the buffer
    pub extra_modes: Vec<String>,
    /// Bytes of style information per character (0 when unstyled)
    pub style_bytes: u8,
}

impl BufferInfo {
    /// Create a plain buffer with the given name and default attributes
    pub fn new(id: BufferId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            flags: BufferFlags::empty(),
            size: 0,
            mtime: None,
            filename: None,
            charset: "utf8".to_string(),
            data_type: None,
            saved_mode: None,
            default_mode: None,
            syntax_mode: None,
            extra_modes: Vec::new(),
            style_bytes: 0,
        }
    }

    pub fn is_system(&self) -> bool {
        self.flags.contains(BufferFlags::SYSTEM)
    }

    pub fn is_modified(&self) -> bool {
        self.flags.contains(BufferFlags::MODIFIED)
    }

    pub fn is_read_only(&self) -> bool {
        self.flags.contains(BufferFlags::READ_ONLY)
    }

    /// Name of the mode shown in the list for this buffer
    ///
    /// Log and style buffers are labelled as such; otherwise the first of the
    /// saved, default and syntax modes wins.
    pub fn primary_mode_name(&self) -> &str {
        if self.flags.contains(BufferFlags::IS_LOG) {
            "log"
        } else if self.flags.contains(BufferFlags::IS_STYLE) {
            "style"
        } else {
            self.saved_mode
                .as_deref()
                .or(self.default_mode.as_deref())
                .or(self.syntax_mode.as_deref())
                .unwrap_or("none")
        }
    }
}
