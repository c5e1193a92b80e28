//! Buffer list panel for terminal text editors.
//!
//! The panel keeps a snapshot of the host's open buffers, sorts and filters
//! it under user control, renders it into a read-only styled buffer and acts
//! on the selected rows (switch, kill, toggle flags). Buffers are owned by
//! the host; the panel only holds weak references that are re-validated
//! before every use.

pub mod bufed;
pub mod config;
pub mod model;

#[cfg(feature = "runtime")]
pub mod input;
#[cfg(feature = "runtime")]
pub mod view;

pub use bufed::action::BufedAction;
pub use bufed::panel::{BufferList, PanelPhase};
pub use bufed::sort::{SharedSortOrder, SortDirection, SortKey, SortMask};
pub use config::Config;
pub use model::buffer::{BufferFlags, BufferId, BufferInfo, WindowId};
pub use model::registry::{BufferRegistry, Host, RegistryError, WindowHost, WindowKind};
pub use model::workbench::Workbench;
