//! Core data model
//!
//! Buffer handles as the host exposes them, the registry and window
//! interfaces the panel consumes, weak references into the registry, the
//! styled render buffer and an in-memory host used by the binary and tests.

pub mod buffer;
pub mod collate;
pub mod registry;
pub mod text_buffer;
pub mod weak_ref;
pub mod workbench;
