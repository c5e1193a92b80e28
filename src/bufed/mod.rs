//! The buffer list panel: rows, ordering, rebuilding and commands

pub mod action;
pub mod builder;
pub mod item;
pub mod panel;
pub mod sort;
pub mod state;
