//! Terminal rendering of the buffer list

pub mod buffer_list;
pub mod help;
pub mod theme;
