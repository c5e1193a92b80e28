//! Keyboard input for the buffer list

pub mod keymap;
