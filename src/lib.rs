//! quizpad: a terminal Q&A practice app built on a UTF-8-aware pad
//! editor.
//!
//! The crate is layered bottom-up:
//!
//! - [`render`]: the rendering oracle — a wrapping character pad the
//!   edit buffer writes through, byte by byte
//! - [`editor`]: the edit buffer with coalescing single-level undo
//! - [`widget`]: textbox, menu, checkbox and button widgets
//! - [`quiz`]: question files, scoring and result history
//! - [`app`] / [`ui`]: the screen state machine and its views

pub mod app;
pub mod editor;
pub mod quiz;
pub mod render;
pub mod ui;
pub mod widget;
