//! Input Module
//!
//! Pointer tracking for orbit/pan/dolly and click selection, and the key
//! bindings that map keys to explorer commands.

pub mod bindings;
pub mod pointer;

pub use bindings::{ExplorerAction, KeyBindings};
pub use pointer::{CLICK_THRESHOLD_PX, Click, PointerButton, PointerState};
