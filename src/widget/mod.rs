//! Interactive terminal widgets.
//!
//! Every widget exposes `process_key(key) -> Option<Key>`: `None` means
//! the key was consumed, `Some(key)` hands it back to the caller for
//! screen-level dispatch (focus moves, confirmations, quitting).

pub mod buttons;
pub mod checkbox;
pub mod menu;
pub mod textbox;

pub use buttons::{Button, ButtonGroup};
pub use checkbox::Checkbox;
pub use menu::Menu;
pub use textbox::Textbox;

/// A key event, decoupled from the terminal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Backspace,
    Delete,
    Enter,
    Esc,
    Tab,
    /// Function key (`F(2)` is F2).
    F(u8),
    Char(char),
}
