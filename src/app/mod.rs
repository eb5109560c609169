//! The application: model, messages, update loop and input mapping.

pub mod event_loop;
pub mod input;
pub mod model;
pub mod update;


pub use event_loop::run;
pub use model::{Model, Screen};
pub use update::update;

use crate::widget::Key;

/// Everything that can happen to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Key(Key),
    /// Periodic timer, used by the pre-test countdown.
    Tick,
    /// Terminal resized to `(cols, rows)`.
    Resize(u16, u16),
    Quit,
}
