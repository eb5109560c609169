//! Rendering surfaces.
//!
//! - [`surface`]: the oracle interface the edit buffer writes through
//! - [`pad`]: the concrete wrapping canvas backing each text widget

pub mod pad;
pub mod surface;

pub use pad::Pad;
pub use surface::{ScreenPos, Surface};
