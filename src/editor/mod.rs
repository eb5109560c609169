//! Text editing primitives.

pub mod buffer;

pub use buffer::EditBuffer;
