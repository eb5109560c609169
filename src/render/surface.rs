//! The rendering oracle interface.
//!
//! The edit buffer never computes line wrapping or glyph widths itself.
//! It writes bytes to a [`Surface`] one at a time and records the screen
//! position the surface reports back. Everything the buffer knows about
//! visual layout comes from those reports.

/// A screen position on a rendering surface, in character cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenPos {
    /// Zero-based row.
    pub row: u16,
    /// Zero-based column.
    pub col: u16,
}

impl ScreenPos {
    /// The top-left corner.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Create a position.
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// A left-to-right, top-to-bottom rendering surface.
///
/// `write_byte` returns the cursor position *after* the byte was
/// processed. A byte that does not advance the cursor (the leading or
/// interior bytes of an incomplete UTF-8 sequence) reports the same
/// position as its predecessor; the buffer derives its boundary flags
/// from exactly that difference.
pub trait Surface {
    /// Clear the surface and home the cursor.
    fn clear(&mut self);

    /// Write one byte at the cursor and report the resulting position.
    fn write_byte(&mut self, byte: u8) -> ScreenPos;

    /// Move the cursor without writing.
    fn set_cursor(&mut self, pos: ScreenPos);
}
