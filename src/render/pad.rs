//! The backing canvas behind a text widget.
//!
//! A [`Pad`] is a fixed-size character grid, larger than the viewport
//! that eventually shows it. It implements [`Surface`] with the wrapping
//! rules of a classic curses pad:
//!
//! - printable characters advance the cursor by their display width and
//!   wrap to the next row when the line is full;
//! - a newline moves to the start of the next row;
//! - UTF-8 sequences are composed byte by byte, and the cursor does not
//!   move until the final byte completes the codepoint.
//!
//! The owning widget allocates one row more than its configured maximum
//! height; content that wraps into that reserved row is how the edit
//! buffer detects overflow.

use unicode_width::UnicodeWidthChar;

use super::surface::{ScreenPos, Surface};

const TAB_STOP: u16 = 8;

/// Wide characters occupy their start cell plus this filler in the next
/// cell, so blitting can skip the shadowed column.
pub const WIDE_FILLER: char = '\0';

/// A fixed-size character grid with a write cursor.
#[derive(Debug, Clone)]
pub struct Pad {
    rows: u16,
    cols: u16,
    grid: Vec<char>,
    cursor: ScreenPos,
    pending: Vec<u8>,
}

impl Pad {
    /// Create a cleared pad of `rows` × `cols` cells.
    ///
    /// Both dimensions are forced to at least one cell.
    pub fn new(rows: u16, cols: u16) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            grid: vec![' '; usize::from(rows) * usize::from(cols)],
            cursor: ScreenPos::ORIGIN,
            pending: Vec::new(),
        }
    }

    /// Number of rows, including any reserved overflow row.
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Number of columns.
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Current cursor position.
    pub const fn cursor(&self) -> ScreenPos {
        self.cursor
    }

    /// The character stored at `(row, col)`, or a space outside the grid.
    ///
    /// The cell shadowed by a preceding wide character holds
    /// [`WIDE_FILLER`].
    pub fn char_at(&self, row: u16, col: u16) -> char {
        if row >= self.rows || col >= self.cols {
            return ' ';
        }
        self.grid[usize::from(row) * usize::from(self.cols) + usize::from(col)]
    }

    fn put(&mut self, row: u16, col: u16, ch: char) {
        if row < self.rows && col < self.cols {
            self.grid[usize::from(row) * usize::from(self.cols) + usize::from(col)] = ch;
        }
    }

    /// Advance to the next row, saturating at the bottom of the grid.
    fn newline(&mut self) {
        self.cursor.row = (self.cursor.row + 1).min(self.rows - 1);
        self.cursor.col = 0;
    }

    /// Place a decoded character at the cursor and advance by its width.
    ///
    /// Zero-width characters (combining marks) are dropped without
    /// advancing, matching how the buffer treats a non-advancing byte.
    fn place_char(&mut self, ch: char) -> ScreenPos {
        let width = match ch.width() {
            Some(w) if w > 0 => u16::try_from(w).unwrap_or(1),
            _ => return self.cursor,
        };
        if self.cursor.col + width > self.cols {
            self.newline();
        }
        self.put(self.cursor.row, self.cursor.col, ch);
        if width == 2 {
            self.put(self.cursor.row, self.cursor.col + 1, WIDE_FILLER);
        }
        self.cursor.col += width;
        if self.cursor.col >= self.cols {
            self.newline();
        }
        self.cursor
    }

    fn place_ascii(&mut self, byte: u8) -> ScreenPos {
        match byte {
            b'\n' => {
                self.newline();
                self.cursor
            }
            b'\t' => {
                let next = (self.cursor.col / TAB_STOP + 1) * TAB_STOP;
                if next >= self.cols {
                    self.newline();
                } else {
                    self.cursor.col = next;
                }
                self.cursor
            }
            _ => self.place_char(char::from(byte)),
        }
    }

    /// Expected total length of a UTF-8 sequence given its lead byte.
    const fn sequence_len(lead: u8) -> Option<usize> {
        match lead {
            0xc2..=0xdf => Some(2),
            0xe0..=0xef => Some(3),
            0xf0..=0xf4 => Some(4),
            _ => None,
        }
    }
}

impl Surface for Pad {
    fn clear(&mut self) {
        self.grid.fill(' ');
        self.cursor = ScreenPos::ORIGIN;
        self.pending.clear();
    }

    fn write_byte(&mut self, byte: u8) -> ScreenPos {
        if !self.pending.is_empty() {
            self.pending.push(byte);
            let expected = Self::sequence_len(self.pending[0]).unwrap_or(1);
            if self.pending.len() < expected {
                return self.cursor;
            }
            let ch = std::str::from_utf8(&self.pending)
                .ok()
                .and_then(|s| s.chars().next())
                .unwrap_or(char::REPLACEMENT_CHARACTER);
            self.pending.clear();
            return self.place_char(ch);
        }
        if byte < 0x80 {
            return self.place_ascii(byte);
        }
        if Self::sequence_len(byte).is_some() {
            self.pending.push(byte);
            return self.cursor;
        }
        // Stray continuation or invalid lead byte: no visual advance.
        self.cursor
    }

    fn set_cursor(&mut self, pos: ScreenPos) {
        self.cursor = ScreenPos::new(pos.row.min(self.rows - 1), pos.col.min(self.cols - 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_str(pad: &mut Pad, s: &str) -> ScreenPos {
        let mut pos = pad.cursor();
        for &b in s.as_bytes() {
            pos = pad.write_byte(b);
        }
        pos
    }

    #[test]
    fn test_ascii_advances_one_column_per_byte() {
        let mut pad = Pad::new(3, 10);
        assert_eq!(pad.write_byte(b'a'), ScreenPos::new(0, 1));
        assert_eq!(pad.write_byte(b'b'), ScreenPos::new(0, 2));
        assert_eq!(pad.char_at(0, 0), 'a');
        assert_eq!(pad.char_at(0, 1), 'b');
    }

    #[test]
    fn test_newline_moves_to_next_row() {
        let mut pad = Pad::new(3, 10);
        write_str(&mut pad, "ab");
        assert_eq!(pad.write_byte(b'\n'), ScreenPos::new(1, 0));
        assert_eq!(pad.write_byte(b'c'), ScreenPos::new(1, 1));
    }

    #[test]
    fn test_wraps_at_line_end() {
        let mut pad = Pad::new(3, 3);
        write_str(&mut pad, "ab");
        // Third byte fills the row; the cursor wraps immediately.
        assert_eq!(pad.write_byte(b'c'), ScreenPos::new(1, 0));
        assert_eq!(pad.char_at(0, 2), 'c');
    }

    #[test]
    fn test_two_byte_sequence_advances_on_final_byte() {
        let mut pad = Pad::new(3, 10);
        let bytes = "é".as_bytes();
        assert_eq!(pad.write_byte(bytes[0]), ScreenPos::new(0, 0));
        assert_eq!(pad.write_byte(bytes[1]), ScreenPos::new(0, 1));
        assert_eq!(pad.char_at(0, 0), 'é');
    }

    #[test]
    fn test_three_byte_sequence_advances_once() {
        let mut pad = Pad::new(3, 10);
        let bytes = "あ".as_bytes();
        assert_eq!(bytes.len(), 3);
        assert_eq!(pad.write_byte(bytes[0]), ScreenPos::new(0, 0));
        assert_eq!(pad.write_byte(bytes[1]), ScreenPos::new(0, 0));
        // Wide character: advances two columns when complete.
        assert_eq!(pad.write_byte(bytes[2]), ScreenPos::new(0, 2));
        assert_eq!(pad.char_at(0, 0), 'あ');
        assert_eq!(pad.char_at(0, 1), WIDE_FILLER);
    }

    #[test]
    fn test_wide_char_wraps_rather_than_splitting() {
        let mut pad = Pad::new(3, 3);
        write_str(&mut pad, "ab");
        let pos = write_str(&mut pad, "あ");
        assert_eq!(pos, ScreenPos::new(1, 2));
        assert_eq!(pad.char_at(1, 0), 'あ');
        // The cell after "ab" stays empty.
        assert_eq!(pad.char_at(0, 2), ' ');
    }

    #[test]
    fn test_tab_advances_to_next_stop() {
        let mut pad = Pad::new(3, 20);
        write_str(&mut pad, "ab");
        assert_eq!(pad.write_byte(b'\t'), ScreenPos::new(0, 8));
    }

    #[test]
    fn test_clear_resets_cursor_and_content() {
        let mut pad = Pad::new(3, 10);
        write_str(&mut pad, "abc");
        pad.clear();
        assert_eq!(pad.cursor(), ScreenPos::ORIGIN);
        assert_eq!(pad.char_at(0, 0), ' ');
    }

    #[test]
    fn test_cursor_saturates_at_bottom_row() {
        let mut pad = Pad::new(2, 4);
        for _ in 0..6 {
            pad.write_byte(b'\n');
        }
        assert_eq!(pad.cursor(), ScreenPos::new(1, 0));
    }

    #[test]
    fn test_stray_continuation_byte_does_not_advance() {
        let mut pad = Pad::new(2, 10);
        write_str(&mut pad, "a");
        assert_eq!(pad.write_byte(0xa9), ScreenPos::new(0, 1));
    }
}
