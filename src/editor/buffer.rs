//! The edit buffer: a byte sequence with one cursor, a single-slot
//! coalescing undo journal, and render-derived navigation metadata.
//!
//! The buffer stores one [`Cell`] per byte. It never inspects UTF-8
//! structure to decide where a character visually sits; it writes each
//! byte to a [`Surface`] and records the position the surface reports.
//! The only byte-level rule it applies is the continuation test
//! (high two bits `10`) used to delete whole sequences at once.
//!
//! After any edit the buffer is *dirty*: recorded positions are stale
//! until the next render, so navigation becomes a no-op and position
//! queries report zeros. A render (strict or truncating) commits the
//! pending batch and clears the dirty state; [`EditBuffer::undo`]
//! instead reverses the whole batch in one step.

use crate::render::{ScreenPos, Surface};

/// One stored byte plus the screen metadata from its last render.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    /// The raw content byte.
    pub byte: u8,
    /// Where the rendering surface's cursor stood after this byte.
    pub pos: ScreenPos,
    /// Whether this byte advanced the surface cursor. The final byte of
    /// a multi-byte sequence is the boundary cell; its lead and interior
    /// bytes are not.
    pub boundary: bool,
}

impl Cell {
    const fn new(byte: u8) -> Self {
        Self {
            byte,
            pos: ScreenPos::ORIGIN,
            boundary: false,
        }
    }
}

/// True for bytes that can never start a UTF-8 sequence.
const fn is_continuation(byte: u8) -> bool {
    byte & 0xc0 == 0x80
}

/// The pending-edit journal.
///
/// While a batch is open, `cells[start..cursor]` are exactly the bytes
/// inserted since the last commit, and `held` are the bytes removed
/// since then, to be reinserted at `start` on undo. `held_cursor` is the
/// pre-batch cursor position as an offset into `held`.
#[derive(Debug, Clone)]
struct Journal {
    start: usize,
    held: Vec<Cell>,
    held_cursor: usize,
}

/// An editable byte buffer with one gap cursor.
#[derive(Debug, Clone)]
pub struct EditBuffer {
    cells: Vec<Cell>,
    /// Gap index in `0..=cells.len()`.
    cursor: usize,
    journal: Option<Journal>,
    max_height: u16,
    max_col: u16,
}

impl EditBuffer {
    /// Create an empty buffer that overflows at `max_height` rows.
    pub fn new(max_height: u16) -> Self {
        Self {
            cells: Vec::new(),
            cursor: 0,
            journal: None,
            max_height: max_height.max(1),
            max_col: 0,
        }
    }

    /// Number of stored bytes.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether an edit batch is pending (positions are stale).
    pub const fn is_dirty(&self) -> bool {
        self.journal.is_some()
    }

    /// The committed content as raw bytes.
    pub fn bytes(&self) -> Vec<u8> {
        self.cells.iter().map(|c| c.byte).collect()
    }

    /// The committed content as text (invalid sequences replaced).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes()).into_owned()
    }

    /// The screen position of the cursor, or the origin while dirty or
    /// at the buffer start.
    pub fn cursor_pos(&self) -> ScreenPos {
        if self.is_dirty() || self.cursor == 0 {
            return ScreenPos::ORIGIN;
        }
        self.cells[self.cursor - 1].pos
    }

    /// Total visual lines occupied, or zero while dirty or empty.
    pub fn line_count(&self) -> u16 {
        if self.is_dirty() {
            return 0;
        }
        self.cells.last().map_or(0, |c| c.pos.row + 1)
    }

    /// Widest visual column reached, or zero while dirty or empty.
    pub fn column_count(&self) -> u16 {
        if self.is_dirty() || self.cells.is_empty() {
            return 0;
        }
        self.max_col + 1
    }

    // ── Navigation ──────────────────────────────────────────────────
    //
    // All moves are no-ops while dirty: the recorded positions no
    // longer describe the content.

    /// Move to the nearest boundary on the visual line `n` rows up,
    /// preferring the rightmost column not past the current one.
    /// Clamps to the buffer start on the first line.
    pub fn move_up(&mut self, n: u16) {
        if self.is_dirty() || n == 0 {
            return;
        }
        let pos = self.cursor_pos();
        if pos.row < n {
            self.cursor = 0;
            return;
        }
        let target = pos.row - n;
        let mut prv = self.cursor - 1;
        while self.cells[prv].pos.row > target {
            self.cursor = prv;
            if prv == 0 {
                return;
            }
            prv -= 1;
        }
        while prv > 0
            && self.cells[prv].pos.row == target
            && (!self.cells[prv].boundary || self.cells[prv].pos.col > pos.col)
        {
            self.cursor = prv;
            prv -= 1;
        }
        if !self.cells[prv].boundary {
            self.cursor = 0;
        }
    }

    /// Move to the first boundary at or past the current column on the
    /// visual line `n` rows down. Clamps to the buffer end on the last
    /// line.
    pub fn move_down(&mut self, n: u16) {
        if self.is_dirty() {
            return;
        }
        let pos = self.cursor_pos();
        if pos.row + n >= self.line_count() {
            self.cursor = self.cells.len();
            return;
        }
        let target = pos.row + n;
        let len = self.cells.len();
        while self.cursor < len && self.cells[self.cursor].pos.row < target {
            self.cursor += 1;
        }
        while self.cursor < len
            && self.cells[self.cursor].pos.row == target
            && self.cells[self.cursor].pos.col < pos.col
        {
            self.cursor += 1;
        }
        if self.cursor < len && self.cells[self.cursor].pos.row == target {
            self.cursor += 1;
        }
    }

    /// Step left across one whole boundary unit.
    pub fn move_left(&mut self) {
        if self.is_dirty() || self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        if self.cursor == 0 {
            return;
        }
        let mut prv = self.cursor - 1;
        while prv > 0 && !self.cells[prv].boundary {
            self.cursor = prv;
            prv -= 1;
        }
        if !self.cells[prv].boundary {
            self.cursor = 0;
        }
    }

    /// Step right across one whole boundary unit.
    pub fn move_right(&mut self) {
        if self.is_dirty() || self.cursor == self.cells.len() {
            return;
        }
        while !self.cells[self.cursor].boundary {
            self.cursor += 1;
            if self.cursor == self.cells.len() {
                return;
            }
        }
        self.cursor += 1;
    }

    /// Move back to just after the previous newline byte, or to the
    /// buffer start.
    pub fn move_line_start(&mut self) {
        if self.is_dirty() || self.cursor == 0 {
            return;
        }
        let mut prv = self.cursor - 1;
        while prv > 0 && self.cells[prv].byte != b'\n' {
            self.cursor = prv;
            prv -= 1;
        }
        if self.cells[prv].byte != b'\n' {
            self.cursor = 0;
        }
    }

    /// Move forward to the next newline byte, or to the buffer end.
    pub fn move_line_end(&mut self) {
        if self.is_dirty() {
            return;
        }
        while self.cursor < self.cells.len() && self.cells[self.cursor].byte != b'\n' {
            self.cursor += 1;
        }
    }

    // ── Editing ─────────────────────────────────────────────────────

    /// Insert one byte at the cursor, opening a batch if none is
    /// pending. Multi-byte sequences are inserted byte by byte so the
    /// surface can be consulted after each one.
    pub fn insert(&mut self, byte: u8) {
        self.cells.insert(self.cursor, Cell::new(byte));
        if self.journal.is_none() {
            self.journal = Some(Journal {
                start: self.cursor,
                held: Vec::new(),
                held_cursor: 0,
            });
        }
        self.cursor += 1;
    }

    /// Remove the run of bytes ending at the cursor, extended backward
    /// over continuation bytes so a whole codepoint disappears at once.
    /// The run joins the pending batch.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut start = self.cursor - 1;
        if let Some(journal) = self.journal.as_mut() {
            let mut touches = start == journal.start || self.cursor == journal.start;
            while start > 0 && is_continuation(self.cells[start].byte) {
                start -= 1;
                if start == journal.start {
                    touches = true;
                }
            }
            if touches {
                // start <= journal.start <= cursor: the leading part of
                // the run predates the batch and must be preserved; the
                // rest are batch-inserted bytes that simply vanish.
                let pre = journal.start - start;
                let mut removed: Vec<Cell> = self.cells.drain(start..self.cursor).collect();
                removed.truncate(pre);
                removed.append(&mut journal.held);
                journal.held = removed;
                journal.held_cursor += pre;
                journal.start = start;
            } else {
                // Entirely within the batch-inserted span.
                self.cells.drain(start..self.cursor);
            }
        } else {
            while start > 0 && is_continuation(self.cells[start].byte) {
                start -= 1;
            }
            let held: Vec<Cell> = self.cells.drain(start..self.cursor).collect();
            self.journal = Some(Journal {
                start,
                held_cursor: held.len(),
                held,
            });
        }
        self.cursor = start;
    }

    /// Remove the run of bytes starting after the cursor, extended
    /// forward over continuation bytes. The run joins the pending batch.
    pub fn delete(&mut self) {
        if self.cursor == self.cells.len() {
            return;
        }
        let mut end = self.cursor + 1;
        while end < self.cells.len() && is_continuation(self.cells[end].byte) {
            end += 1;
        }
        let removed: Vec<Cell> = self.cells.drain(self.cursor..end).collect();
        match self.journal.as_mut() {
            Some(journal) => journal.held.extend(removed),
            None => {
                self.journal = Some(Journal {
                    start: self.cursor,
                    held_cursor: 0,
                    held: removed,
                });
            }
        }
    }

    /// Reverse the entire pending batch: drop the bytes it inserted,
    /// reinsert the bytes it removed, and restore the pre-batch cursor.
    /// No-op when clean.
    pub fn undo(&mut self) {
        let Some(journal) = self.journal.take() else {
            return;
        };
        self.cells.drain(journal.start..self.cursor);
        let held_len = journal.held.len();
        self.cells
            .splice(journal.start..journal.start, journal.held);
        self.cursor = if held_len == 0 {
            journal.start
        } else {
            journal.start + journal.held_cursor
        };
    }

    /// Discard all content and any pending batch.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.cursor = 0;
        self.journal = None;
        self.max_col = 0;
    }

    /// Change the overflow bound and re-render in truncating mode.
    pub fn set_max_height(&mut self, max_height: u16, surface: &mut dyn Surface) {
        self.max_height = max_height.max(1);
        self.render_truncate(surface);
    }

    // ── Rendering ───────────────────────────────────────────────────

    /// Write every byte to the surface and record positions. Returns
    /// the index of the first cell reported at or past the overflow
    /// row, if any.
    fn render_pass(&mut self, surface: &mut dyn Surface) -> Option<usize> {
        self.max_col = 0;
        surface.clear();
        let mut prev = ScreenPos::ORIGIN;
        for i in 0..self.cells.len() {
            let pos = surface.write_byte(self.cells[i].byte);
            self.cells[i].pos = pos;
            if pos.row >= self.max_height {
                return Some(i);
            }
            if pos.col > self.max_col {
                self.max_col = pos.col;
            }
            self.cells[i].boundary = pos != prev;
            prev = pos;
        }
        None
    }

    /// Strict render: on overflow the pending batch is undone and the
    /// previous committed content re-rendered, so the offending edit
    /// never becomes observable. Commits (clears) the journal.
    pub fn render(&mut self, surface: &mut dyn Surface) {
        if self.render_pass(surface).is_some() {
            self.undo();
            self.render_pass(surface);
        }
        self.journal = None;
        surface.set_cursor(self.committed_cursor_pos());
    }

    /// Truncating render: on overflow the content is cut at the first
    /// offending cell, walked back so no partial codepoint remains, and
    /// re-rendered; a cursor inside the removed tail moves to the new
    /// end. Commits (clears) the journal.
    pub fn render_truncate(&mut self, surface: &mut dyn Surface) {
        if let Some(mut cut) = self.render_pass(surface) {
            while cut > 0 && is_continuation(self.cells[cut].byte) {
                cut -= 1;
            }
            self.cells.truncate(cut);
            if self.cursor > cut {
                self.cursor = cut;
            }
            self.render_pass(surface);
        }
        self.journal = None;
        surface.set_cursor(self.committed_cursor_pos());
    }

    /// Cursor position ignoring the dirty flag, for use at the end of a
    /// render when the journal is about to be committed.
    fn committed_cursor_pos(&self) -> ScreenPos {
        if self.cursor == 0 {
            ScreenPos::ORIGIN
        } else {
            self.cells[self.cursor - 1].pos
        }
    }
}
