//! A windowed text widget: a viewport over a pad-backed edit buffer.
//!
//! The widget owns an [`EditBuffer`] and the [`Pad`] it renders into.
//! The pad is allocated one row taller than the buffer's maximum height
//! so the buffer can detect overflow; the viewport shows a
//! `height` × `width` window of it, shifted by per-axis scroll offsets.
//!
//! In writable mode keys edit the buffer and the offsets follow the
//! cursor; in read-only mode keys move the offsets directly. Keys the
//! widget does not handle are returned to the caller.

use ratatui::Frame;
use ratatui::layout::Rect;

use super::Key;
use crate::editor::EditBuffer;
use crate::render::pad::WIDE_FILLER;
use crate::render::{Pad, Surface};

/// Compute the new scroll offset for one axis.
///
/// `old` is the current offset, `cur` the cursor coordinate, `total`
/// the content extent and `size` the viewport extent, all in cells.
/// The viewport keeps a one-unit lookahead margin at its far edge so
/// the cell after the cursor stays visible, except when the content
/// ends exactly there. Degenerate viewports (one or two cells) cannot
/// afford the margin and track the cursor more tightly.
pub(crate) fn scroll(old: u16, cur: u16, total: u16, size: u16) -> u16 {
    let old = i32::from(old);
    let cur = i32::from(cur);
    let total = i32::from(total);
    let size = i32::from(size);
    let new = if size <= 1 {
        cur
    } else if size == 2 {
        if cur >= old && cur < old + 2 {
            old
        } else if cur >= old + 2 {
            cur - 1
        } else {
            cur
        }
    } else if (cur > old && cur < old + size - 1)
        || (cur == old && cur == 0)
        || (cur == old + size - 1 && cur == total - 1)
    {
        old
    } else if cur <= old {
        (cur - 1).max(0)
    } else {
        (total - size).min(cur - size + 2).max(0)
    };
    u16::try_from(new).unwrap_or(0)
}

/// A scrollable, optionally editable text window.
#[derive(Debug, Clone)]
pub struct Textbox {
    buffer: EditBuffer,
    pad: Pad,
    /// Top-left corner on screen, `(row, col)`.
    position: (u16, u16),
    height: u16,
    width: u16,
    max_height: u16,
    max_width: u16,
    writable: bool,
    multiline: bool,
    row_offset: u16,
    col_offset: u16,
}

impl Textbox {
    /// Create a widget at screen position `(row, col)` with a
    /// `height` × `width` viewport over a `max_height` × `max_width`
    /// buffer.
    pub fn new(
        position: (u16, u16),
        height: u16,
        width: u16,
        max_height: u16,
        max_width: u16,
    ) -> Self {
        let max_height = max_height.max(1);
        let max_width = max_width.max(1);
        Self {
            buffer: EditBuffer::new(max_height),
            pad: Pad::new(max_height + 1, max_width),
            position,
            height: height.clamp(1, max_height),
            width: width.clamp(1, max_width),
            max_height,
            max_width,
            writable: false,
            multiline: false,
            row_offset: 0,
            col_offset: 0,
        }
    }

    pub const fn set_writable(&mut self, writable: bool) {
        self.writable = writable;
    }

    pub const fn set_multiline(&mut self, multiline: bool) {
        self.multiline = multiline;
    }

    pub const fn is_writable(&self) -> bool {
        self.writable
    }

    /// The committed buffer content.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Replace the content. Text beyond the buffer bounds is truncated
    /// rather than rejected; the cursor ends at the end of what fits.
    pub fn set_text(&mut self, text: &str) {
        self.buffer.clear();
        for &b in text.as_bytes() {
            self.buffer.insert(b);
        }
        self.buffer.render_truncate(&mut self.pad);
        self.row_offset = 0;
        self.col_offset = 0;
        self.refresh();
    }

    /// Discard all content and reset the view to the origin.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.pad.clear();
        self.row_offset = 0;
        self.col_offset = 0;
    }

    /// Move the widget's top-left corner.
    pub const fn move_window(&mut self, position: (u16, u16)) {
        self.position = position;
    }

    /// Change the viewport size, clamped to the buffer bounds.
    pub fn resize_window(&mut self, height: u16, width: u16) {
        self.height = height.clamp(1, self.max_height);
        self.width = width.clamp(1, self.max_width);
        self.refresh();
    }

    /// Change the buffer bounds, shrinking the viewport if it no longer
    /// fits and truncating content that no longer fits the new bounds.
    pub fn resize_buffer(&mut self, max_height: u16, max_width: u16) {
        self.max_height = max_height.max(1);
        self.max_width = max_width.max(1);
        self.height = self.height.min(self.max_height);
        self.width = self.width.min(self.max_width);
        self.pad = Pad::new(self.max_height + 1, self.max_width);
        self.buffer.set_max_height(self.max_height, &mut self.pad);
        self.refresh();
    }

    /// Handle a key. Returns `None` when consumed.
    pub fn process_key(&mut self, key: Key) -> Option<Key> {
        if self.writable {
            self.process_key_writable(key)
        } else {
            self.process_key_readonly(key)
        }
    }

    fn process_key_writable(&mut self, key: Key) -> Option<Key> {
        let page = self.height.saturating_sub(1).max(1);
        match key {
            Key::Up => self.buffer.move_up(1),
            Key::Down => self.buffer.move_down(1),
            Key::PageUp => self.buffer.move_up(page),
            Key::PageDown => self.buffer.move_down(page),
            Key::Left => self.buffer.move_left(),
            Key::Right => self.buffer.move_right(),
            Key::Home => self.buffer.move_line_start(),
            Key::End => self.buffer.move_line_end(),
            Key::Backspace => {
                self.buffer.backspace();
                self.buffer.render(&mut self.pad);
            }
            Key::Delete => {
                self.buffer.delete();
                self.buffer.render(&mut self.pad);
            }
            Key::Enter if self.multiline => {
                self.buffer.insert(b'\n');
                self.buffer.render(&mut self.pad);
            }
            Key::Char(c) if !c.is_control() => {
                let mut utf8 = [0u8; 4];
                for &b in c.encode_utf8(&mut utf8).as_bytes() {
                    self.buffer.insert(b);
                }
                self.buffer.render(&mut self.pad);
            }
            other => return Some(other),
        }
        self.refresh();
        None
    }

    fn process_key_readonly(&mut self, key: Key) -> Option<Key> {
        let max_row = self.buffer.line_count().saturating_sub(self.height);
        let max_col = self.buffer.column_count().saturating_sub(self.width);
        let page = self.height.saturating_sub(1).max(1);
        match key {
            Key::Up => self.row_offset = self.row_offset.saturating_sub(1),
            Key::Down => self.row_offset = (self.row_offset + 1).min(max_row),
            Key::PageUp => self.row_offset = self.row_offset.saturating_sub(page),
            Key::PageDown => self.row_offset = (self.row_offset + page).min(max_row),
            Key::Left => self.col_offset = self.col_offset.saturating_sub(1),
            Key::Right => self.col_offset = (self.col_offset + 1).min(max_col),
            Key::Home => self.col_offset = 0,
            Key::End => self.col_offset = max_col,
            other => return Some(other),
        }
        None
    }

    /// Follow the cursor: recompute both scroll offsets.
    fn refresh(&mut self) {
        if !self.writable {
            self.row_offset = self.row_offset.min(
                self.buffer.line_count().saturating_sub(self.height),
            );
            self.col_offset = self.col_offset.min(
                self.buffer.column_count().saturating_sub(self.width),
            );
            return;
        }
        let pos = self.buffer.cursor_pos();
        self.row_offset = scroll(
            self.row_offset,
            pos.row,
            self.buffer.line_count(),
            self.height,
        );
        self.col_offset = scroll(
            self.col_offset,
            pos.col,
            self.buffer.column_count(),
            self.width,
        );
    }

    /// The cursor's on-screen position, when it falls inside the
    /// viewport of a writable widget.
    pub fn screen_cursor(&self) -> Option<(u16, u16)> {
        if !self.writable {
            return None;
        }
        let pos = self.buffer.cursor_pos();
        let row = pos.row.checked_sub(self.row_offset)?;
        let col = pos.col.checked_sub(self.col_offset)?;
        if row >= self.height || col >= self.width {
            return None;
        }
        Some((self.position.0 + row, self.position.1 + col))
    }

    /// Blit the visible window of the pad into the frame, and park the
    /// terminal cursor when writable.
    pub fn draw(&self, frame: &mut Frame<'_>) {
        let area = Rect::new(
            self.position.1,
            self.position.0,
            self.width,
            self.height,
        )
        .intersection(frame.area());
        let buf = frame.buffer_mut();
        for ry in 0..area.height {
            for rx in 0..area.width {
                let ch = self
                    .pad
                    .char_at(self.row_offset + ry, self.col_offset + rx);
                if ch == WIDE_FILLER {
                    continue;
                }
                buf[(area.x + rx, area.y + ry)].set_char(ch);
            }
        }
        if let Some((row, col)) = self.screen_cursor() {
            frame.set_cursor_position((col, row));
        }
    }

    #[cfg(test)]
    fn offsets(&self) -> (u16, u16) {
        (self.row_offset, self.col_offset)
    }

    #[cfg(test)]
    fn cursor_pos(&self) -> crate::render::ScreenPos {
        self.buffer.cursor_pos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ScreenPos;

    fn type_str(tb: &mut Textbox, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                tb.process_key(Key::Enter);
            } else {
                tb.process_key(Key::Char(c));
            }
        }
    }

    fn writable_multiline(height: u16, width: u16, maxh: u16, maxw: u16) -> Textbox {
        let mut tb = Textbox::new((0, 0), height, width, maxh, maxw);
        tb.set_writable(true);
        tb.set_multiline(true);
        tb
    }

    // ── Scroll algorithm ────────────────────────────────────────────

    #[test]
    fn test_scroll_size_one_tracks_cursor() {
        assert_eq!(scroll(0, 7, 20, 1), 7);
        assert_eq!(scroll(5, 0, 20, 1), 0);
    }

    #[test]
    fn test_scroll_size_two() {
        // In window: stay.
        assert_eq!(scroll(3, 3, 20, 2), 3);
        assert_eq!(scroll(3, 4, 20, 2), 3);
        // Past the window: cursor on the second cell.
        assert_eq!(scroll(3, 5, 20, 2), 4);
        // Before the window: cursor on the first cell.
        assert_eq!(scroll(3, 1, 20, 2), 1);
    }

    #[test]
    fn test_scroll_stays_when_inside_with_margin() {
        // size 5, window [3,8): interior cells 4..6 keep the offset.
        assert_eq!(scroll(3, 4, 20, 5), 3);
        assert_eq!(scroll(3, 6, 20, 5), 3);
    }

    #[test]
    fn test_scroll_at_origin_stays() {
        assert_eq!(scroll(0, 0, 20, 5), 0);
    }

    #[test]
    fn test_scroll_margin_cell_allowed_at_content_end() {
        // Cursor on the last viewport cell is fine when the content
        // ends there too.
        assert_eq!(scroll(3, 7, 8, 5), 3);
    }

    #[test]
    fn test_scroll_backward_leaves_one_behind() {
        // Cursor at or before the offset: show one cell of context.
        assert_eq!(scroll(5, 5, 20, 4), 4);
        assert_eq!(scroll(5, 2, 20, 4), 1);
        assert_eq!(scroll(5, 0, 20, 4), 0);
    }

    #[test]
    fn test_scroll_forward_keeps_lookahead_margin() {
        // size 5, cursor lands on/past the margin cell: shift so one
        // cell of lookahead remains, clamped to the content end.
        assert_eq!(scroll(3, 7, 20, 5), 4);
        assert_eq!(scroll(3, 12, 20, 5), 9);
        assert_eq!(scroll(3, 19, 20, 5), 15);
    }

    #[test]
    fn test_scroll_forward_clamps_to_content_end() {
        assert_eq!(scroll(0, 9, 10, 5), 5);
    }

    // ── Writable behavior ───────────────────────────────────────────

    #[test]
    fn test_typing_appears_in_text() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        type_str(&mut tb, "hi\nthere");
        assert_eq!(tb.text(), "hi\nthere");
    }

    #[test]
    fn test_enter_ignored_when_single_line() {
        let mut tb = Textbox::new((0, 0), 1, 10, 1, 20);
        tb.set_writable(true);
        type_str(&mut tb, "ab");
        assert_eq!(tb.process_key(Key::Enter), Some(Key::Enter));
        assert_eq!(tb.text(), "ab");
    }

    #[test]
    fn test_backspace_edits_buffer() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        type_str(&mut tb, "abc");
        tb.process_key(Key::Backspace);
        assert_eq!(tb.text(), "ab");
    }

    #[test]
    fn test_unicode_char_inserted_whole() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        type_str(&mut tb, "é");
        assert_eq!(tb.text(), "é");
        tb.process_key(Key::Backspace);
        assert_eq!(tb.text(), "");
    }

    #[test]
    fn test_tab_and_esc_are_returned() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        assert_eq!(tb.process_key(Key::Tab), Some(Key::Tab));
        assert_eq!(tb.process_key(Key::Esc), Some(Key::Esc));
    }

    #[test]
    fn test_control_char_is_returned() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        assert_eq!(tb.process_key(Key::Char('\u{1}')), Some(Key::Char('\u{1}')));
    }

    #[test]
    fn test_overflowing_keystroke_is_dropped() {
        let mut tb = writable_multiline(2, 4, 2, 4);
        type_str(&mut tb, "ab\ncd");
        // A third line is rejected, but 'e' still fits on row 1.
        type_str(&mut tb, "\ne");
        assert_eq!(tb.text(), "ab\ncde");
        // Row 1 is now full: the next byte would wrap past the bound.
        type_str(&mut tb, "f");
        assert_eq!(tb.text(), "ab\ncde");
    }

    #[test]
    fn test_viewport_follows_cursor_down() {
        let mut tb = writable_multiline(3, 10, 10, 20);
        type_str(&mut tb, "a\nb\nc\nd\ne");
        // Cursor on row 4 of 5; a 3-row viewport must scroll.
        assert_eq!(tb.cursor_pos().row, 4);
        let (row_offset, _) = tb.offsets();
        assert!(row_offset >= 2);
        assert!(row_offset <= 4);
    }

    #[test]
    fn test_viewport_follows_cursor_back_up() {
        let mut tb = writable_multiline(3, 10, 10, 20);
        type_str(&mut tb, "a\nb\nc\nd\ne");
        for _ in 0..4 {
            tb.process_key(Key::Up);
        }
        assert_eq!(tb.cursor_pos().row, 0);
        assert_eq!(tb.offsets().0, 0);
    }

    #[test]
    fn test_page_keys_move_by_viewport_height() {
        let mut tb = writable_multiline(3, 10, 10, 20);
        type_str(&mut tb, "a\nb\nc\nd\ne");
        tb.process_key(Key::PageUp);
        assert_eq!(tb.cursor_pos().row, 2);
        tb.process_key(Key::PageDown);
        assert_eq!(tb.cursor_pos().row, 4);
    }

    #[test]
    fn test_home_and_end_move_within_line() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        type_str(&mut tb, "hello");
        tb.process_key(Key::Home);
        assert_eq!(tb.cursor_pos(), ScreenPos::ORIGIN);
        tb.process_key(Key::End);
        assert_eq!(tb.cursor_pos().col, 5);
    }

    #[test]
    fn test_set_text_truncates_to_buffer() {
        let mut tb = Textbox::new((0, 0), 2, 4, 2, 4);
        tb.set_text("ab\ncd\nef");
        assert_eq!(tb.text(), "ab\ncd");
    }

    #[test]
    fn test_clear_empties_widget() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        type_str(&mut tb, "abc");
        tb.clear();
        assert!(tb.is_empty());
        assert_eq!(tb.offsets(), (0, 0));
    }

    #[test]
    fn test_resize_buffer_truncates_content() {
        let mut tb = writable_multiline(3, 10, 5, 20);
        type_str(&mut tb, "a\nb\nc\nd");
        tb.resize_buffer(2, 20);
        assert_eq!(tb.text(), "a\nb");
    }

    #[test]
    fn test_screen_cursor_offsets_by_position_and_scroll() {
        let mut tb = Textbox::new((5, 2), 3, 10, 5, 20);
        tb.set_writable(true);
        tb.set_multiline(true);
        type_str(&mut tb, "ab");
        assert_eq!(tb.screen_cursor(), Some((5, 4)));
        tb.move_window((7, 0));
        assert_eq!(tb.screen_cursor(), Some((7, 2)));
    }

    #[test]
    fn test_screen_cursor_hidden_when_readonly() {
        let mut tb = Textbox::new((0, 0), 3, 10, 5, 20);
        tb.set_text("ab");
        assert_eq!(tb.screen_cursor(), None);
    }

    // ── Read-only behavior ──────────────────────────────────────────

    #[test]
    fn test_readonly_down_clamps_to_extent() {
        let mut tb = Textbox::new((0, 0), 2, 10, 10, 20);
        tb.set_text("a\nb\nc\nd\ne");
        for _ in 0..10 {
            tb.process_key(Key::Down);
        }
        // 5 lines in a 2-row viewport: offsets stop at 3.
        assert_eq!(tb.offsets().0, 3);
        tb.process_key(Key::Up);
        assert_eq!(tb.offsets().0, 2);
    }

    #[test]
    fn test_readonly_end_shows_rightmost_columns() {
        let mut tb = Textbox::new((0, 0), 2, 4, 5, 20);
        tb.set_text("abcdefghij");
        tb.process_key(Key::End);
        // The column extent includes the cursor rest column: 11 columns
        // in a 4-column viewport.
        assert_eq!(tb.offsets().1, 7);
        tb.process_key(Key::Home);
        assert_eq!(tb.offsets().1, 0);
    }

    #[test]
    fn test_readonly_page_keys() {
        let mut tb = Textbox::new((0, 0), 3, 10, 20, 20);
        tb.set_text("a\nb\nc\nd\ne\nf\ng\nh");
        tb.process_key(Key::PageDown);
        assert_eq!(tb.offsets().0, 2);
        tb.process_key(Key::PageUp);
        assert_eq!(tb.offsets().0, 0);
    }

    #[test]
    fn test_readonly_editing_keys_are_returned() {
        let mut tb = Textbox::new((0, 0), 3, 10, 5, 20);
        tb.set_text("abc");
        assert_eq!(tb.process_key(Key::Char('x')), Some(Key::Char('x')));
        assert_eq!(tb.process_key(Key::Backspace), Some(Key::Backspace));
        assert_eq!(tb.text(), "abc");
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn scroll_keeps_cursor_inside_viewport(
                old in 0u16..30,
                cur in 0u16..30,
                size in 1u16..12,
            ) {
                let total = 30u16;
                let new = scroll(old, cur, total, size);
                prop_assert!(new <= cur);
                prop_assert!(cur < new + size);
            }

            #[test]
            fn scroll_never_exceeds_content(
                old in 0u16..30,
                cur in 0u16..30,
                size in 3u16..12,
            ) {
                let total = 30u16;
                let new = scroll(old, cur, total, size);
                prop_assert!(i32::from(new) <= i32::from(total));
            }
        }
    }
}
