//! A single-choice scrolling menu.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use super::Key;
use super::textbox::scroll;

/// A vertical list with one highlighted entry.
#[derive(Debug, Clone)]
pub struct Menu {
    items: Vec<String>,
    /// Top-left corner on screen, `(row, col)`.
    position: (u16, u16),
    height: u16,
    width: u16,
    selected: usize,
    offset: u16,
}

impl Menu {
    pub fn new(position: (u16, u16), height: u16, width: u16, items: Vec<String>) -> Self {
        Self {
            items,
            position,
            height: height.max(1),
            width: width.max(1),
            selected: 0,
            offset: 0,
        }
    }

    /// Index of the highlighted entry.
    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn select(&mut self, index: usize) {
        self.selected = index.min(self.items.len().saturating_sub(1));
        self.follow();
    }

    /// Handle a key. Returns `None` when consumed.
    pub fn process_key(&mut self, key: Key) -> Option<Key> {
        if self.items.is_empty() {
            return Some(key);
        }
        let page = usize::from(self.height.saturating_sub(1).max(1));
        let last = self.items.len() - 1;
        match key {
            Key::Up => self.selected = self.selected.saturating_sub(1),
            Key::Down => self.selected = (self.selected + 1).min(last),
            Key::PageUp => self.selected = self.selected.saturating_sub(page),
            Key::PageDown => self.selected = (self.selected + page).min(last),
            Key::Home => self.selected = 0,
            Key::End => self.selected = last,
            other => return Some(other),
        }
        self.follow();
        None
    }

    /// Keep the highlighted entry inside the visible window.
    fn follow(&mut self) {
        let cur = u16::try_from(self.selected).unwrap_or(u16::MAX);
        let total = u16::try_from(self.items.len()).unwrap_or(u16::MAX);
        self.offset = scroll(self.offset, cur, total, self.height);
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        for (slot, index) in (usize::from(self.offset)..self.items.len())
            .take(usize::from(self.height))
            .enumerate()
        {
            let area = Rect::new(
                self.position.1,
                self.position.0 + u16::try_from(slot).unwrap_or(0),
                self.width,
                1,
            )
            .intersection(frame.area());
            let style = if index == self.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            frame.render_widget(
                Paragraph::new(Span::styled(self.items[index].as_str(), style)),
                area,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu(n: usize, height: u16) -> Menu {
        let items = (0..n).map(|i| format!("item {i}")).collect();
        Menu::new((0, 0), height, 10, items)
    }

    #[test]
    fn test_up_down_moves_selection() {
        let mut m = menu(5, 3);
        assert_eq!(m.selected(), 0);
        m.process_key(Key::Down);
        m.process_key(Key::Down);
        assert_eq!(m.selected(), 2);
        m.process_key(Key::Up);
        assert_eq!(m.selected(), 1);
    }

    #[test]
    fn test_selection_clamps_at_ends() {
        let mut m = menu(3, 3);
        m.process_key(Key::Up);
        assert_eq!(m.selected(), 0);
        for _ in 0..5 {
            m.process_key(Key::Down);
        }
        assert_eq!(m.selected(), 2);
    }

    #[test]
    fn test_page_keys_jump() {
        let mut m = menu(10, 4);
        m.process_key(Key::PageDown);
        assert_eq!(m.selected(), 3);
        m.process_key(Key::PageUp);
        assert_eq!(m.selected(), 0);
        m.process_key(Key::End);
        assert_eq!(m.selected(), 9);
        m.process_key(Key::Home);
        assert_eq!(m.selected(), 0);
    }

    #[test]
    fn test_window_follows_selection() {
        let mut m = menu(10, 3);
        for _ in 0..9 {
            m.process_key(Key::Down);
        }
        assert_eq!(m.selected(), 9);
        // Selection must be inside [offset, offset + height).
        assert!(u16::try_from(m.selected()).unwrap() >= m.offset);
        assert!(u16::try_from(m.selected()).unwrap() < m.offset + 3);
    }

    #[test]
    fn test_unhandled_keys_are_returned() {
        let mut m = menu(3, 3);
        assert_eq!(m.process_key(Key::Enter), Some(Key::Enter));
        assert_eq!(m.process_key(Key::Esc), Some(Key::Esc));
        assert_eq!(m.process_key(Key::Char('a')), Some(Key::Char('a')));
    }

    #[test]
    fn test_empty_menu_consumes_nothing() {
        let mut m = menu(0, 3);
        assert_eq!(m.process_key(Key::Down), Some(Key::Down));
    }
}
