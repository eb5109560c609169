//! A toggle checkbox bound to one key.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;

use super::Key;

/// An on/off marker toggled by a dedicated key.
#[derive(Debug, Clone)]
pub struct Checkbox {
    label: String,
    /// Top-left corner on screen, `(row, col)`.
    position: (u16, u16),
    toggle_key: Key,
    checked: bool,
}

impl Checkbox {
    pub fn new(position: (u16, u16), label: impl Into<String>, toggle_key: Key) -> Self {
        Self {
            label: label.into(),
            position,
            toggle_key,
            checked: false,
        }
    }

    pub const fn is_checked(&self) -> bool {
        self.checked
    }

    pub const fn set_checked(&mut self, checked: bool) {
        self.checked = checked;
    }

    /// Handle a key: the bound key toggles, everything else is returned.
    pub fn process_key(&mut self, key: Key) -> Option<Key> {
        if key == self.toggle_key {
            self.checked = !self.checked;
            None
        } else {
            Some(key)
        }
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        let text = format!("{mark} {}", self.label);
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
        let area =
            Rect::new(self.position.1, self.position.0, width, 1).intersection(frame.area());
        frame.render_widget(Paragraph::new(text), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_key_toggles() {
        let mut cb = Checkbox::new((0, 0), "unsure", Key::Char('u'));
        assert!(!cb.is_checked());
        assert_eq!(cb.process_key(Key::Char('u')), None);
        assert!(cb.is_checked());
        assert_eq!(cb.process_key(Key::Char('u')), None);
        assert!(!cb.is_checked());
    }

    #[test]
    fn test_other_keys_are_returned() {
        let mut cb = Checkbox::new((0, 0), "unsure", Key::Char('u'));
        assert_eq!(cb.process_key(Key::Char('x')), Some(Key::Char('x')));
        assert_eq!(cb.process_key(Key::Enter), Some(Key::Enter));
        assert!(!cb.is_checked());
    }
}
