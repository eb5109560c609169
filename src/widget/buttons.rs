//! A spatial button group.
//!
//! Each button names the index of its neighbour in every direction, so
//! arrow keys walk an arbitrary layout. A button pointing at itself has
//! no neighbour on that side.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use super::Key;

/// One labelled button with its screen position and neighbour links.
#[derive(Debug, Clone)]
pub struct Button {
    pub label: String,
    /// Top-left corner on screen, `(row, col)`.
    pub position: (u16, u16),
    pub left: usize,
    pub right: usize,
    pub up: usize,
    pub down: usize,
}

impl Button {
    pub fn new(
        label: impl Into<String>,
        position: (u16, u16),
        left: usize,
        right: usize,
        up: usize,
        down: usize,
    ) -> Self {
        Self {
            label: label.into(),
            position,
            left,
            right,
            up,
            down,
        }
    }
}

/// A set of buttons with one focused member.
#[derive(Debug, Clone)]
pub struct ButtonGroup {
    buttons: Vec<Button>,
    focused: usize,
}

impl ButtonGroup {
    pub fn new(buttons: Vec<Button>) -> Self {
        Self {
            buttons,
            focused: 0,
        }
    }

    /// Index of the focused button.
    pub const fn focused(&self) -> usize {
        self.focused
    }

    pub fn focus(&mut self, index: usize) {
        self.focused = index.min(self.buttons.len().saturating_sub(1));
    }

    /// Handle a key: arrows move focus, everything else is returned
    /// (activation is the caller's business, via [`Self::focused`]).
    pub fn process_key(&mut self, key: Key) -> Option<Key> {
        let Some(button) = self.buttons.get(self.focused) else {
            return Some(key);
        };
        self.focused = match key {
            Key::Left => button.left,
            Key::Right => button.right,
            Key::Up => button.up,
            Key::Down => button.down,
            other => return Some(other),
        };
        None
    }

    pub fn draw(&self, frame: &mut Frame<'_>) {
        for (index, button) in self.buttons.iter().enumerate() {
            let text = format!("< {} >", button.label);
            let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
            let area = Rect::new(button.position.1, button.position.0, width, 1)
                .intersection(frame.area());
            let style = if index == self.focused {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
        }
    }
}
