//! Terminal setup and the blocking event loop.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;
use tracing::debug;

use super::{Message, Model, input, update};
use crate::ui;

/// Cadence of [`Message::Tick`], which drives the pre-test countdown.
const TICK: Duration = Duration::from_millis(700);

/// Run the application until the model stops it.
pub fn run(model: &mut Model) -> Result<()> {
    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, model);
    ratatui::restore();
    result
}

fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
    debug!("entering event loop");
    let mut last_tick = Instant::now();
    while model.running {
        terminal
            .draw(|frame| ui::draw(frame, model))
            .context("failed to draw frame")?;

        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).context("failed to poll for terminal events")? {
            let event = event::read().context("failed to read terminal event")?;
            if let Some(message) = input::map_event(&event) {
                update::update(model, message);
            }
        }
        if last_tick.elapsed() >= TICK {
            update::update(model, Message::Tick);
            last_tick = Instant::now();
        }
    }
    debug!("leaving event loop");
    Ok(())
}
