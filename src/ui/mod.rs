//! Screen drawing: one function per screen, all pure views of the model.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Paragraph;

use crate::app::model::{Model, Screen, Session};

/// Draw the whole frame for the current screen.
pub fn draw(frame: &mut Frame<'_>, model: &Model) {
    match &model.screen {
        Screen::Title { menu } => {
            heading(frame, "quizpad");
            line(frame, 2, 4, "Practice questions from a CSV file.");
            menu.draw(frame);
            hint(frame, "Up/Down select, Enter confirm, Esc quit");
        }
        Screen::OpenFile { input } => {
            heading(frame, "Open a question file");
            line(frame, 3, 4, "Path:");
            input.draw(frame);
            hint(frame, "Enter open, Esc back");
        }
        Screen::QuestionCount { file, input } => {
            heading(frame, file.title());
            line(
                frame,
                3,
                4,
                &format!(
                    "{} questions available. How many to ask? (empty = all)",
                    file.len()
                ),
            );
            line(frame, 5, 4, "Count:");
            input.draw(frame);
            hint(frame, "Enter start, Esc back");
        }
        Screen::Prepare { session, countdown } => {
            heading(frame, session.file.title());
            line(
                frame,
                4,
                4,
                &format!("{} questions. Starting in {countdown}...", session.order.len()),
            );
        }
        Screen::Question { session } => draw_question(frame, model, session),
        Screen::Finished { result, menu, .. } => {
            heading(frame, "Test finished");
            multiline(frame, 2, 4, &result.summary());
            menu.draw(frame);
            hint(frame, "Up/Down select, Enter confirm, Esc back to title");
        }
        Screen::Review { viewer, .. } => {
            heading(frame, "Review");
            viewer.draw(frame);
            hint(frame, "arrows scroll, Esc back");
        }
        Screen::Export { input, .. } => {
            heading(frame, "Export review");
            line(frame, 3, 4, "Write to:");
            input.draw(frame);
            hint(frame, "Enter write, Esc back");
        }
        Screen::History { results, menu } => {
            heading(frame, "History");
            if results.is_empty() {
                line(frame, 4, 4, "No finished tests yet.");
            } else {
                menu.draw(frame);
            }
            hint(frame, "Enter review, Esc back");
        }
        Screen::HowTo { viewer } => {
            heading(frame, "How to play");
            viewer.draw(frame);
            hint(frame, "arrows scroll, Esc back");
        }
    }
    if let Some(status) = &model.status {
        status_line(frame, status);
    }
}

fn draw_question(frame: &mut Frame<'_>, _model: &Model, session: &Session) {
    heading(
        frame,
        &format!(
            "{} — question {} of {}",
            session.file.title(),
            session.current + 1,
            session.order.len()
        ),
    );
    session.question_box.draw(frame);
    line(frame, 11, 2, "Answer:");
    session.answer_box.draw(frame);
    session.unsure_box.draw(frame);
    session.give_up_box.draw(frame);
    hint(frame, "Enter submit, F2 unsure, F3 give up, Esc abort");
    if let Some(confirm) = &session.confirm {
        line(frame, 17, 10, "Abort this test?");
        confirm.draw(frame);
    }
}

fn heading(frame: &mut Frame<'_>, text: &str) {
    let width = text_width(text);
    let area = Rect::new(2, 0, width, 1).intersection(frame.area());
    frame.render_widget(
        Paragraph::new(Span::styled(
            text.to_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        area,
    );
}

fn line(frame: &mut Frame<'_>, row: u16, col: u16, text: &str) {
    let area = Rect::new(col, row, text_width(text), 1).intersection(frame.area());
    frame.render_widget(Paragraph::new(text.to_owned()), area);
}

fn multiline(frame: &mut Frame<'_>, row: u16, col: u16, text: &str) {
    for (offset, part) in text.lines().enumerate() {
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        line(frame, row.saturating_add(offset), col, part);
    }
}

fn hint(frame: &mut Frame<'_>, text: &str) {
    let bottom = frame.area().height.saturating_sub(1);
    line(frame, bottom, 2, text);
}

fn status_line(frame: &mut Frame<'_>, text: &str) {
    let row = frame.area().height.saturating_sub(2);
    let area = Rect::new(2, row, text_width(text), 1).intersection(frame.area());
    frame.render_widget(
        Paragraph::new(Span::styled(
            text.to_owned(),
            Style::default().add_modifier(Modifier::REVERSED),
        )),
        area,
    );
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}
