//! The state machine: one `update` call per message.

use std::path::Path;
use std::time::Instant;

use chrono::Local;
use tracing::debug;

use super::Message;
use super::model::{
    FinishedAction, GIVE_UP_KEY, Model, Screen, Session, TITLE_ITEMS, UNSURE_KEY,
};
use crate::quiz::history;
use crate::quiz::{QuestionFile, TestResult, WrongAnswer};
use crate::widget::Key;

pub fn update(model: &mut Model, message: Message) {
    match message {
        Message::Quit => model.running = false,
        Message::Tick => on_tick(model),
        Message::Resize(cols, rows) => on_resize(model, cols, rows),
        Message::Key(key) => on_key(model, key),
    }
}

fn on_tick(model: &mut Model) {
    if !matches!(model.screen, Screen::Prepare { .. }) {
        return;
    }
    let Screen::Prepare {
        mut session,
        countdown,
    } = std::mem::replace(&mut model.screen, Screen::title())
    else {
        return;
    };
    let countdown = countdown.saturating_sub(1);
    model.screen = if countdown == 0 {
        session.started_at = Instant::now();
        Screen::Question { session }
    } else {
        Screen::Prepare { session, countdown }
    };
}

fn on_resize(model: &mut Model, cols: u16, rows: u16) {
    let body_rows = rows.saturating_sub(6);
    let body_cols = cols.saturating_sub(4);
    match &mut model.screen {
        Screen::Question { session } => {
            session.question_box.resize_window(body_rows.min(8), body_cols);
            session.answer_box.resize_window(1, body_cols);
        }
        Screen::Review { viewer, .. } | Screen::HowTo { viewer } => {
            viewer.resize_window(body_rows, body_cols);
        }
        _ => {}
    }
}

fn on_key(model: &mut Model, key: Key) {
    // Status messages are transient: any key clears the previous one.
    model.status = None;
    let screen = std::mem::replace(&mut model.screen, Screen::title());
    model.screen = match screen {
        Screen::Title { menu } => title_key(model, menu, key),
        Screen::OpenFile { input } => open_file_key(model, input, key),
        Screen::QuestionCount { file, input } => question_count_key(model, file, input, key),
        Screen::Prepare { session, countdown } => prepare_key(session, countdown, key),
        Screen::Question { session } => question_key(model, session, key),
        Screen::Finished {
            file,
            result,
            actions,
            menu,
        } => finished_key(model, file, result, actions, menu, key),
        Screen::Review {
            file,
            result,
            viewer,
        } => review_key(file, result, viewer, key),
        Screen::Export {
            file,
            result,
            input,
        } => export_key(model, file, result, input, key),
        Screen::History { results, menu } => history_key(model, results, menu, key),
        Screen::HowTo { viewer } => how_to_key(viewer, key),
    };
}

fn title_key(model: &mut Model, mut menu: crate::widget::Menu, key: Key) -> Screen {
    match menu.process_key(key) {
        None => Screen::Title { menu },
        Some(Key::Enter) => match TITLE_ITEMS[menu.selected()] {
            "Start a test" => Screen::open_file(),
            "History" => match history::load(&model.history_path) {
                Ok(results) => Screen::history(results),
                Err(err) => {
                    model.status = Some(err.to_string());
                    Screen::Title { menu }
                }
            },
            "How to play" => Screen::how_to(),
            _ => {
                model.running = false;
                Screen::Title { menu }
            }
        },
        Some(Key::Esc) => {
            model.running = false;
            Screen::Title { menu }
        }
        Some(_) => Screen::Title { menu },
    }
}

fn open_file_key(model: &mut Model, mut input: crate::widget::Textbox, key: Key) -> Screen {
    match input.process_key(key) {
        None => Screen::OpenFile { input },
        Some(Key::Enter) => {
            let path = input.text();
            let path = path.trim();
            match QuestionFile::load(Path::new(path)) {
                Ok(file) => Screen::question_count(file),
                Err(err) => {
                    model.status = Some(err.to_string());
                    Screen::OpenFile { input }
                }
            }
        }
        Some(Key::Esc) => Screen::title(),
        Some(_) => Screen::OpenFile { input },
    }
}

fn question_count_key(
    model: &mut Model,
    file: QuestionFile,
    mut input: crate::widget::Textbox,
    key: Key,
) -> Screen {
    match input.process_key(key) {
        None => Screen::QuestionCount { file, input },
        Some(Key::Enter) => {
            let text = input.text();
            let text = text.trim();
            let count = if text.is_empty() {
                Ok(file.len())
            } else {
                text.parse::<usize>()
            };
            match count {
                Ok(count) if count >= 1 => {
                    debug!(count, "starting test");
                    Screen::Prepare {
                        session: Session::new(file, count),
                        countdown: 3,
                    }
                }
                _ => {
                    model.status = Some(format!(
                        "enter a number between 1 and {} (empty for all)",
                        file.len()
                    ));
                    Screen::QuestionCount { file, input }
                }
            }
        }
        Some(Key::Esc) => Screen::title(),
        Some(_) => Screen::QuestionCount { file, input },
    }
}

fn prepare_key(session: Session, countdown: u8, key: Key) -> Screen {
    if key == Key::Esc {
        Screen::title()
    } else {
        Screen::Prepare { session, countdown }
    }
}

fn question_key(model: &mut Model, mut session: Session, key: Key) -> Screen {
    // An open abort dialog captures all keys.
    if let Some(mut confirm) = session.confirm.take() {
        match confirm.process_key(key) {
            None => session.confirm = Some(confirm),
            Some(Key::Enter) => {
                if confirm.focused() == 0 {
                    debug!("test aborted");
                    return Screen::title();
                }
            }
            Some(Key::Esc) => {}
            Some(_) => session.confirm = Some(confirm),
        }
        return Screen::Question { session };
    }

    // Page keys scroll the question text; the answer line is a single
    // row and has no use for them.
    if matches!(key, Key::PageUp | Key::PageDown) {
        session.question_box.process_key(key);
        return Screen::Question { session };
    }

    // The answer line gets first pick.
    let Some(key) = session.answer_box.process_key(key) else {
        session.pending_give_up = false;
        return Screen::Question { session };
    };
    match key {
        UNSURE_KEY => {
            session.unsure_box.process_key(key);
            if session.unsure_box.is_checked() {
                session.give_up_box.set_checked(false);
            }
            session.pending_give_up = false;
        }
        GIVE_UP_KEY => {
            session.give_up_box.process_key(key);
            if session.give_up_box.is_checked() {
                session.unsure_box.set_checked(false);
            }
            session.pending_give_up = false;
        }
        Key::Esc => session.confirm = Some(Session::abort_dialog()),
        Key::Enter => return submit(model, session),
        _ => session.pending_give_up = false,
    }
    Screen::Question { session }
}

fn submit(model: &mut Model, mut session: Session) -> Screen {
    let answer = session.answer_box.text();
    let giving_up = session.give_up_box.is_checked();
    if giving_up && !answer.is_empty() && !session.pending_give_up {
        session.pending_give_up = true;
        model.status = Some("you typed an answer; press Enter again to give up anyway".into());
        return Screen::Question { session };
    }
    if !giving_up && answer.is_empty() {
        model.status = Some("type an answer, or give up with F3".into());
        return Screen::Question { session };
    }

    let id = session.current_id();
    if giving_up {
        session.wrong.push(WrongAnswer {
            id,
            answer: String::new(),
        });
    } else {
        let points = session.file.score(id, &answer);
        session.score += points;
        if points == 0 {
            session.wrong.push(WrongAnswer { id, answer });
        }
    }
    if session.unsure_box.is_checked() {
        session.unsure.insert(id);
    }

    session.current += 1;
    if session.current < session.order.len() {
        session.show_current();
        Screen::Question { session }
    } else {
        finish(model, session)
    }
}

fn finish(model: &mut Model, session: Session) -> Screen {
    let full_mark = session.asked();
    let result = TestResult {
        file: session.file.path().display().to_string(),
        title: session.file.title().to_owned(),
        order: session.order,
        unsure: session.unsure,
        wrong: session.wrong,
        finished_at: Local::now(),
        elapsed_secs: session.started_at.elapsed().as_secs_f64(),
        score: session.score,
        full_mark,
    };
    let saved = history::load(&model.history_path).and_then(|mut all| {
        all.push(result.clone());
        history::save(&model.history_path, &all)
    });
    if let Err(err) = saved {
        model.status = Some(format!("history not saved: {err}"));
    }
    debug!(score = result.score, full_mark = result.full_mark, "test finished");
    Screen::finished(session.file, result)
}

fn finished_key(
    model: &mut Model,
    file: QuestionFile,
    result: TestResult,
    actions: Vec<FinishedAction>,
    mut menu: crate::widget::Menu,
    key: Key,
) -> Screen {
    let action = match menu.process_key(key) {
        None => None,
        Some(Key::Enter) => Some(actions[menu.selected()]),
        Some(Key::Esc) => return Screen::title(),
        Some(_) => None,
    };
    match action {
        Some(FinishedAction::Retry) => Screen::Prepare {
            session: Session::with_order(file, result.order),
            countdown: 3,
        },
        Some(FinishedAction::RetryMissed) => Screen::Prepare {
            session: Session::with_order(file, result.retry_candidates()),
            countdown: 3,
        },
        Some(FinishedAction::Review) => Screen::review(file, result),
        Some(FinishedAction::Export) => Screen::export(file, result),
        Some(FinishedAction::Back) => Screen::title(),
        Some(FinishedAction::Exit) => {
            model.running = false;
            Screen::Finished {
                file,
                result,
                actions,
                menu,
            }
        }
        None => Screen::Finished {
            file,
            result,
            actions,
            menu,
        },
    }
}

fn review_key(
    file: QuestionFile,
    result: TestResult,
    mut viewer: crate::widget::Textbox,
    key: Key,
) -> Screen {
    match viewer.process_key(key) {
        Some(Key::Esc | Key::Enter) => Screen::finished(file, result),
        _ => Screen::Review {
            file,
            result,
            viewer,
        },
    }
}

fn export_key(
    model: &mut Model,
    file: QuestionFile,
    result: TestResult,
    mut input: crate::widget::Textbox,
    key: Key,
) -> Screen {
    match input.process_key(key) {
        None => Screen::Export {
            file,
            result,
            input,
        },
        Some(Key::Enter) => {
            let path = input.text();
            let path = path.trim().to_owned();
            match std::fs::write(&path, result.review(&file)) {
                Ok(()) => {
                    model.status = Some(format!("review written to {path}"));
                    Screen::finished(file, result)
                }
                Err(err) => {
                    model.status = Some(format!("could not write {path}: {err}"));
                    Screen::Export {
                        file,
                        result,
                        input,
                    }
                }
            }
        }
        Some(Key::Esc) => Screen::finished(file, result),
        Some(_) => Screen::Export {
            file,
            result,
            input,
        },
    }
}

fn history_key(
    model: &mut Model,
    results: Vec<TestResult>,
    mut menu: crate::widget::Menu,
    key: Key,
) -> Screen {
    match menu.process_key(key) {
        None => Screen::History { results, menu },
        Some(Key::Enter) if !results.is_empty() => {
            // Menu lines are newest-first.
            let picked = &results[results.len() - 1 - menu.selected()];
            match QuestionFile::load(Path::new(&picked.file)) {
                Ok(file) if result_fits(picked, &file) => Screen::review(file, picked.clone()),
                Ok(_) => {
                    model.status = Some(format!(
                        "{} has changed since this test was taken",
                        picked.file
                    ));
                    Screen::History { results, menu }
                }
                Err(err) => {
                    model.status = Some(err.to_string());
                    Screen::History { results, menu }
                }
            }
        }
        Some(Key::Esc) => Screen::title(),
        Some(_) => Screen::History { results, menu },
    }
}

/// Whether every question index recorded in `result` still exists in
/// the reloaded file. The file may have shrunk since the test was
/// taken, in which case review and retry would read past its end.
fn result_fits(result: &TestResult, file: &QuestionFile) -> bool {
    result
        .order
        .iter()
        .chain(result.unsure.iter())
        .chain(result.wrong.iter().map(|w| &w.id))
        .all(|&id| id < file.len())
}

fn how_to_key(mut viewer: crate::widget::Textbox, key: Key) -> Screen {
    match viewer.process_key(key) {
        Some(Key::Esc | Key::Enter) => Screen::title(),
        _ => Screen::HowTo { viewer },
    }
}
