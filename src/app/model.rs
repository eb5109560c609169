//! Application state.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

use rand::seq::SliceRandom;

use crate::quiz::history::default_history_path;
use crate::quiz::{QuestionFile, TestResult, WrongAnswer};
use crate::widget::{Button, ButtonGroup, Checkbox, Key, Menu, Textbox};

/// Key bound to the "unsure" checkbox on the question screen.
pub const UNSURE_KEY: Key = Key::F(2);
/// Key bound to the "give up" checkbox on the question screen.
pub const GIVE_UP_KEY: Key = Key::F(3);

/// Entries of the title menu, in display order.
pub const TITLE_ITEMS: [&str; 4] = ["Start a test", "History", "How to play", "Exit"];

/// Actions offered by the finished menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishedAction {
    Retry,
    RetryMissed,
    Review,
    Export,
    Back,
    Exit,
}

impl FinishedAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Retry => "Retry this test",
            Self::RetryMissed => "Retry wrong & unsure only",
            Self::Review => "Review answers",
            Self::Export => "Export review to a file",
            Self::Back => "Back to title",
            Self::Exit => "Exit",
        }
    }
}

/// A test in progress.
#[derive(Debug)]
pub struct Session {
    pub file: QuestionFile,
    /// Question indices in asking order.
    pub order: Vec<usize>,
    /// Position within `order`.
    pub current: usize,
    pub score: u32,
    pub wrong: Vec<WrongAnswer>,
    pub unsure: BTreeSet<usize>,
    pub started_at: Instant,
    pub question_box: Textbox,
    pub answer_box: Textbox,
    pub unsure_box: Checkbox,
    pub give_up_box: Checkbox,
    /// Abort confirmation dialog, when open.
    pub confirm: Option<ButtonGroup>,
    /// Set after the first Enter of a give-up with text still typed.
    pub pending_give_up: bool,
}

impl Session {
    /// Start a session over a random subset of `count` questions.
    pub fn new(file: QuestionFile, count: usize) -> Self {
        let mut order: Vec<usize> = (0..file.len()).collect();
        order.shuffle(&mut rand::thread_rng());
        order.truncate(count.clamp(1, file.len()));
        Self::with_order(file, order)
    }

    /// Start a session asking exactly `order`, reshuffled.
    pub fn with_order(file: QuestionFile, mut order: Vec<usize>) -> Self {
        order.shuffle(&mut rand::thread_rng());
        let mut question_box = Textbox::new((2, 2), 8, 70, 16, 200);
        question_box.set_multiline(true);
        let mut answer_box = Textbox::new((12, 2), 1, 70, 1, 200);
        answer_box.set_writable(true);
        let mut session = Self {
            file,
            order,
            current: 0,
            score: 0,
            wrong: Vec::new(),
            unsure: BTreeSet::new(),
            started_at: Instant::now(),
            question_box,
            answer_box,
            unsure_box: Checkbox::new((14, 2), "unsure (F2)", UNSURE_KEY),
            give_up_box: Checkbox::new((14, 24), "give up (F3)", GIVE_UP_KEY),
            confirm: None,
            pending_give_up: false,
        };
        session.show_current();
        session
    }

    /// The file index of the question being asked.
    pub fn current_id(&self) -> usize {
        self.order[self.current]
    }

    /// Load the current question into the widgets.
    pub fn show_current(&mut self) {
        let description = self.file.question(self.current_id()).description.clone();
        self.question_box.set_text(&description);
        self.answer_box.clear();
        self.unsure_box.set_checked(false);
        self.give_up_box.set_checked(false);
        self.pending_give_up = false;
    }

    /// Build the abort dialog.
    pub fn abort_dialog() -> ButtonGroup {
        ButtonGroup::new(vec![
            Button::new("Abort", (18, 10), 0, 1, 0, 0),
            Button::new("Keep going", (18, 24), 0, 1, 1, 1),
        ])
    }

    /// The asked question count (the full mark of this run).
    pub fn asked(&self) -> u32 {
        u32::try_from(self.order.len()).unwrap_or(u32::MAX)
    }
}

/// Which screen is showing, with its state.
#[derive(Debug)]
pub enum Screen {
    Title {
        menu: Menu,
    },
    OpenFile {
        input: Textbox,
    },
    QuestionCount {
        file: QuestionFile,
        input: Textbox,
    },
    Prepare {
        session: Session,
        countdown: u8,
    },
    Question {
        session: Session,
    },
    Finished {
        file: QuestionFile,
        result: TestResult,
        actions: Vec<FinishedAction>,
        menu: Menu,
    },
    Review {
        file: QuestionFile,
        result: TestResult,
        viewer: Textbox,
    },
    Export {
        file: QuestionFile,
        result: TestResult,
        input: Textbox,
    },
    History {
        results: Vec<TestResult>,
        menu: Menu,
    },
    HowTo {
        viewer: Textbox,
    },
}

impl Screen {
    pub fn title() -> Self {
        let items = TITLE_ITEMS.iter().map(|s| (*s).to_owned()).collect();
        Self::Title {
            menu: Menu::new((4, 4), 4, 30, items),
        }
    }

    pub fn open_file() -> Self {
        let mut input = Textbox::new((4, 4), 1, 60, 1, 200);
        input.set_writable(true);
        Self::OpenFile { input }
    }

    pub fn question_count(file: QuestionFile) -> Self {
        let mut input = Textbox::new((6, 4), 1, 10, 1, 10);
        input.set_writable(true);
        Self::QuestionCount { file, input }
    }

    pub fn finished(file: QuestionFile, result: TestResult) -> Self {
        let mut actions = vec![FinishedAction::Retry];
        if !result.retry_candidates().is_empty() {
            actions.push(FinishedAction::RetryMissed);
        }
        actions.extend([
            FinishedAction::Review,
            FinishedAction::Export,
            FinishedAction::Back,
            FinishedAction::Exit,
        ]);
        let items = actions.iter().map(|a| a.label().to_owned()).collect();
        let height = u16::try_from(actions.len()).unwrap_or(6);
        Self::Finished {
            file,
            result,
            menu: Menu::new((8, 4), height, 34, items),
            actions,
        }
    }

    pub fn review(file: QuestionFile, result: TestResult) -> Self {
        let mut viewer = Textbox::new((2, 2), 20, 74, 500, 200);
        viewer.set_multiline(true);
        viewer.set_text(&result.review(&file));
        Self::Review {
            file,
            result,
            viewer,
        }
    }

    pub fn export(file: QuestionFile, result: TestResult) -> Self {
        let mut input = Textbox::new((4, 4), 1, 60, 1, 200);
        input.set_writable(true);
        input.set_text("review.txt");
        Self::Export {
            file,
            result,
            input,
        }
    }

    pub fn history(results: Vec<TestResult>) -> Self {
        // Newest first.
        let items = results.iter().rev().map(TestResult::menu_line).collect();
        Self::History {
            menu: Menu::new((4, 2), 16, 76, items),
            results,
        }
    }

    pub fn how_to() -> Self {
        let mut viewer = Textbox::new((2, 2), 20, 74, 100, 200);
        viewer.set_multiline(true);
        viewer.set_text(HOW_TO_TEXT);
        Self::HowTo { viewer }
    }
}

/// The whole application state.
#[derive(Debug)]
pub struct Model {
    pub screen: Screen,
    pub history_path: PathBuf,
    pub running: bool,
    /// Transient one-line status or error message.
    pub status: Option<String>,
}

impl Model {
    pub fn new(history_path: Option<PathBuf>) -> Self {
        Self {
            screen: Screen::title(),
            history_path: history_path.unwrap_or_else(default_history_path),
            running: true,
            status: None,
        }
    }
}

pub const HOW_TO_TEXT: &str = "\
How to play

A question file is a CSV file. Its first line holds the title, an
optional ignore-case flag (1 folds case) and optional characters to
ignore when comparing answers. Every other line is one question:
description, answer, and an optional per-question ignore-case flag.

During a test, type your answer and press Enter. F2 marks the
question as unsure (it still scores, but shows up in the review).
F3 marks it as given up; press Enter to skip it. If you still have
text typed, Enter asks once more before giving up. Esc aborts the
test after confirmation.

When the test ends you can retry it, retry only the questions you
missed or were unsure about, review the answers, or export the
review to a text file.";
