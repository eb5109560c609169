//! Persisted test results.
//!
//! Every finished test appends one [`TestResult`] to a JSON history
//! file, by default `~/.quizpad/history.json`. The same record feeds
//! the history browser line, the post-test summary and the review
//! report.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::question::QuestionFile;

/// Failure to read or write the history file.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to access history file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {path} is corrupt")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A wrong (or given-up) answer, by question index in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WrongAnswer {
    pub id: usize,
    pub answer: String,
}

/// One finished test run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    /// Path of the question file the test was taken from.
    pub file: String,
    pub title: String,
    /// Question indices in the order they were asked.
    pub order: Vec<usize>,
    /// Questions the user flagged as unsure.
    pub unsure: BTreeSet<usize>,
    pub wrong: Vec<WrongAnswer>,
    pub finished_at: DateTime<Local>,
    pub elapsed_secs: f64,
    pub score: u32,
    pub full_mark: u32,
}

impl TestResult {
    /// Percentage score, rounded down.
    pub fn percent(&self) -> u32 {
        if self.full_mark == 0 {
            return 0;
        }
        self.score * 100 / self.full_mark
    }

    /// Question indices worth retrying: wrong plus unsure, sorted and
    /// deduplicated.
    pub fn retry_candidates(&self) -> Vec<usize> {
        let mut ids: BTreeSet<usize> = self.wrong.iter().map(|w| w.id).collect();
        ids.extend(self.unsure.iter().copied());
        ids.into_iter().collect()
    }

    /// One fixed-width line for the history browser.
    pub fn menu_line(&self) -> String {
        format!(
            "{}  {:>3}/{:<3} ({:>3}%)  {}",
            self.finished_at.format("%Y-%m-%d %H:%M"),
            self.score,
            self.full_mark,
            self.percent(),
            self.title,
        )
    }

    /// The post-test summary block.
    pub fn summary(&self) -> String {
        let secs = self.elapsed_secs.round() as i64;
        format!(
            "{}\n\nScore: {} / {} ({}%)\nTime: {}:{:02}\nUnsure: {}   Wrong: {}",
            self.title,
            self.score,
            self.full_mark,
            self.percent(),
            secs / 60,
            secs % 60,
            self.unsure.len(),
            self.wrong.len(),
        )
    }

    /// The full review report: every wrong answer with the reference.
    pub fn review(&self, file: &QuestionFile) -> String {
        let mut out = self.summary();
        out.push('\n');
        for wrong in &self.wrong {
            if wrong.id >= file.len() {
                continue;
            }
            let q = file.question(wrong.id);
            let given = if wrong.answer.is_empty() {
                "(gave up)"
            } else {
                &wrong.answer
            };
            let _ = write!(
                out,
                "\nQ: {}\n  yours: {}\n  right: {}",
                q.description, given, q.answer,
            );
        }
        for &id in &self.unsure {
            if self.wrong.iter().any(|w| w.id == id) || id >= file.len() {
                continue;
            }
            let q = file.question(id);
            let _ = write!(out, "\nQ: {} (unsure)\n  right: {}", q.description, q.answer);
        }
        out
    }
}

/// The default history location, under the home directory.
pub fn default_history_path() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".quizpad")
        .join("history.json")
}

/// Load all past results. A missing file is an empty history.
pub fn load(path: &Path) -> Result<Vec<TestResult>, HistoryError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(HistoryError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&data).map_err(|source| HistoryError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the whole history back, creating parent directories as needed.
pub fn save(path: &Path, results: &[TestResult]) -> Result<(), HistoryError> {
    let io_err = |source| HistoryError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let data = serde_json::to_string_pretty(results).map_err(|source| HistoryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, data).map_err(io_err)?;
    debug!(path = %path.display(), count = results.len(), "saved history");
    Ok(())
}
