//! Question files and answer scoring.
//!
//! A question file is CSV. The first record is the header:
//!
//! ```csv
//! French vocabulary,1,"., "
//! ```
//!
//! title, then an optional ignore-case flag (`1` folds case before
//! comparing), then an optional set of characters stripped from both
//! sides before comparing. Every following record is one question:
//! description, reference answer, and an optional per-question override
//! of the ignore-case flag.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// Failure to load a question file.
#[derive(Debug, Error)]
pub enum QuestionFileError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{path}: record {index} needs a description and an answer")]
    Malformed { path: PathBuf, index: usize },
    #[error("{path} contains no questions")]
    Empty { path: PathBuf },
}

/// One question with its reference answer.
#[derive(Debug, Clone)]
pub struct Question {
    pub description: String,
    pub answer: String,
    /// Per-question case folding, overriding the file default.
    ignore_case: bool,
}

/// A loaded question file.
#[derive(Debug, Clone)]
pub struct QuestionFile {
    path: PathBuf,
    title: String,
    ignore_chars: String,
    questions: Vec<Question>,
}

impl QuestionFile {
    /// Load and parse a question file.
    pub fn load(path: &Path) -> Result<Self, QuestionFileError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|source| QuestionFileError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut title = String::new();
        let mut default_ignore_case = false;
        let mut ignore_chars = String::new();
        let mut questions = Vec::new();

        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|source| QuestionFileError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if index == 0 {
                title = record.get(0).unwrap_or_default().to_owned();
                default_ignore_case = flag(record.get(1)).unwrap_or(false);
                ignore_chars = record.get(2).unwrap_or_default().to_owned();
                continue;
            }
            let description = record
                .get(0)
                .filter(|d| !d.is_empty())
                .ok_or_else(|| QuestionFileError::Malformed {
                    path: path.to_path_buf(),
                    index,
                })?;
            let answer = record.get(1).ok_or_else(|| QuestionFileError::Malformed {
                path: path.to_path_buf(),
                index,
            })?;
            questions.push(Question {
                description: description.to_owned(),
                answer: answer.to_owned(),
                ignore_case: flag(record.get(2)).unwrap_or(default_ignore_case),
            });
        }

        if questions.is_empty() {
            return Err(QuestionFileError::Empty {
                path: path.to_path_buf(),
            });
        }
        debug!(path = %path.display(), count = questions.len(), "loaded question file");
        Ok(Self {
            path: path.to_path_buf(),
            title,
            ignore_chars,
            questions,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, index: usize) -> &Question {
        &self.questions[index]
    }

    /// Score an answer to question `index`: one point for a match after
    /// normalization, zero otherwise. An empty answer never scores.
    pub fn score(&self, index: usize, answer: &str) -> u32 {
        if answer.is_empty() {
            return 0;
        }
        let q = &self.questions[index];
        u32::from(self.normalize(answer, q.ignore_case) == self.normalize(&q.answer, q.ignore_case))
    }

    /// The highest achievable score.
    pub fn full_mark(&self) -> u32 {
        u32::try_from(self.questions.len()).unwrap_or(u32::MAX)
    }

    fn normalize(&self, s: &str, ignore_case: bool) -> String {
        let kept = s.chars().filter(|c| !self.ignore_chars.contains(*c));
        if ignore_case {
            kept.flat_map(char::to_uppercase).collect()
        } else {
            kept.collect()
        }
    }
}

/// Parse an optional `0`/`1` CSV field.
fn flag(field: Option<&str>) -> Option<bool> {
    match field {
        Some("1") => Some(true),
        Some("0") => Some(false),
        _ => None,
    }
}
