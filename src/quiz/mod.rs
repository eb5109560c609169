//! Question files, scoring and result history.

pub mod history;
pub mod question;

pub use history::{TestResult, WrongAnswer};
pub use question::{Question, QuestionFile};
