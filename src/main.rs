use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use quizpad::app::model::{Model, Screen};
use quizpad::quiz::QuestionFile;

/// A terminal Q&A practice app.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Question file to open immediately, skipping the title menu.
    file: Option<PathBuf>,

    /// History file location.
    #[arg(long)]
    history: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut model = Model::new(cli.history);
    if let Some(path) = cli.file {
        let file = QuestionFile::load(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        model.screen = Screen::question_count(file);
    }
    quizpad::app::run(&mut model)
}
