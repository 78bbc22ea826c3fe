use std::path::PathBuf;

use clap::Parser;
use cocktails::{Config, Directory, storage::CheckReport};
use serde::Serialize;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Check every recipe file in the data directory")]
pub struct Validate {
    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    output: OutputFormat,

    /// Suppress all output except errors
    #[arg(long, short)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Serialize)]
struct Summary {
    recipes: usize,
    failures: Vec<Failure>,
    duplicates: Vec<Duplicate>,
}

#[derive(Debug, Serialize)]
struct Failure {
    file: PathBuf,
    error: String,
}

#[derive(Debug, Serialize)]
struct Duplicate {
    name: String,
    files: Vec<PathBuf>,
}

impl From<CheckReport> for Summary {
    fn from(report: CheckReport) -> Self {
        Self {
            recipes: report.recipes,
            failures: report
                .failures
                .into_iter()
                .map(|(file, error)| Failure {
                    file,
                    error: error.to_string(),
                })
                .collect(),
            duplicates: report
                .duplicates
                .into_iter()
                .map(|(name, files)| Duplicate { name, files })
                .collect(),
        }
    }
}

impl Validate {
    #[instrument(skip(config))]
    pub fn run(self, config: &Config) -> anyhow::Result<()> {
        let root = &config.data_directory;
        if !root.is_dir() {
            anyhow::bail!("data directory '{}' does not exist", root.display());
        }

        let report = Directory::open(root.clone())?.check()?;
        let healthy = report.is_healthy();
        let summary = Summary::from(report);

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
            OutputFormat::Text => {
                if !self.quiet || !healthy {
                    print_text(&summary);
                }
            }
        }

        if !healthy {
            anyhow::bail!(
                "{} unreadable file(s), {} duplicated name(s)",
                summary.failures.len(),
                summary.duplicates.len()
            );
        }
        Ok(())
    }
}

fn print_text(summary: &Summary) {
    for failure in &summary.failures {
        println!("error: {}: {}", failure.file.display(), failure.error);
    }
    for duplicate in &summary.duplicates {
        let files: Vec<_> = duplicate
            .files
            .iter()
            .map(|f| f.display().to_string())
            .collect();
        println!(
            "duplicate: '{}' is used by {}",
            duplicate.name,
            files.join(", ")
        );
    }
    println!(
        "{} recipe(s) ok, {} unreadable, {} duplicated",
        summary.recipes,
        summary.failures.len(),
        summary.duplicates.len()
    );
}
