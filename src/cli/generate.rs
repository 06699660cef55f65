//! `ctrlgen generate`: render and write the controller project.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crate::config;
use crate::generator::{GenerateOptions, Generator};
use crate::writer::{WriteOutcome, WriteReport};

/// Render and write the controller project.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Controller description: a local path or an http(s) URL
    #[arg(short = 'f', long = "filename", value_name = "PATH|URL")]
    pub filename: String,

    /// Do not run `go mod tidy` after writing
    #[arg(long)]
    pub no_tidy: bool,

    /// Report what would be written without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    /// # Errors
    ///
    /// Fails on load, configuration, render, write or tidy errors.
    pub async fn execute(self) -> Result<()> {
        let spec = config::load(&self.filename).await?;
        let generator = Generator::new(spec)?;

        let options = GenerateOptions {
            tidy: !self.no_tidy,
            dry_run: self.dry_run,
        };
        let report = generator.run(options).await?;
        print_report(&report, self.dry_run);
        Ok(())
    }
}

fn print_report(report: &WriteReport, dry_run: bool) {
    if dry_run {
        println!("{}", "Dry run, nothing was written:".bold());
    }
    for entry in &report.entries {
        let label = format!("{:<11}", entry.outcome.to_string());
        let label = match entry.outcome {
            WriteOutcome::Created => label.green(),
            WriteOutcome::Overwritten | WriteOutcome::Merged => label.yellow(),
            WriteOutcome::Unchanged | WriteOutcome::Skipped => label.dimmed(),
        };
        println!("  {label} {}", entry.path.display());
    }
    if !dry_run {
        println!("{} {} file(s) written", "✓".green(), report.modified());
    }
}
