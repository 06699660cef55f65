//! Command-line interface for ctrlgen.
//!
//! # Commands
//!
//! - `generate` - Render and write the controller project
//! - `validate` - Resolve and assemble the description without writing anything
//!
//! # Global options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only report errors
//!
//! `RUST_LOG`, when set, takes precedence over both flags.
//!
//! # Examples
//!
//! ```bash
//! # Generate into the directory named by `base:`
//! ctrlgen generate -f controller.yaml
//!
//! # Fetch the description and skip `go mod tidy`
//! ctrlgen generate -f https://example.com/controller.yaml --no-tidy
//!
//! # Inspect resolution results as JSON
//! ctrlgen validate -f controller.yaml --format json
//! ```

pub mod generate;
pub mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Runtime settings derived from global flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default filter directive when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Install the global tracing subscriber. Logs go to stderr so that
    /// command output on stdout stays machine-readable.
    ///
    /// Calling this more than once keeps the first subscriber.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Declarative scaffolding generator for resource-watching controllers.
#[derive(Parser, Debug)]
#[command(
    name = "ctrlgen",
    about = "Generate Kubernetes resource-watching controllers from a YAML description",
    version,
    long_about = "ctrlgen renders a controller project (main.go, controller.go, custom.go, go.mod) \
                  from a description of the resources to watch. Re-running it merges new \
                  handlers into custom.go without touching hand-written code."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate the controller project described by a YAML file.
    ///
    /// go.mod is written once, main.go and controller.go are regenerated on
    /// every run, and custom.go is merged so hand-written handlers survive.
    Generate(generate::GenerateCommand),

    /// Resolve every resource and print the result without writing files.
    Validate(validate::ValidateCommand),
}

impl Cli {
    /// Build the runtime configuration from global flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };
        CliConfig::new().with_log_level(level)
    }

    /// Initialise logging and run the selected command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-facing message.
    pub async fn execute(self) -> Result<()> {
        self.build_config().init_logging();

        match self.command {
            Commands::Generate(cmd) => cmd.execute().await,
            Commands::Validate(cmd) => cmd.execute().await,
        }
    }
}
