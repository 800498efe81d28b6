//! `mx transform` command implementation.

use std::path::PathBuf;

use clap::Args;
use mx_config::{CliSettings, Config};
use mx_directives::Pipeline;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the transform command.
#[derive(Args)]
pub(crate) struct TransformArgs {
    /// MDX document to transform.
    input: PathBuf,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Partials directory (overrides config).
    #[arg(long)]
    partials_dir: Option<PathBuf>,

    /// Examples directory (overrides config).
    #[arg(long)]
    examples_dir: Option<PathBuf>,

    /// Git ref for canonical sample URLs (overrides config).
    #[arg(long, env = "MX_GIT_REF")]
    git_ref: Option<String>,

    /// Disable external sample fetching.
    #[arg(long)]
    no_platform: bool,

    /// Path to configuration file (default: auto-discover mx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl TransformArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            partials_dir: self.partials_dir.clone(),
            examples_dir: self.examples_dir.clone(),
            git_ref: self.git_ref.clone(),
            platform: self.no_platform.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let pipeline = Pipeline::new(super::document_context(&config));
        let input = std::fs::read_to_string(&self.input)?;
        let transformed = pipeline
            .transform(&input)
            .map_err(|source| CliError::Document {
                path: self.input.clone(),
                source,
            })?;

        match &self.output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, transformed)?;
                Output::new().success(&format!("Wrote {}", path.display()));
            }
            None => {
                use std::io::Write;
                std::io::stdout().write_all(transformed.as_bytes())?;
            }
        }
        Ok(())
    }
}
