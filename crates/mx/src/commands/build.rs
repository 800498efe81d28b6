//! `mx build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use rayon::prelude::*;

use mx_config::{CliSettings, Config};
use mx_directives::Pipeline;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Source directory containing MDX documents.
    source_dir: PathBuf,

    /// Output directory (default: transform documents in place).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

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

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            git_ref: self.git_ref.clone(),
            platform: self.no_platform.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        if !self.source_dir.is_dir() {
            return Err(CliError::Validation(format!(
                "source directory not found: {}",
                self.source_dir.display()
            )));
        }

        output.info(&format!("Source: {}", self.source_dir.display()));
        output.info(&format!("Output: {}", self.output_root().display()));

        let documents = collect_documents(&self.source_dir)?;
        tracing::info!(count = documents.len(), "transforming documents");

        let pipeline = Pipeline::new(super::document_context(&config));
        documents
            .par_iter()
            .try_for_each(|relative| self.build_document(&pipeline, relative))?;

        output.success(&format!(
            "Transformed {} document{} to {}",
            documents.len(),
            if documents.len() == 1 { "" } else { "s" },
            self.output_root().display()
        ));
        Ok(())
    }

    /// Where transformed documents land; the source tree when no output
    /// directory was given.
    fn output_root(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or(&self.source_dir)
    }

    fn build_document(&self, pipeline: &Pipeline, relative: &Path) -> Result<(), CliError> {
        let source_path = self.source_dir.join(relative);
        let input = std::fs::read_to_string(&source_path)?;

        let transformed = pipeline
            .transform(&input)
            .map_err(|source| CliError::Document {
                path: relative.to_path_buf(),
                source,
            })?;

        let target = self.output_root().join(relative);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&target, transformed)?;
        tracing::info!(path = %relative.display(), "transformed");
        Ok(())
    }
}

/// Collect `.mdx` paths under `root`, relative to it, in sorted order.
fn collect_documents(root: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut documents = Vec::new();
    walk(root, root, &mut documents)?;
    documents.sort();
    Ok(documents)
}

fn walk(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CliError> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            walk(root, &path, out)?;
        } else if path.extension().is_some_and(|ext| ext == "mdx") {
            if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}
