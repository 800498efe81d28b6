//! CLI error types.

use std::path::PathBuf;

use mx_config::ConfigError;
use mx_directives::DirectiveError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: DirectiveError,
    },

    #[error("{0}")]
    Validation(String),
}
