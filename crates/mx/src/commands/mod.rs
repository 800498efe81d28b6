//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod transform;

use std::sync::Arc;

use mx_config::Config;
use mx_directives::{CanonicalSource, DocumentContext};
use mx_source::{ExamplesRoot, GithubFetcher, PartialsRoot};

pub(crate) use build::BuildArgs;
pub(crate) use transform::TransformArgs;

/// Build a document context from loaded configuration.
pub(crate) fn document_context(config: &Config) -> DocumentContext {
    DocumentContext::new(
        PartialsRoot::new(config.docs.partials_dir.clone()),
        ExamplesRoot::new(config.docs.examples_dir.clone()),
        CanonicalSource {
            org: config.source.org.clone(),
            repo: config.source.repo.clone(),
            git_ref: config.source.git_ref.clone(),
        },
        Arc::new(GithubFetcher::new()),
    )
    .with_flags(config.flags.clone())
    .with_allowed_orgs(config.source.allowed_orgs.clone())
    .with_platform(config.source.platform)
}
