//! Per-document transform context.

use std::collections::HashMap;
use std::sync::Arc;

use mx_source::{ExamplesRoot, PartialsRoot, SampleFetcher};

/// Default limit for nested partial inclusion.
const DEFAULT_MAX_PARTIAL_DEPTH: usize = 10;

/// Canonical GitHub coordinates of the documentation repository.
///
/// Internal code samples link back to the file they were embedded from;
/// `git_ref` is typically the commit being built so links stay stable.
#[derive(Debug, Clone)]
pub struct CanonicalSource {
    /// GitHub organization.
    pub org: String,
    /// Repository name.
    pub repo: String,
    /// Ref the canonical URL points at.
    pub git_ref: String,
}

impl CanonicalSource {
    /// Canonical URL for an internal sample path (leading slash included).
    #[must_use]
    pub fn internal_url(&self, path: &str) -> String {
        format!(
            "https://github.com/{}/{}/blob/{}/examples{path}",
            self.org, self.repo, self.git_ref
        )
    }
}

/// Everything a single document transform needs.
///
/// Contexts are cheap to clone and hold no per-document state; one context
/// can drive many documents in parallel (the fetcher is shared).
#[derive(Clone)]
pub struct DocumentContext {
    /// Feature flags consumed by `$Show`.
    pub flags: HashMap<String, bool>,
    /// Root for `$Partial` documents.
    pub partials: PartialsRoot,
    /// Root for internal `$CodeSample` files.
    pub examples: ExamplesRoot,
    /// Canonical coordinates for internal sample URLs.
    pub source: CanonicalSource,
    /// Organizations external samples may be fetched from.
    pub allowed_orgs: Vec<String>,
    /// When false, external samples render as `CodeSampleDummy`.
    pub platform: bool,
    /// Depth limit for nested partial inclusion.
    pub max_partial_depth: usize,
    /// Fetcher for external samples.
    pub fetcher: Arc<dyn SampleFetcher>,
}

impl DocumentContext {
    /// Create a context with default flags, orgs, and depth limit.
    #[must_use]
    pub fn new(
        partials: PartialsRoot,
        examples: ExamplesRoot,
        source: CanonicalSource,
        fetcher: Arc<dyn SampleFetcher>,
    ) -> Self {
        Self {
            flags: HashMap::new(),
            partials,
            examples,
            source,
            allowed_orgs: Vec::new(),
            platform: true,
            max_partial_depth: DEFAULT_MAX_PARTIAL_DEPTH,
            fetcher,
        }
    }

    /// Set the feature flags.
    #[must_use]
    pub fn with_flags(mut self, flags: HashMap<String, bool>) -> Self {
        self.flags = flags;
        self
    }

    /// Set the external-org allow-list.
    #[must_use]
    pub fn with_allowed_orgs(mut self, orgs: Vec<String>) -> Self {
        self.allowed_orgs = orgs;
        self
    }

    /// Enable or disable external fetching.
    #[must_use]
    pub fn with_platform(mut self, platform: bool) -> Self {
        self.platform = platform;
        self
    }

    /// Override the partial nesting limit.
    #[must_use]
    pub fn with_max_partial_depth(mut self, depth: usize) -> Self {
        self.max_partial_depth = depth;
        self
    }
}

/// Context with placeholder roots and a mock fetcher, for transformer tests.
#[cfg(test)]
pub(crate) fn test_context() -> DocumentContext {
    DocumentContext::new(
        PartialsRoot::new("/nonexistent/partials"),
        ExamplesRoot::new("/nonexistent/examples"),
        CanonicalSource {
            org: "acme".to_owned(),
            repo: "acme-docs".to_owned(),
            git_ref: "main".to_owned(),
        },
        Arc::new(mx_source::MockFetcher::new()),
    )
}
