//! External sample fetching from GitHub.

use std::time::Duration;

use ureq::Agent;

use crate::error::SourceError;

/// Request for one external source file, pinned to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// GitHub organization.
    pub org: String,
    /// Repository name.
    pub repo: String,
    /// Commit SHA (or ref) to read at.
    pub commit: String,
    /// File path within the repository, leading slash included.
    pub path: String,
}

/// Fetches external sample content.
///
/// The transformers only see this trait; org allow-listing is enforced by
/// the `$CodeSample` transformer before a request is ever built, so
/// implementations are pure mechanism.
pub trait SampleFetcher: Send + Sync {
    /// Fetch the file content for a request.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Fetch`] on transport errors or non-success
    /// HTTP statuses.
    fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError>;
}

/// Default HTTP timeout for raw-content fetches.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`SampleFetcher`] backed by `raw.githubusercontent.com`.
///
/// The underlying agent pools connections, so one fetcher should be reused
/// across all documents of a build.
pub struct GithubFetcher {
    agent: Agent,
    base_url: String,
}

impl Default for GithubFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubFetcher {
    /// Create a fetcher with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(DEFAULT_TIMEOUT))
            .http_status_as_error(false)
            .build()
            .into();
        Self {
            agent,
            base_url: "https://raw.githubusercontent.com".to_owned(),
        }
    }

    /// Override the base URL (tests and mirrors).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn fetch_error(request: &FetchRequest, message: String) -> SourceError {
        SourceError::Fetch {
            org: request.org.clone(),
            repo: request.repo.clone(),
            commit: request.commit.clone(),
            path: request.path.clone(),
            message,
        }
    }
}

impl SampleFetcher for GithubFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError> {
        let url = format!(
            "{}/{}/{}/{}{}",
            self.base_url,
            request.org,
            request.repo,
            request.commit,
            request.path
        );
        tracing::debug!(url = %url, "fetching external code sample");

        let response = self
            .agent
            .get(&url)
            .call()
            .map_err(|e| Self::fetch_error(request, e.to_string()))?;

        let status = response.status().as_u16();
        let mut body = response.into_body();
        if status >= 400 {
            return Err(Self::fetch_error(request, format!("HTTP {status}")));
        }

        body.read_to_string()
            .map_err(|e| Self::fetch_error(request, e.to_string()))
    }
}
