//! Mock fetcher for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::SourceError;
use crate::fetch::{FetchRequest, SampleFetcher};

/// In-memory [`SampleFetcher`] serving canned content.
///
/// Records every request so tests can assert on fetch batching.
#[derive(Default)]
pub struct MockFetcher {
    files: HashMap<String, String>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl MockFetcher {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register content for `org/repo@commit path`.
    #[must_use]
    pub fn with_file(
        mut self,
        org: &str,
        repo: &str,
        commit: &str,
        path: &str,
        content: &str,
    ) -> Self {
        self.files
            .insert(Self::key(org, repo, commit, path), content.to_owned());
        self
    }

    /// All requests seen so far, in order.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    fn key(org: &str, repo: &str, commit: &str, path: &str) -> String {
        format!("{org}/{repo}@{commit} {path}")
    }
}

impl SampleFetcher for MockFetcher {
    fn fetch(&self, request: &FetchRequest) -> Result<String, SourceError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request.clone());

        let key = Self::key(&request.org, &request.repo, &request.commit, &request.path);
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| SourceError::Fetch {
                org: request.org.clone(),
                repo: request.repo.clone(),
                commit: request.commit.clone(),
                path: request.path.clone(),
                message: "not registered with mock".to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mock_serves_registered_content() {
        let mock = MockFetcher::new().with_file("acme", "widgets", "abc", "/a.rs", "fn main() {}");
        let request = FetchRequest {
            org: "acme".to_owned(),
            repo: "widgets".to_owned(),
            commit: "abc".to_owned(),
            path: "/a.rs".to_owned(),
        };

        assert_eq!(mock.fetch(&request).unwrap(), "fn main() {}");
        assert!(mock.fetch(&FetchRequest {
            path: "/missing.rs".to_owned(),
            ..request.clone()
        })
        .is_err());
        assert_eq!(mock.requests().len(), 2);
    }
}
