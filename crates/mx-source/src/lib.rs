//! Content resolution for the mx pipeline.
//!
//! Directives pull content from three places:
//!
//! - [`PartialsRoot`]: partial documents included by `$Partial`
//! - [`ExamplesRoot`]: local source files embedded by `$CodeSample`
//! - [`SampleFetcher`]: external source files embedded by
//!   `<$CodeSample external ... />`, pinned to a commit in another GitHub
//!   repository
//!
//! Both roots reject paths that escape them. The fetcher is a trait seam so
//! the transformers never talk to the network directly; [`GithubFetcher`]
//! is the production implementation and [`MockFetcher`] serves canned
//! content in tests.
//!
//! No retries and no partial output: a read or fetch failure is fatal to
//! the document being transformed.

mod error;
mod fetch;
mod mock;
mod roots;

pub use error::SourceError;
pub use fetch::{FetchRequest, GithubFetcher, SampleFetcher};
pub use mock::MockFetcher;
pub use roots::{ExamplesRoot, PartialsRoot};
