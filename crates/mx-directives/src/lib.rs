//! Directive transformers and pipeline driver for the mx MDX build.
//!
//! Documents may use four directives, written as MDX JSX flow elements with
//! a `$` name prefix:
//!
//! - `<$Show if="flag">` - conditional inclusion keyed on a feature flag;
//!   a leading `!` negates the flag
//! - `<$Partial path="quickstart.mdx" variables={{ "name": "acme" }} />` -
//!   inlines a partial document with `{{ .name }}` substitution, recursively
//! - `<$CodeSample path="/client.ts" lines={[[1, 10]]} />` - embeds a local
//!   or external source file with line elision
//! - `<$CodeTabs>` - groups code blocks and code samples into tabs
//!
//! [`Pipeline::transform`] parses a document, applies the transformers in a
//! fixed order (visibility filtering, admonition normalization, partial
//! inlining to fixpoint, code-sample inlining, code-tab wrapping), and
//! serializes the rewritten tree back to MDX. Any validation or fetch error
//! aborts the whole document; these are authoring errors, meant to be fixed
//! and rebuilt, not retried.

mod admonition;
mod attrs;
mod code_sample;
mod code_tabs;
mod context;
mod error;
mod jsx_spans;
mod lang;
mod lines;
mod partial;
mod pipeline;
mod show;

pub use context::{CanonicalSource, DocumentContext};
pub use error::DirectiveError;
pub use pipeline::Pipeline;
