//! The document transform pipeline.
//!
//! Transformers run in a fixed order: visibility filtering first (so
//! hidden subtrees never cost a fetch), then admonition normalization,
//! then partial inlining (recursive, so included content is itself
//! transformed), then code-sample resolution, then tab grouping last
//! (samples must already be code blocks when labels are derived).

use crate::context::DocumentContext;
use crate::error::DirectiveError;
use crate::{admonition, code_sample, code_tabs, partial, show};

/// Applies the directive transforms to MDX documents.
///
/// A pipeline holds only its context and can transform any number of
/// documents; transforms are independent, so callers may drive one
/// pipeline from many threads.
pub struct Pipeline {
    ctx: DocumentContext,
}

impl Pipeline {
    /// Create a pipeline over the given context.
    #[must_use]
    pub fn new(ctx: DocumentContext) -> Self {
        Self { ctx }
    }

    /// Transform one MDX document, returning the serialized result.
    ///
    /// # Errors
    ///
    /// Fails on malformed MDX or any directive error; nothing is written
    /// for a failed document.
    pub fn transform(&self, input: &str) -> Result<String, DirectiveError> {
        let tree = mx_parser::parse(input)?;
        let mut tree = show::apply(tree, &self.ctx)?;
        admonition::apply(&mut tree)?;
        let mut tree = partial::apply(tree, &self.ctx)?;
        code_sample::apply(&mut tree, &self.ctx)?;
        code_tabs::apply(&mut tree)?;
        Ok(mx_parser::serialize(&tree))
    }
}
