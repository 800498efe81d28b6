//! Directive error types.

use mx_parser::ParseError;
use mx_source::SourceError;

/// Error raised while transforming a document.
///
/// Line numbers refer to the document being transformed (or, for
/// [`PartialParse`](Self::PartialParse), to the named partial file).
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// The document itself failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading or fetching directive content failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// A required attribute is missing.
    #[error("line {line}: {directive} requires a `{attribute}` attribute")]
    MissingAttribute {
        /// Directive name.
        directive: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// Directive position.
        line: usize,
    },

    /// An attribute is present but malformed.
    #[error("line {line}: invalid `{attribute}` on {directive}: {message}")]
    InvalidAttribute {
        /// Directive name.
        directive: &'static str,
        /// Attribute name.
        attribute: &'static str,
        /// Directive position.
        line: usize,
        /// What is wrong with the value.
        message: String,
    },

    /// `$Show` referenced a flag that is not configured.
    #[error("line {line}: unknown feature flag `{flag}`")]
    UnknownFlag {
        /// Flag name as written (without negation).
        flag: String,
        /// Directive position.
        line: usize,
    },

    /// A partial includes itself, directly or indirectly.
    #[error("line {line}: circular partial inclusion: {chain}")]
    CircularPartial {
        /// Inclusion chain, ` -> `-joined, ending at the repeated path.
        chain: String,
        /// Directive position.
        line: usize,
    },

    /// Partial nesting exceeded the configured depth limit.
    #[error("line {line}: partial nesting exceeds depth limit ({limit})")]
    PartialDepthExceeded {
        /// Configured limit.
        limit: usize,
        /// Directive position.
        line: usize,
    },

    /// A partial file failed to parse as MDX.
    #[error("in partial {path}: {source}")]
    PartialParse {
        /// Partial path as written in the directive.
        path: String,
        /// Underlying parse error (line numbers are within the partial).
        source: ParseError,
    },

    /// External `$CodeSample` from an organization not on the allow-list.
    #[error("line {line}: org `{org}` is not allowed; must be one of: {allowed}")]
    DisallowedOrg {
        /// Organization as written.
        org: String,
        /// Comma-joined allow-list.
        allowed: String,
        /// Directive position.
        line: usize,
    },

    /// `$CodeTabs` contains a child that is not a code block or sample.
    #[error("line {line}: $CodeTabs children must be code blocks or code samples")]
    InvalidTabChild {
        /// Position of the offending child.
        line: usize,
    },

    /// `Admonition` with an unrecognized `type`.
    #[error("line {line}: unknown admonition type `{value}`")]
    UnknownAdmonitionType {
        /// Value as written.
        value: String,
        /// Element position.
        line: usize,
    },
}
