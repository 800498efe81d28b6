//! Parser error types.

/// Error raised while parsing an MDX document.
///
/// All variants carry the 1-indexed source line they were detected at. A
/// parse error aborts the whole document transform; there is no partial
/// tree.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A JSX flow element was never closed.
    #[error("line {line}: unclosed <{name}> element")]
    UnclosedElement {
        /// Element name.
        name: String,
        /// Line the element was opened at.
        line: usize,
    },

    /// A JSX tag could not be read.
    #[error("line {line}: malformed JSX tag: {message}")]
    MalformedTag {
        /// Line the tag starts at.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Content followed a JSX tag on the same line without closing it.
    #[error("line {line}: content after <{name}> must start on its own line")]
    TrailingContent {
        /// Element name.
        name: String,
        /// Offending line.
        line: usize,
    },

    /// A closing tag appeared with no matching open element.
    #[error("line {line}: unexpected closing tag </{name}>")]
    UnexpectedClosingTag {
        /// Element name.
        name: String,
        /// Offending line.
        line: usize,
    },
}
