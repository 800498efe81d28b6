//! Fenced code block detection.
//!
//! `CommonMark` fences use three or more backticks or tildes. The closing
//! fence must use the same character and be at least as long as the opening
//! fence.

/// An open code fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fence {
    /// Fence character (backtick or tilde).
    pub ch: char,
    /// Length of the opening fence run.
    pub len: usize,
}

impl Fence {
    /// Detect an opening fence at the start of a trimmed line.
    ///
    /// Returns the fence and the info string following it. A backtick fence
    /// whose info string contains a backtick is not a fence (`CommonMark`).
    pub(crate) fn detect(trimmed: &str) -> Option<(Self, &str)> {
        let ch = trimmed.chars().next()?;
        if ch != '`' && ch != '~' {
            return None;
        }
        let len = trimmed.chars().take_while(|&c| c == ch).count();
        if len < 3 {
            return None;
        }
        let info = trimmed[len..].trim();
        if ch == '`' && info.contains('`') {
            return None;
        }
        Some((Self { ch, len }, info))
    }

    /// Whether a trimmed line closes this fence.
    pub(crate) fn closes(self, trimmed: &str) -> bool {
        let run = trimmed.chars().take_while(|&c| c == self.ch).count();
        run >= self.len && trimmed[run..].trim().is_empty()
    }
}

/// Split a fence info string into language and meta.
pub(crate) fn split_info(info: &str) -> (Option<String>, Option<String>) {
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => {
            let meta = meta.trim();
            (
                Some(lang.to_owned()),
                (!meta.is_empty()).then(|| meta.to_owned()),
            )
        }
        None => (Some(info.to_owned()), None),
    }
}
