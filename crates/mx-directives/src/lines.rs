//! Line-range selection and elision for `$CodeSample`.
//!
//! A selector is an ordered sequence of `[start, end]` pairs, 1-indexed and
//! inclusive, where `end = -1` means "through end of file". Between
//! selected ranges (and before the first range when it does not start at
//! line 1, and after the last range when it does not reach the final line)
//! an elision marker is inserted whose comment syntax depends on the
//! sample's language.

use crate::error::DirectiveError;
use crate::jsx_spans::JsxSpanIndex;

/// One inclusive 1-indexed line range; `end = -1` is end-of-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineRange {
    pub start: i64,
    pub end: i64,
}

/// Comment syntax used for elision markers.
pub(crate) enum ElisionStyle<'a> {
    /// `-- ...`
    Sql,
    /// `{/* ... */}` inside a JSX subtree, `// ...` elsewhere.
    JsxAware(&'a JsxSpanIndex),
    /// `// ...`
    Plain,
}

/// Selector used when the `lines` attribute is omitted: the whole file.
pub(crate) const FULL_FILE: &[LineRange] = &[LineRange { start: 1, end: -1 }];

/// Parse and validate a `lines` attribute expression.
pub(crate) fn parse_ranges(
    source: &str,
    directive: &'static str,
    line: usize,
) -> Result<Vec<LineRange>, DirectiveError> {
    let invalid = |message: String| DirectiveError::InvalidAttribute {
        directive,
        attribute: "lines",
        line,
        message,
    };

    let raw: Vec<[i64; 2]> = serde_json::from_str(source)
        .map_err(|_| invalid("must be an array of [start, end] tuples".to_owned()))?;

    let mut ranges = Vec::with_capacity(raw.len());
    for [start, end] in raw {
        if start < 1 {
            return Err(invalid(format!("range start {start} must be >= 1")));
        }
        if end != -1 && end < start {
            return Err(invalid(format!("range end {end} is before start {start}")));
        }
        ranges.push(LineRange { start, end });
    }
    if ranges.is_empty() {
        return Err(invalid("must select at least one range".to_owned()));
    }
    Ok(ranges)
}

/// Apply a selector to file content, inserting elision markers in gaps.
///
/// Markers carry the indentation of the adjacent range's first line and a
/// blank line on each side; the final output is trimmed.
pub(crate) fn redact(content: &str, ranges: &[LineRange], style: &ElisionStyle<'_>) -> String {
    let all: Vec<&str> = content.split('\n').collect();
    let mut out: Vec<String> = Vec::new();

    for (index, range) in ranges.iter().enumerate() {
        let start = usize::try_from(range.start).unwrap_or(1);
        if index != 0 || range.start != 1 {
            out.push(elided_line(&all, start, style));
        }

        let end = if range.end == -1 {
            all.len()
        } else {
            usize::try_from(range.end).unwrap_or(0).min(all.len())
        };
        if start <= all.len() && start <= end {
            out.extend(all[start - 1..end].iter().map(|s| (*s).to_owned()));
        }

        if index == ranges.len() - 1 && range.end != -1 && end != all.len() {
            out.push(elided_line(&all, start, style));
        }
    }

    out.join("\n").trim().to_owned()
}

/// Build one elision marker, indented like the range starting at `start`.
fn elided_line(all: &[&str], start: usize, style: &ElisionStyle<'_>) -> String {
    let reference = all.get(start - 1).copied().unwrap_or_default();
    let indentation: String = reference
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();

    let marker = match style {
        ElisionStyle::Sql => "-- ...",
        ElisionStyle::JsxAware(index) => {
            if index.line_in_jsx(start) {
                "{/* ... */}"
            } else {
                "// ..."
            }
        }
        ElisionStyle::Plain => "// ...",
    };

    format!("\n{indentation}{marker}\n")
}
