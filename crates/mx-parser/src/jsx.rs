//! JSX open-tag reader.
//!
//! Reads a single opening (or self-closing) JSX tag starting at a `<`,
//! including multi-line tags with one attribute per line. Attribute values
//! are either double/single-quoted literals or brace-delimited expressions;
//! expression sources are captured raw with balanced-brace and
//! string-literal awareness, never evaluated.

use mx_ast::{AttrValue, JsxAttribute};

/// A parsed opening tag, children not yet read.
#[derive(Debug)]
pub(crate) struct OpenTag {
    pub name: String,
    pub attributes: Vec<JsxAttribute>,
    pub self_closing: bool,
    /// Byte length of the tag source, from `<` through `>`.
    pub len: usize,
}

/// Failure while reading a tag; converted to `ParseError::MalformedTag` by
/// the scanner, which knows the source line.
#[derive(Debug)]
pub(crate) struct TagError {
    pub message: String,
}

impl TagError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Whether a trimmed line begins a JSX flow element.
///
/// Only `$`-prefixed directives and capitalized component names count;
/// lowercase HTML and autolinks stay raw markdown.
pub(crate) fn is_jsx_start(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    chars.next() == Some('<')
        && chars
            .next()
            .is_some_and(|c| c == '$' || c.is_ascii_uppercase())
}

fn is_name_start(byte: u8) -> bool {
    byte == b'$' || byte == b'_' || byte.is_ascii_alphabetic()
}

fn is_name_byte(byte: u8) -> bool {
    byte == b'$' || byte == b'_' || byte == b'.' || byte == b'-' || byte.is_ascii_alphanumeric()
}

/// Read the opening tag at the start of `text`.
///
/// `text` must begin with `<`. Returns the tag and how many bytes it spans.
pub(crate) fn parse_open_tag(text: &str) -> Result<OpenTag, TagError> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.first(), Some(&b'<'));

    let mut pos = 1;
    let name_start = pos;
    if pos < bytes.len() && is_name_start(bytes[pos]) {
        pos += 1;
        while pos < bytes.len() && is_name_byte(bytes[pos]) {
            pos += 1;
        }
    }
    if pos == name_start {
        return Err(TagError::new("expected element name after '<'"));
    }
    let name = text[name_start..pos].to_owned();

    let mut attributes = Vec::new();
    loop {
        pos = skip_whitespace(bytes, pos);
        match bytes.get(pos) {
            None => {
                return Err(TagError::new(format!("unterminated <{name}> tag")));
            }
            Some(b'>') => {
                return Ok(OpenTag {
                    name,
                    attributes,
                    self_closing: false,
                    len: pos + 1,
                });
            }
            Some(b'/') => {
                if bytes.get(pos + 1) == Some(&b'>') {
                    return Ok(OpenTag {
                        name,
                        attributes,
                        self_closing: true,
                        len: pos + 2,
                    });
                }
                return Err(TagError::new("expected '>' after '/'"));
            }
            Some(_) => {
                let (attr, next) = parse_attribute(text, pos)?;
                attributes.push(attr);
                pos = next;
            }
        }
    }
}

fn parse_attribute(text: &str, start: usize) -> Result<(JsxAttribute, usize), TagError> {
    let bytes = text.as_bytes();
    let mut pos = start;

    if !is_name_start(bytes[pos]) {
        return Err(TagError::new(format!(
            "unexpected character {:?} in tag",
            text[pos..].chars().next().unwrap_or('?')
        )));
    }
    pos += 1;
    while pos < bytes.len() && is_name_byte(bytes[pos]) {
        pos += 1;
    }
    let name = text[start..pos].to_owned();

    let after_name = skip_whitespace(bytes, pos);
    if bytes.get(after_name) != Some(&b'=') {
        // Bare attribute, boolean true
        return Ok((JsxAttribute { name, value: None }, pos));
    }
    pos = skip_whitespace(bytes, after_name + 1);

    match bytes.get(pos) {
        Some(&quote @ (b'"' | b'\'')) => {
            let value_start = pos + 1;
            let close = bytes[value_start..]
                .iter()
                .position(|&b| b == quote)
                .ok_or_else(|| TagError::new(format!("unterminated value for `{name}`")))?;
            let value = text[value_start..value_start + close].to_owned();
            Ok((
                JsxAttribute {
                    name,
                    value: Some(AttrValue::Literal(value)),
                },
                value_start + close + 1,
            ))
        }
        Some(b'{') => {
            let end = scan_expression(bytes, pos)
                .ok_or_else(|| TagError::new(format!("unbalanced braces in `{name}`")))?;
            let value = text[pos + 1..end].trim().to_owned();
            Ok((
                JsxAttribute {
                    name,
                    value: Some(AttrValue::Expression(value)),
                },
                end + 1,
            ))
        }
        _ => Err(TagError::new(format!(
            "expected quoted string or {{expression}} for `{name}`"
        ))),
    }
}

/// Find the byte index of the `}` matching the `{` at `open`.
///
/// Tracks string and template literals so braces inside them don't count.
fn scan_expression(bytes: &[u8], open: usize) -> Option<usize> {
    debug_assert_eq!(bytes[open], b'{');

    let mut depth = 0usize;
    let mut string: Option<u8> = None;
    let mut pos = open;
    while pos < bytes.len() {
        let byte = bytes[pos];
        if let Some(quote) = string {
            match byte {
                b'\\' => pos += 1,
                _ if byte == quote => string = None,
                _ => {}
            }
        } else {
            match byte {
                b'"' | b'\'' | b'`' => string = Some(byte),
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(pos);
                    }
                }
                _ => {}
            }
        }
        pos += 1;
    }
    None
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}
