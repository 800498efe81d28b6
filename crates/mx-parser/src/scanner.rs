//! Line-oriented block scanner.
//!
//! Walks the document line by line and decomposes it into block nodes.
//! Fenced code and JSX flow elements are fully parsed; all other blocks
//! keep their raw source text so serialization reproduces them verbatim.

use mx_ast::{CodeBlock, JsxElement, Node, Position};

use crate::error::ParseError;
use crate::fence::{Fence, split_info};
use crate::jsx::{self, parse_open_tag};

/// Kind of a raw (undeconstructed) block, decided from its first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawKind {
    Paragraph,
    List,
    Other,
}

pub(crate) struct Scanner<'a> {
    text: &'a str,
    /// Byte offset of the current line's start.
    offset: usize,
    /// 1-indexed current line number.
    line: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self {
            text,
            offset: 0,
            line: 1,
        }
    }

    fn at_end(&self) -> bool {
        self.offset >= self.text.len()
    }

    /// The current line, without its newline.
    fn current_line(&self) -> &'a str {
        let rest = &self.text[self.offset..];
        match rest.find('\n') {
            Some(idx) => &rest[..idx],
            None => rest,
        }
    }

    /// Move past the current line and its newline.
    fn advance_line(&mut self) {
        let rest = &self.text[self.offset..];
        match rest.find('\n') {
            Some(idx) => self.offset += idx + 1,
            None => self.offset = self.text.len(),
        }
        self.line += 1;
    }

    /// Move forward `n` bytes, updating the line counter.
    fn advance_bytes(&mut self, n: usize) {
        let consumed = &self.text[self.offset..self.offset + n];
        self.line += consumed.matches('\n').count();
        self.offset += n;
    }

    /// Parse blocks until end of input or, when `closing` is set, until a
    /// `</Name>` line for that element. The closing line itself is left for
    /// the caller to consume, so reaching end of input with `closing` set is
    /// the caller's unclosed-element case.
    pub(crate) fn parse_blocks(&mut self, closing: Option<&str>) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();

        while !self.at_end() {
            let line = self.current_line();
            let trimmed = line.trim_start();

            if trimmed.is_empty() {
                self.advance_line();
                continue;
            }

            if let Some(name) = closing_tag_name(trimmed) {
                if closing == Some(name) {
                    return Ok(nodes);
                }
                return Err(ParseError::UnexpectedClosingTag {
                    name: name.to_owned(),
                    line: self.line,
                });
            }

            if let Some((fence, info)) = Fence::detect(trimmed) {
                nodes.push(self.parse_code(fence, info));
                continue;
            }

            if jsx::is_jsx_start(trimmed) {
                nodes.push(self.parse_jsx()?);
                continue;
            }

            if let Some(depth) = heading_depth(trimmed) {
                nodes.push(Node::Heading {
                    depth,
                    text: line.to_owned(),
                    position: Position::new(self.line),
                });
                self.advance_line();
                continue;
            }

            nodes.push(self.parse_raw_block());
        }

        Ok(nodes)
    }

    /// Consume a fenced code block. An unclosed fence runs to end of input
    /// (`CommonMark` behavior).
    fn parse_code(&mut self, fence: Fence, info: &str) -> Node {
        let position = Position::new(self.line);
        let (lang, meta) = split_info(info);
        self.advance_line();

        let mut lines: Vec<&str> = Vec::new();
        while !self.at_end() {
            let line = self.current_line();
            if fence.closes(line.trim_start()) {
                self.advance_line();
                break;
            }
            lines.push(line);
            self.advance_line();
        }

        Node::Code(CodeBlock {
            lang,
            meta,
            value: lines.join("\n"),
            position,
        })
    }

    /// Consume a JSX flow element, including any children.
    fn parse_jsx(&mut self) -> Result<Node, ParseError> {
        let position = Position::new(self.line);
        let line = self.current_line();
        let indent = line.len() - line.trim_start().len();
        let tag_start = self.offset + indent;

        let tag = parse_open_tag(&self.text[tag_start..]).map_err(|e| ParseError::MalformedTag {
            line: self.line,
            message: e.message,
        })?;
        self.advance_bytes(indent + tag.len);

        let rest_of_line = self.current_line();

        if tag.self_closing {
            if !rest_of_line.trim().is_empty() {
                return Err(ParseError::TrailingContent {
                    name: tag.name,
                    line: self.line,
                });
            }
            self.advance_line();
            return Ok(Node::Jsx(JsxElement {
                name: tag.name,
                attributes: tag.attributes,
                children: Vec::new(),
                self_closing: true,
                position,
            }));
        }

        // Single-line form: <X>text</X>
        if !rest_of_line.trim().is_empty() {
            let close = format!("</{}>", tag.name);
            let Some(idx) = rest_of_line.find(&close) else {
                return Err(ParseError::TrailingContent {
                    name: tag.name,
                    line: self.line,
                });
            };
            if !rest_of_line[idx + close.len()..].trim().is_empty() {
                return Err(ParseError::TrailingContent {
                    name: tag.name,
                    line: self.line,
                });
            }
            let inner = rest_of_line[..idx].trim();
            let children = if inner.is_empty() {
                Vec::new()
            } else {
                vec![Node::Paragraph {
                    text: inner.to_owned(),
                    position,
                }]
            };
            self.advance_line();
            return Ok(Node::Jsx(JsxElement {
                name: tag.name,
                attributes: tag.attributes,
                children,
                self_closing: false,
                position,
            }));
        }
        self.advance_line();

        let children = self.parse_blocks(Some(&tag.name))?;
        if self.at_end() {
            return Err(ParseError::UnclosedElement {
                name: tag.name,
                line: position.line,
            });
        }
        // parse_blocks stopped at our closing tag line
        self.advance_line();

        Ok(Node::Jsx(JsxElement {
            name: tag.name,
            attributes: tag.attributes,
            children,
            self_closing: false,
            position,
        }))
    }

    /// Consume a run of raw lines up to the next blank line or block start.
    fn parse_raw_block(&mut self) -> Node {
        let position = Position::new(self.line);
        let kind = raw_kind(self.current_line().trim_start());
        let mut lines: Vec<&str> = Vec::new();

        while !self.at_end() {
            let line = self.current_line();
            let trimmed = line.trim_start();
            if trimmed.is_empty()
                || Fence::detect(trimmed).is_some()
                || jsx::is_jsx_start(trimmed)
                || closing_tag_name(trimmed).is_some()
                || heading_depth(trimmed).is_some()
            {
                break;
            }
            lines.push(line);
            self.advance_line();
        }

        let text = lines.join("\n");
        match kind {
            RawKind::Paragraph => Node::Paragraph { text, position },
            RawKind::List => Node::List { text, position },
            RawKind::Other => Node::Other { text, position },
        }
    }
}

/// If the trimmed line is a lone closing tag for a JSX flow element
/// (`</$Name>` or `</Name>` with a capitalized name), return the name.
fn closing_tag_name(trimmed: &str) -> Option<&str> {
    let rest = trimmed.strip_prefix("</")?;
    let close = rest.find('>')?;
    let name = &rest[..close];
    let mut chars = name.chars();
    if !chars
        .next()
        .is_some_and(|c| c == '$' || c.is_ascii_uppercase())
    {
        return None;
    }
    if !rest[close + 1..].trim().is_empty() {
        return None;
    }
    Some(name)
}

/// ATX heading level (1-6) if the trimmed line is a heading.
fn heading_depth(trimmed: &str) -> Option<u8> {
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&hashes) {
        return None;
    }
    match trimmed.as_bytes().get(hashes) {
        None | Some(b' ' | b'\t') => Some(hashes as u8),
        Some(_) => None,
    }
}

fn raw_kind(trimmed: &str) -> RawKind {
    let bytes = trimmed.as_bytes();
    match bytes.first() {
        Some(b'>' | b'|') => RawKind::Other,
        Some(b'-' | b'*' | b'+') if bytes.get(1) == Some(&b' ') => RawKind::List,
        Some(b'0'..=b'9') => {
            let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
            match bytes.get(digits) {
                Some(b'.' | b')') if bytes.get(digits + 1) == Some(&b' ') => RawKind::List,
                _ => RawKind::Paragraph,
            }
        }
        _ if is_thematic_break(trimmed) => RawKind::Other,
        _ => RawKind::Paragraph,
    }
}

/// Thematic break: three or more of the same `-`, `_`, or `*`, nothing else.
fn is_thematic_break(trimmed: &str) -> bool {
    let Some(first) = trimmed.chars().next() else {
        return false;
    };
    if !matches!(first, '-' | '_' | '*') {
        return false;
    }
    let count = trimmed.chars().filter(|&c| c == first).count();
    count >= 3 && trimmed.chars().all(|c| c == first || c == ' ')
}
