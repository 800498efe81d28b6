//! JSX containment detection for elision markers.
//!
//! When a `.jsx`/`.tsx` sample elides lines, the marker must use JSX
//! comment syntax (`{/* ... */}`) if the elided location sits inside JSX
//! markup, and a plain line comment otherwise. [`JsxSpanIndex::scan`] reads
//! the file once into an index of line spans; every elision decision for
//! that file then queries the index, so the source is never re-scanned.
//!
//! The scanner is a lightweight lexer, not a TypeScript parser: it tracks
//! strings, template literals, and comments, recognizes opening/closing
//! tags by shape (`<Name ...>` in a position where an expression may
//! start), and records two kinds of span: JSX elements, and `{ ... }`
//! expression containers inside them. A line counts as "in JSX" when the
//! narrowest span containing it is an element span: code inside an
//! embedded expression container is back in plain JavaScript and takes a
//! line comment.

/// One recorded span, in 1-indexed lines, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
    kind: SpanKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpanKind {
    /// A JSX element, from its opening `<` to its closing tag.
    Element,
    /// A `{ ... }` expression container inside an element.
    Expression,
}

/// Frames open while scanning.
#[derive(Debug)]
enum Frame {
    Element { start: usize },
    Expression { start: usize, depth: usize },
}

/// Index of JSX element and expression spans for one source file.
#[derive(Debug, Default)]
pub(crate) struct JsxSpanIndex {
    spans: Vec<Span>,
}

impl JsxSpanIndex {
    /// Scan a source file into a span index.
    pub(crate) fn scan(source: &str) -> Self {
        Scanner::new(source).run()
    }

    /// Whether the narrowest span containing `line` is a JSX element.
    pub(crate) fn line_in_jsx(&self, line: usize) -> bool {
        self.spans
            .iter()
            .filter(|span| span.start <= line && line <= span.end)
            .min_by_key(|span| span.end - span.start)
            .is_some_and(|span| span.kind == SpanKind::Element)
    }
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    /// Last significant (non-whitespace, non-comment) byte seen.
    prev: Option<u8>,
    /// The identifier word ending at `prev`, when `prev` is part of one.
    last_word: Vec<u8>,
    in_word: bool,
    stack: Vec<Frame>,
    spans: Vec<Span>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            prev: None,
            last_word: Vec::new(),
            in_word: false,
            stack: Vec::new(),
            spans: Vec::new(),
        }
    }

    fn run(mut self) -> JsxSpanIndex {
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                quote @ (b'"' | b'\'') => self.skip_string(quote),
                b'`' => self.skip_template(),
                b'<' => self.handle_angle(),
                b'{' => self.handle_open_brace(),
                b'}' => self.handle_close_brace(),
                byte => {
                    if byte.is_ascii_whitespace() {
                        self.in_word = false;
                    } else {
                        if is_tag_name_start(byte) || byte.is_ascii_digit() {
                            if !self.in_word {
                                self.last_word.clear();
                                self.in_word = true;
                            }
                            self.last_word.push(byte);
                        } else {
                            self.in_word = false;
                        }
                        self.prev = Some(byte);
                    }
                    self.pos += 1;
                }
            }
        }
        JsxSpanIndex { spans: self.spans }
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn set_prev(&mut self, byte: u8) {
        self.prev = Some(byte);
        self.in_word = false;
    }

    fn handle_angle(&mut self) {
        match self.peek(1) {
            Some(b'/') => self.handle_closing_tag(),
            Some(next) if is_tag_name_start(next) || next == b'>' => {
                if self.tag_can_open_here() {
                    self.handle_opening_tag();
                } else {
                    // Less-than or generics, not markup
                    self.set_prev(b'<');
                    self.pos += 1;
                }
            }
            _ => {
                self.set_prev(b'<');
                self.pos += 1;
            }
        }
    }

    /// Whether a `<` at the current position can begin a JSX tag.
    ///
    /// True inside element children or an expression container, and after
    /// bytes where an expression may start (so `a < b` and `Foo<Bar>` stay
    /// plain code).
    fn tag_can_open_here(&self) -> bool {
        if matches!(self.stack.last(), Some(Frame::Element { .. })) {
            return true;
        }
        match self.prev {
            None => true,
            Some(byte) if is_tag_name_start(byte) || byte.is_ascii_digit() => {
                // After an identifier only expression keywords allow a tag
                matches!(
                    self.last_word.as_slice(),
                    b"return" | b"default" | b"yield" | b"await" | b"typeof" | b"case" | b"do"
                        | b"else" | b"in" | b"of"
                )
            }
            Some(byte) => matches!(
                byte,
                b'(' | b',' | b'{' | b'}' | b'[' | b'=' | b'?' | b':' | b';' | b'&' | b'|' | b'>'
            ),
        }
    }

    /// Consume `<Name ...>` or `<Name ... />`, recording the span.
    fn handle_opening_tag(&mut self) {
        let start = self.line;
        self.pos += 1; // '<'
        while self.pos < self.bytes.len() && is_tag_name_byte(self.bytes[self.pos]) {
            self.pos += 1;
        }

        // Attributes, up to the matching '>'
        let mut self_closing = false;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                quote @ (b'"' | b'\'') => self.skip_string(quote),
                b'{' => self.skip_balanced_braces(),
                b'/' if self.peek(1) == Some(b'>') => {
                    self_closing = true;
                    self.pos += 2;
                    break;
                }
                b'>' => {
                    self.pos += 1;
                    break;
                }
                _ => self.pos += 1,
            }
        }

        if self_closing {
            self.spans.push(Span {
                start,
                end: self.line,
                kind: SpanKind::Element,
            });
        } else {
            self.stack.push(Frame::Element { start });
        }
        self.set_prev(b'>');
    }

    /// Consume `</Name>` and close the innermost element frame.
    fn handle_closing_tag(&mut self) {
        self.pos += 2; // '</'
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'>' {
            if self.bytes[self.pos] == b'\n' {
                self.line += 1;
            }
            self.pos += 1;
        }
        self.pos += 1; // '>'

        // Abandon any unbalanced expression frames above the element
        while let Some(frame) = self.stack.pop() {
            if let Frame::Element { start } = frame {
                self.spans.push(Span {
                    start,
                    end: self.line,
                    kind: SpanKind::Element,
                });
                break;
            }
        }
        self.set_prev(b'>');
    }

    fn handle_open_brace(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Expression { depth, .. }) => *depth += 1,
            Some(Frame::Element { .. }) => self.stack.push(Frame::Expression {
                start: self.line,
                depth: 1,
            }),
            None => {} // plain JavaScript block
        }
        self.set_prev(b'{');
        self.pos += 1;
    }

    fn handle_close_brace(&mut self) {
        if let Some(Frame::Expression { start, depth }) = self.stack.last_mut() {
            *depth -= 1;
            if *depth == 0 {
                let span = Span {
                    start: *start,
                    end: self.line,
                    kind: SpanKind::Expression,
                };
                self.stack.pop();
                self.spans.push(span);
            }
        }
        self.set_prev(b'}');
        self.pos += 1;
    }

    fn skip_line_comment(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => self.line += 1,
                b'*' if self.peek(1) == Some(b'/') => {
                    self.pos += 2;
                    return;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    fn skip_string(&mut self, quote: u8) {
        self.pos += 1;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 1,
                b'\n' => self.line += 1,
                byte if byte == quote => {
                    self.pos += 1;
                    self.set_prev(quote);
                    return;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skip a template literal, balancing `${ ... }` interpolations.
    fn skip_template(&mut self) {
        self.pos += 1;
        let mut interpolation_depth = 0usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\\' => self.pos += 1,
                b'\n' => self.line += 1,
                b'$' if interpolation_depth == 0 && self.peek(1) == Some(b'{') => {
                    interpolation_depth = 1;
                    self.pos += 1;
                }
                b'{' if interpolation_depth > 0 => interpolation_depth += 1,
                b'}' if interpolation_depth > 0 => interpolation_depth -= 1,
                b'`' if interpolation_depth == 0 => {
                    self.pos += 1;
                    self.set_prev(b'`');
                    return;
                }
                _ => {}
            }
            self.pos += 1;
        }
    }

    /// Skip a brace-delimited attribute value (`prop={...}`).
    fn skip_balanced_braces(&mut self) {
        let mut depth = 0usize;
        while self.pos < self.bytes.len() {
            match self.bytes[self.pos] {
                b'\n' => self.line += 1,
                quote @ (b'"' | b'\'' | b'`') => {
                    self.skip_string(quote);
                    continue;
                }
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.pos += 1;
                        return;
                    }
                }
                _ => {}
            }
            self.pos += 1;
        }
    }
}

fn is_tag_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_' || byte == b'$'
}

fn is_tag_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'$' | b'.' | b'-' | b':')
}

#[cfg(test)]
mod tests {
    use super::*;

    const COMPONENT: &str = "\
import { items } from './items'

export function List() {
  const count = items.length
  return (
    <ul className=\"list\">
      <li>first</li>
      {items.map((item) => {
        const label = item.name
        return <li key={item.id}>{label}</li>
      })}
    </ul>
  )
}
";

    #[test]
    fn test_lines_inside_markup_are_jsx() {
        let index = JsxSpanIndex::scan(COMPONENT);
        // <li>first</li>
        assert!(index.line_in_jsx(7));
        // <ul ...> opening line
        assert!(index.line_in_jsx(6));
    }

    #[test]
    fn test_lines_outside_markup_are_not_jsx() {
        let index = JsxSpanIndex::scan(COMPONENT);
        assert!(!index.line_in_jsx(1));
        assert!(!index.line_in_jsx(4));
        assert!(!index.line_in_jsx(14));
    }

    #[test]
    fn test_expression_container_is_not_jsx() {
        let index = JsxSpanIndex::scan(COMPONENT);
        // `const label = item.name` sits in the map callback, inside the
        // { ... } container - plain code again
        assert!(!index.line_in_jsx(9));
    }

    #[test]
    fn test_self_closing_element() {
        let source = "const a = 1\nconst b = <Icon\n  name=\"check\"\n/>\nconst c = 2\n";
        let index = JsxSpanIndex::scan(source);
        assert!(!index.line_in_jsx(1));
        assert!(index.line_in_jsx(2));
        assert!(index.line_in_jsx(3));
        assert!(!index.line_in_jsx(5));
    }

    #[test]
    fn test_comparison_is_not_a_tag() {
        let source = "if (a < b) {\n  run()\n}\n";
        let index = JsxSpanIndex::scan(source);
        assert!(!index.line_in_jsx(1));
        assert!(!index.line_in_jsx(2));
    }

    #[test]
    fn test_generics_are_not_tags() {
        let source = "const map = new Map<string, number>()\nmap.set('a', 1)\n";
        let index = JsxSpanIndex::scan(source);
        assert!(!index.line_in_jsx(1));
        assert!(!index.line_in_jsx(2));
    }

    #[test]
    fn test_tags_inside_strings_ignored() {
        let source = "const html = '<div>'\nconst tpl = `<span>${x}</span>`\n";
        let index = JsxSpanIndex::scan(source);
        assert!(!index.line_in_jsx(1));
        assert!(!index.line_in_jsx(2));
    }
}
