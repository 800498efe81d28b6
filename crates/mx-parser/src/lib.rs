//! MDX parser adapter and serializer for the mx pipeline.
//!
//! [`parse`] turns raw MDX text into the block-level tree defined by
//! [`mx_ast`]; [`serialize`] turns a (possibly rewritten) tree back into MDX
//! text for the downstream renderer.
//!
//! The parser is a line-oriented block scanner, not a full CommonMark
//! implementation: it decomposes exactly the structures the directive
//! transformers rewrite (fenced code blocks and JSX flow elements) and keeps
//! everything else as raw source text. A JSX flow element is a block whose
//! first non-space character is `<` followed by `$` or an uppercase letter;
//! lowercase HTML passes through as raw text.
//!
//! # Example
//!
//! ```
//! use mx_ast::Node;
//!
//! let doc = mx_parser::parse("# Title\n\n<$Show if=\"flag\">\n\nHidden.\n\n</$Show>\n").unwrap();
//! let Node::Document { children } = &doc else { unreachable!() };
//! assert_eq!(children.len(), 2);
//! assert!(children[1].as_jsx_named("$Show").is_some());
//! ```

mod error;
mod fence;
mod jsx;
mod scanner;
mod serialize;

pub use error::ParseError;
pub use serialize::serialize;

use mx_ast::Node;
use scanner::Scanner;

/// Parse an MDX document into a block-level tree.
///
/// # Errors
///
/// Returns [`ParseError`] for malformed or unclosed JSX flow elements. Plain
/// markdown never fails; unrecognized blocks are kept as raw text.
pub fn parse(input: &str) -> Result<Node, ParseError> {
    let mut scanner = Scanner::new(input);
    let children = scanner.parse_blocks(None)?;
    Ok(Node::Document { children })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_ast::{AttrValue, Position};
    use pretty_assertions::assert_eq;

    fn children(doc: &Node) -> &[Node] {
        doc.children().expect("document root")
    }

    #[test]
    fn test_parse_plain_blocks() {
        let doc = parse("# Title\n\nFirst paragraph\nspanning two lines.\n\n- one\n- two\n").unwrap();
        let blocks = children(&doc);

        assert_eq!(blocks.len(), 3);
        assert!(matches!(&blocks[0], Node::Heading { depth: 1, .. }));
        assert!(
            matches!(&blocks[1], Node::Paragraph { text, .. } if text == "First paragraph\nspanning two lines.")
        );
        assert!(matches!(&blocks[2], Node::List { text, .. } if text == "- one\n- two"));
    }

    #[test]
    fn test_parse_fenced_code() {
        let doc = parse("```js title.js\nconst a = 1\n```\n").unwrap();
        let blocks = children(&doc);

        let Node::Code(code) = &blocks[0] else {
            panic!("expected code block, got {:?}", blocks[0]);
        };
        assert_eq!(code.lang.as_deref(), Some("js"));
        assert_eq!(code.meta.as_deref(), Some("title.js"));
        assert_eq!(code.value, "const a = 1");
    }

    #[test]
    fn test_directives_inside_fence_are_not_parsed() {
        let doc = parse("```mdx\n<$Show if=\"x\">\n```\n").unwrap();
        let blocks = children(&doc);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_code());
    }

    #[test]
    fn test_parse_self_closing_directive() {
        let input = "<$CodeSample\n  path=\"/a.js\"\n  lines={[[1, 2], [8, 10]]}\n  meta=\"a.js\"\n/>\n";
        let doc = parse(input).unwrap();
        let el = children(&doc)[0].as_jsx_named("$CodeSample").unwrap();

        assert!(el.self_closing);
        assert_eq!(el.string_attribute("path"), Some("/a.js"));
        assert_eq!(el.expression_attribute("lines"), Some("[[1, 2], [8, 10]]"));
        assert_eq!(el.position, Position::new(1));
    }

    #[test]
    fn test_parse_nested_elements() {
        let input = "<$Show if=\"a\">\n\n<$Show if=\"b\">\n\ninner\n\n</$Show>\n\n</$Show>\n";
        let doc = parse(input).unwrap();
        let outer = children(&doc)[0].as_jsx_named("$Show").unwrap();
        let inner = outer.children[0].as_jsx_named("$Show").unwrap();

        assert_eq!(inner.string_attribute("if"), Some("b"));
        assert!(matches!(&inner.children[0], Node::Paragraph { text, .. } if text == "inner"));
    }

    #[test]
    fn test_parse_single_line_element() {
        let doc = parse("<Admonition type=\"caution\">Watch out.</Admonition>\n").unwrap();
        let el = children(&doc)[0].as_jsx_named("Admonition").unwrap();

        assert!(!el.self_closing);
        assert!(matches!(&el.children[0], Node::Paragraph { text, .. } if text == "Watch out."));
    }

    #[test]
    fn test_bare_and_expression_attributes() {
        let doc = parse("<$CodeSample external org=\"acme\" wrap={true} />\n").unwrap();
        let el = children(&doc)[0].as_jsx_named("$CodeSample").unwrap();

        assert_eq!(el.attribute("external").unwrap().value, None);
        assert!(el.truthy_attribute("external"));
        assert_eq!(
            el.attribute("wrap").unwrap().value,
            Some(AttrValue::Expression("true".to_owned()))
        );
    }

    #[test]
    fn test_expression_with_nested_braces_and_strings() {
        let doc = parse("<$Partial path=\"p.mdx\" variables={{ \"name\": \"a } b\" }} />\n").unwrap();
        let el = children(&doc)[0].as_jsx_named("$Partial").unwrap();

        assert_eq!(
            el.expression_attribute("variables"),
            Some("{ \"name\": \"a } b\" }")
        );
    }

    #[test]
    fn test_unclosed_element_errors() {
        let err = parse("<$Show if=\"a\">\n\ncontent\n").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedElement { ref name, line: 1 } if name == "$Show"));
    }

    #[test]
    fn test_malformed_tag_errors() {
        let err = parse("<$CodeSample path= />\n").unwrap_err();
        assert!(matches!(err, ParseError::MalformedTag { line: 1, .. }));
    }

    #[test]
    fn test_lowercase_html_passes_through_raw() {
        let doc = parse("<div>\nnot a directive\n</div>\n").unwrap();
        let blocks = children(&doc);
        assert!(blocks.iter().all(|b| b.as_jsx().is_none()));
    }

    #[test]
    fn test_round_trip_without_directives() {
        let input = "# Title\n\nA paragraph.\n\n```sql\nselect 1;\n```\n\n- a\n- b\n\n> quote\n";
        let doc = parse(input).unwrap();
        assert_eq!(serialize(&doc), input);
    }

    #[test]
    fn test_round_trip_element() {
        let input = "<Wrapper source=\"url\">\n\n```js\nconst a = 1\n```\n\n</Wrapper>\n";
        let doc = parse(input).unwrap();
        assert_eq!(serialize(&doc), input);
    }
}
