//! `$Show` - conditional inclusion keyed on feature flags.
//!
//! ```mdx
//! <$Show if="newSdk">
//!
//! Only rendered when the `newSdk` flag is enabled.
//!
//! </$Show>
//!
//! <$Show if="!newSdk">
//!
//! Only rendered when it is disabled.
//!
//! </$Show>
//! ```
//!
//! An enabled (or negated-disabled) flag removes just the wrapper and
//! promotes its children into the parent; otherwise the whole subtree is
//! dropped. The rewrite rebuilds each child list bottom-up, so nested
//! `$Show` blocks resolve independently and no sibling indices are ever
//! invalidated mid-splice.

use mx_ast::Node;

use crate::attrs::require_string;
use crate::context::DocumentContext;
use crate::error::DirectiveError;

const DIRECTIVE: &str = "$Show";

pub(crate) fn apply(tree: Node, ctx: &DocumentContext) -> Result<Node, DirectiveError> {
    match tree {
        Node::Document { children } => Ok(Node::Document {
            children: rewrite_children(children, ctx)?,
        }),
        other => {
            let mut nodes = rewrite(other, ctx)?;
            Ok(if nodes.len() == 1 {
                nodes.remove(0)
            } else {
                Node::Document { children: nodes }
            })
        }
    }
}

/// Rewrite one node into its replacement sequence.
fn rewrite(node: Node, ctx: &DocumentContext) -> Result<Vec<Node>, DirectiveError> {
    match node {
        Node::Jsx(mut el) => {
            // Children first: nested $Show blocks resolve before their parent
            el.children = rewrite_children(el.children, ctx)?;

            if el.name != DIRECTIVE {
                return Ok(vec![Node::Jsx(el)]);
            }

            let condition = require_string(&el, DIRECTIVE, "if")?;
            let (flag, negated) = match condition.strip_prefix('!') {
                Some(rest) => (rest, true),
                None => (condition, false),
            };
            let enabled = *ctx
                .flags
                .get(flag)
                .ok_or_else(|| DirectiveError::UnknownFlag {
                    flag: flag.to_owned(),
                    line: el.position.line,
                })?;

            if enabled != negated {
                Ok(el.children)
            } else {
                Ok(Vec::new())
            }
        }
        Node::Document { children } => Ok(vec![Node::Document {
            children: rewrite_children(children, ctx)?,
        }]),
        other => Ok(vec![other]),
    }
}

fn rewrite_children(
    children: Vec<Node>,
    ctx: &DocumentContext,
) -> Result<Vec<Node>, DirectiveError> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        out.extend(rewrite(child, ctx)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context;
    use mx_ast::{JsxAttribute, JsxElement, Position};
    use pretty_assertions::assert_eq;

    fn paragraph(text: &str) -> Node {
        Node::Paragraph {
            text: text.to_owned(),
            position: Position::new(1),
        }
    }

    fn show(condition: &str, children: Vec<Node>) -> Node {
        Node::Jsx(
            JsxElement::new(DIRECTIVE)
                .with_attribute(JsxAttribute::literal("if", condition))
                .with_children(children),
        )
    }

    fn ctx_with_flag(name: &str, value: bool) -> DocumentContext {
        let mut ctx = test_context();
        ctx.flags.insert(name.to_owned(), value);
        ctx
    }

    #[test]
    fn test_enabled_flag_promotes_children() {
        let ctx = ctx_with_flag("flag", true);
        let tree = Node::document(vec![show("flag", vec![paragraph("kept")])]);

        let result = apply(tree, &ctx).unwrap();
        assert_eq!(result, Node::document(vec![paragraph("kept")]));
    }

    #[test]
    fn test_disabled_flag_removes_subtree() {
        let ctx = ctx_with_flag("flag", false);
        let tree = Node::document(vec![paragraph("before"), show("flag", vec![paragraph("gone")])]);

        let result = apply(tree, &ctx).unwrap();
        assert_eq!(result, Node::document(vec![paragraph("before")]));
    }

    #[test]
    fn test_negated_flag() {
        // Enabled flag with negation removes the block
        let ctx = ctx_with_flag("flag", true);
        let tree = Node::document(vec![show("!flag", vec![paragraph("gone")])]);
        assert_eq!(apply(tree, &ctx).unwrap(), Node::document(vec![]));

        // Disabled flag with negation keeps children
        let ctx = ctx_with_flag("flag", false);
        let tree = Node::document(vec![show("!flag", vec![paragraph("kept")])]);
        assert_eq!(
            apply(tree, &ctx).unwrap(),
            Node::document(vec![paragraph("kept")])
        );
    }

    #[test]
    fn test_nested_blocks_resolve_independently() {
        let mut ctx = test_context();
        ctx.flags.insert("outer".to_owned(), true);
        ctx.flags.insert("inner".to_owned(), false);

        let tree = Node::document(vec![show(
            "outer",
            vec![
                paragraph("outer-kept"),
                show("inner", vec![paragraph("inner-gone")]),
            ],
        )]);

        let result = apply(tree, &ctx).unwrap();
        assert_eq!(result, Node::document(vec![paragraph("outer-kept")]));
    }

    #[test]
    fn test_unknown_flag_errors() {
        let ctx = test_context();
        let tree = Node::document(vec![show("mystery", vec![])]);
        assert!(matches!(
            apply(tree, &ctx).unwrap_err(),
            DirectiveError::UnknownFlag { ref flag, .. } if flag == "mystery"
        ));
    }

    #[test]
    fn test_missing_if_attribute_errors() {
        let ctx = test_context();
        let tree = Node::document(vec![Node::Jsx(JsxElement::new(DIRECTIVE))]);
        assert!(matches!(
            apply(tree, &ctx).unwrap_err(),
            DirectiveError::MissingAttribute { .. }
        ));
    }
}
