//! `$Partial` - content inclusion with variable substitution.
//!
//! ```mdx
//! <$Partial path="quickstarts/setup.mdx" variables={{ "framework": "Next.js" }} />
//! ```
//!
//! The referenced file is read from the partials root, `{{ .name }}` tokens
//! are substituted, and the result is re-parsed as MDX and spliced in place
//! of the directive. Included partials may themselves include partials;
//! resolution recurses until no `$Partial` node remains. Each inclusion
//! chain is bounded by the context's depth limit and checked against the
//! chain itself, so a partial that includes itself (directly or indirectly)
//! fails with a circular-inclusion error instead of recursing away.
//!
//! Substitution is a single pass: substituted values are never re-scanned,
//! so applying the same variable map twice yields the same output, and a
//! value that happens to contain `{{ .x }}` is inserted verbatim. Tokens
//! with no matching variable are left untouched (partials routinely show
//! literal template syntax in code samples).

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use mx_ast::Node;

use crate::attrs::require_path;
use crate::context::DocumentContext;
use crate::error::DirectiveError;

const DIRECTIVE: &str = "$Partial";

/// `{{ .varName }}`
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("token regex")
});

pub(crate) fn apply(tree: Node, ctx: &DocumentContext) -> Result<Node, DirectiveError> {
    let Node::Document { children } = tree else {
        return Ok(tree);
    };
    Ok(Node::Document {
        children: rewrite_children(children, ctx, &[])?,
    })
}

fn rewrite_children(
    children: Vec<Node>,
    ctx: &DocumentContext,
    chain: &[String],
) -> Result<Vec<Node>, DirectiveError> {
    let mut out = Vec::with_capacity(children.len());
    for child in children {
        match child {
            Node::Jsx(el) if el.name == DIRECTIVE => {
                out.extend(resolve(&el, ctx, chain)?);
            }
            Node::Jsx(mut el) => {
                el.children = rewrite_children(el.children, ctx, chain)?;
                out.push(Node::Jsx(el));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Resolve one `$Partial` directive into its replacement blocks.
fn resolve(
    el: &mx_ast::JsxElement,
    ctx: &DocumentContext,
    chain: &[String],
) -> Result<Vec<Node>, DirectiveError> {
    let line = el.position.line;
    let path = require_path(el, DIRECTIVE)?;

    if chain.iter().any(|seen| *seen == path) {
        let mut full = chain.to_vec();
        full.push(path);
        return Err(DirectiveError::CircularPartial {
            chain: full.join(" -> "),
            line,
        });
    }
    if chain.len() >= ctx.max_partial_depth {
        return Err(DirectiveError::PartialDepthExceeded {
            limit: ctx.max_partial_depth,
            line,
        });
    }

    let variables = parse_variables(el)?;
    let content = ctx.partials.read(&path)?;
    let substituted = substitute(&content, &variables);

    tracing::debug!(path = %path, depth = chain.len(), "inlining partial");

    let parsed =
        mx_parser::parse(&substituted).map_err(|source| DirectiveError::PartialParse {
            path: path.clone(),
            source,
        })?;
    let Node::Document { children } = parsed else {
        return Ok(Vec::new());
    };

    let mut next_chain = chain.to_vec();
    next_chain.push(path);
    rewrite_children(children, ctx, &next_chain)
}

/// Decode the `variables` attribute: a JSON object whose values are all
/// strings.
fn parse_variables(el: &mx_ast::JsxElement) -> Result<HashMap<String, String>, DirectiveError> {
    let line = el.position.line;
    let invalid = |message: String| DirectiveError::InvalidAttribute {
        directive: DIRECTIVE,
        attribute: "variables",
        line,
        message,
    };

    let Some(attr) = el.attribute("variables") else {
        return Ok(HashMap::new());
    };
    let Some(mx_ast::AttrValue::Expression(source)) = &attr.value else {
        return Err(invalid("must be a JSON object expression".to_owned()));
    };

    let value: serde_json::Value =
        serde_json::from_str(source).map_err(|e| invalid(format!("not valid JSON: {e}")))?;
    let serde_json::Value::Object(map) = value else {
        return Err(invalid("must be a JSON object".to_owned()));
    };

    let mut variables = HashMap::with_capacity(map.len());
    for (key, value) in map {
        let serde_json::Value::String(value) = value else {
            return Err(invalid(format!("variable `{key}` must be a string")));
        };
        variables.insert(key, value);
    }
    Ok(variables)
}

/// Replace `{{ .name }}` tokens in one pass, leaving unknown tokens as-is.
fn substitute(content: &str, variables: &HashMap<String, String>) -> String {
    TOKEN
        .replace_all(content, |caps: &Captures<'_>| {
            variables
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_owned())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_context;
    use mx_ast::{JsxAttribute, JsxElement};
    use mx_source::PartialsRoot;
    use pretty_assertions::assert_eq;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn test_substitute_replaces_known_tokens() {
        let out = substitute(
            "Use {{ .name }} with {{.name}} and {{ .other }}",
            &vars(&[("name", "acme")]),
        );
        assert_eq!(out, "Use acme with acme and {{ .other }}");
    }

    #[test]
    fn test_substitute_is_idempotent() {
        // A substituted value containing token syntax is not re-substituted
        let variables = vars(&[("a", "{{ .b }}"), ("b", "loop")]);
        let once = substitute("{{ .a }}", &variables);
        assert_eq!(once, "{{ .b }}");
        assert_eq!(substitute(&once, &variables), "loop");

        let plain = substitute("stable {{ .a }}", &vars(&[("a", "x")]));
        assert_eq!(substitute(&plain, &vars(&[("a", "x")])), plain);
    }

    fn partial_directive(path: &str) -> Node {
        Node::Jsx(
            JsxElement::new(DIRECTIVE).with_attribute(JsxAttribute::literal("path", path)),
        )
    }

    fn ctx_with_partials(files: &[(&str, &str)]) -> (tempfile::TempDir, DocumentContext) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
        let mut ctx = test_context();
        ctx.partials = PartialsRoot::new(dir.path());
        (dir, ctx)
    }

    #[test]
    fn test_resolves_nested_partials_to_fixpoint() {
        let (_dir, ctx) = ctx_with_partials(&[
            ("outer.mdx", "outer\n\n<$Partial path=\"inner.mdx\" />\n"),
            ("inner.mdx", "inner\n"),
        ]);

        let tree = Node::document(vec![partial_directive("outer.mdx")]);
        let result = apply(tree, &ctx).unwrap();

        let texts: Vec<_> = result
            .children()
            .unwrap()
            .iter()
            .map(|n| match n {
                Node::Paragraph { text, .. } => text.as_str(),
                other => panic!("unexpected node {other:?}"),
            })
            .collect();
        assert_eq!(texts, ["outer", "inner"]);
    }

    #[test]
    fn test_variables_flow_into_content() {
        let (_dir, ctx) = ctx_with_partials(&[("greet.mdx", "Hello {{ .name }}!\n")]);

        let tree = Node::document(vec![Node::Jsx(
            JsxElement::new(DIRECTIVE)
                .with_attribute(JsxAttribute::literal("path", "greet.mdx"))
                .with_attribute(JsxAttribute::expression("variables", "{ \"name\": \"world\" }")),
        )]);

        let result = apply(tree, &ctx).unwrap();
        assert!(matches!(
            &result.children().unwrap()[0],
            Node::Paragraph { text, .. } if text == "Hello world!"
        ));
    }

    #[test]
    fn test_non_string_variable_errors() {
        let (_dir, ctx) = ctx_with_partials(&[("greet.mdx", "x\n")]);

        let tree = Node::document(vec![Node::Jsx(
            JsxElement::new(DIRECTIVE)
                .with_attribute(JsxAttribute::literal("path", "greet.mdx"))
                .with_attribute(JsxAttribute::expression("variables", "{ \"n\": 1 }")),
        )]);

        let err = apply(tree, &ctx).unwrap_err();
        assert!(matches!(
            err,
            DirectiveError::InvalidAttribute { attribute: "variables", .. }
        ));
    }

    #[test]
    fn test_circular_inclusion_errors() {
        let (_dir, ctx) = ctx_with_partials(&[
            ("a.mdx", "<$Partial path=\"b.mdx\" />\n"),
            ("b.mdx", "<$Partial path=\"a.mdx\" />\n"),
        ]);

        let tree = Node::document(vec![partial_directive("a.mdx")]);
        let err = apply(tree, &ctx).unwrap_err();
        assert!(matches!(err, DirectiveError::CircularPartial { ref chain, .. }
            if chain == "/a.mdx -> /b.mdx -> /a.mdx"));
    }

    #[test]
    fn test_depth_limit() {
        // self.mdx includes itself; with cycle detection disabled this
        // would recurse, so exercise the depth guard with distinct files
        let files: Vec<(String, String)> = (0..12)
            .map(|i| {
                (
                    format!("p{i}.mdx"),
                    format!("<$Partial path=\"p{}.mdx\" />\n", i + 1),
                )
            })
            .collect();
        let file_refs: Vec<(&str, &str)> = files
            .iter()
            .map(|(n, c)| (n.as_str(), c.as_str()))
            .collect();
        let (_dir, ctx) = ctx_with_partials(&file_refs);

        let tree = Node::document(vec![partial_directive("p0.mdx")]);
        assert!(matches!(
            apply(tree, &ctx).unwrap_err(),
            DirectiveError::PartialDepthExceeded { limit: 10, .. }
        ));
    }

    #[test]
    fn test_path_escape_rejected() {
        let (_dir, ctx) = ctx_with_partials(&[]);
        let tree = Node::document(vec![partial_directive("../secrets.mdx")]);
        assert!(matches!(
            apply(tree, &ctx).unwrap_err(),
            DirectiveError::Source(_)
        ));
    }
}
