//! `$CodeTabs` - group code blocks into a tabbed view.
//!
//! Runs after `$CodeSample`, so by this point every child of the directive
//! is an authored code block, a code block spliced in by a sample, or a
//! `CodeSampleWrapper` around one. The directive becomes a `CodeTabs`
//! element with a `labels` attribute.

use mx_ast::{JsxAttribute, JsxElement, Node};

use crate::error::DirectiveError;

const DIRECTIVE: &str = "$CodeTabs";

/// Rewrite every `$CodeTabs` in the document, innermost first.
pub(crate) fn apply(doc: &mut Node) -> Result<(), DirectiveError> {
    if let Some(children) = doc.children_mut() {
        for child in children.iter_mut() {
            apply(child)?;
        }
    }
    if let Node::Jsx(el) = doc {
        if el.name == DIRECTIVE {
            rewrite(el)?;
        }
    }
    Ok(())
}

fn rewrite(el: &mut JsxElement) -> Result<(), DirectiveError> {
    let mut labels = Vec::with_capacity(el.children.len());
    for (index, child) in el.children.iter().enumerate() {
        let label = match child {
            Node::Code(code) => code
                .meta
                .as_deref()
                .and_then(name_from_meta)
                .map_or_else(|| format!("File {}", index + 1), ToOwned::to_owned),
            Node::Jsx(wrapper) if wrapper.name == "CodeSampleWrapper" => wrapper
                .children
                .iter()
                .find_map(|inner| match inner {
                    Node::Code(code) => code.meta.as_deref().and_then(name_from_meta),
                    _ => None,
                })
                .map_or_else(|| format!("File {}", index + 1), ToOwned::to_owned),
            // placeholder left by an external sample on a platform-off build
            Node::Jsx(sample) if sample.name == "CodeSampleDummy" => format!("File {}", index + 1),
            _ => {
                return Err(DirectiveError::InvalidTabChild {
                    line: child.position().line,
                });
            }
        };
        labels.push(label);
    }

    el.name = "CodeTabs".to_owned();
    // serde_json string encoding doubles as JS string-literal escaping here
    let encoded: Vec<String> = labels
        .iter()
        .map(String::as_str)
        .map(serde_json::Value::from)
        .map(|v| v.to_string())
        .collect();
    el.set_attribute(JsxAttribute::expression(
        "labels",
        format!("[{}]", encoded.join(", ")),
    ));
    Ok(())
}

/// Extract the `name=` token from a code block's info-string meta.
///
/// Accepts `name=app.js` and `name="app 2.js"` forms.
fn name_from_meta(meta: &str) -> Option<&str> {
    for token in meta.split_whitespace() {
        if let Some(value) = token.strip_prefix("name=") {
            let trimmed = value.strip_prefix('"').unwrap_or(value);
            // a quoted value with spaces spans tokens; recover it from the
            // original meta instead
            if value.starts_with('"') && !value.ends_with('"') {
                let rest = &meta[meta.find(token)? + "name=\"".len()..];
                return rest.split('"').next();
            }
            return Some(trimmed.strip_suffix('"').unwrap_or(trimmed));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use mx_ast::{CodeBlock, Position};

    use super::*;

    fn code(meta: Option<&str>) -> Node {
        Node::Code(CodeBlock {
            lang: Some("javascript".to_owned()),
            meta: meta.map(ToOwned::to_owned),
            value: "const a = 1".to_owned(),
            position: Position::new(3),
        })
    }

    #[test]
    fn test_labels_from_meta_names() {
        let tabs = JsxElement::new(DIRECTIVE)
            .with_children(vec![code(Some("name=app.js")), code(Some("name=lib.js"))]);
        let mut doc = Node::document(vec![Node::Jsx(tabs)]);
        apply(&mut doc).unwrap();

        let Some(el) = doc.node_at_path(&[0]).and_then(Node::as_jsx) else {
            panic!("expected element");
        };
        assert_eq!(el.name, "CodeTabs");
        assert_eq!(
            el.expression_attribute("labels"),
            Some(r#"["app.js", "lib.js"]"#)
        );
    }

    #[test]
    fn test_fallback_labels_are_numbered() {
        let tabs = JsxElement::new(DIRECTIVE)
            .with_children(vec![code(None), code(Some("name=lib.js")), code(None)]);
        let mut doc = Node::document(vec![Node::Jsx(tabs)]);
        apply(&mut doc).unwrap();

        let Some(el) = doc.node_at_path(&[0]).and_then(Node::as_jsx) else {
            panic!("expected element");
        };
        assert_eq!(
            el.expression_attribute("labels"),
            Some(r#"["File 1", "lib.js", "File 3"]"#)
        );
    }

    #[test]
    fn test_quoted_name_with_spaces() {
        assert_eq!(name_from_meta(r#"name="app 2.js" zip"#), Some("app 2.js"));
        assert_eq!(name_from_meta(r#"name="app.js""#), Some("app.js"));
        assert_eq!(name_from_meta("zip name=app.js"), Some("app.js"));
        assert_eq!(name_from_meta("zip"), None);
    }

    #[test]
    fn test_non_code_child_errors() {
        let tabs = JsxElement::new(DIRECTIVE).with_children(vec![Node::Paragraph {
            text: "not code".to_owned(),
            position: Position::new(5),
        }]);
        let mut doc = Node::document(vec![Node::Jsx(tabs)]);

        let err = apply(&mut doc).unwrap_err();
        assert!(matches!(err, DirectiveError::InvalidTabChild { line: 5 }));
    }

    #[test]
    fn test_wrapper_child_labeled_from_inner_code() {
        let wrapper = JsxElement::new("CodeSampleWrapper")
            .with_attribute(JsxAttribute::literal("source", "https://example.com/a"))
            .with_children(vec![code(Some("name=wrapped.js"))]);
        let tabs =
            JsxElement::new(DIRECTIVE).with_children(vec![Node::Jsx(wrapper), code(None)]);
        let mut doc = Node::document(vec![Node::Jsx(tabs)]);
        apply(&mut doc).unwrap();

        let Some(el) = doc.node_at_path(&[0]).and_then(Node::as_jsx) else {
            panic!("expected element");
        };
        assert_eq!(
            el.expression_attribute("labels"),
            Some(r#"["wrapped.js", "File 2"]"#)
        );
    }
}
