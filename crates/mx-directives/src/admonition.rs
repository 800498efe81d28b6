//! `Admonition` normalization.
//!
//! Admonitions pass through to the renderer unchanged except that a missing
//! `type` defaults to `note` and an unrecognized `type` is an authoring
//! error, so broken callouts fail the build instead of rendering unstyled.

use mx_ast::{AttrValue, JsxAttribute, Node};

use crate::error::DirectiveError;

const ELEMENT: &str = "Admonition";

const KNOWN_TYPES: &[&str] = &["note", "tip", "caution", "danger", "deprecation"];

pub(crate) fn apply(tree: &mut Node) -> Result<(), DirectiveError> {
    if let Node::Jsx(el) = tree
        && el.name == ELEMENT
    {
        match el.attribute("type") {
            None => el.set_attribute(JsxAttribute::literal("type", "note")),
            Some(attr) => {
                let known = matches!(
                    &attr.value,
                    Some(AttrValue::Literal(value)) if KNOWN_TYPES.contains(&value.as_str())
                );
                if !known {
                    return Err(DirectiveError::UnknownAdmonitionType {
                        value: match &attr.value {
                            Some(AttrValue::Literal(v) | AttrValue::Expression(v)) => v.clone(),
                            None => String::new(),
                        },
                        line: el.position.line,
                    });
                }
            }
        }
    }

    if let Some(children) = tree.children_mut() {
        for child in children {
            apply(child)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_ast::JsxElement;

    #[test]
    fn test_missing_type_defaults_to_note() {
        let mut tree = Node::document(vec![Node::Jsx(JsxElement::new(ELEMENT))]);
        apply(&mut tree).unwrap();

        let el = tree.children().unwrap()[0].as_jsx().unwrap();
        assert_eq!(el.string_attribute("type"), Some("note"));
    }

    #[test]
    fn test_known_type_untouched() {
        let mut tree = Node::document(vec![Node::Jsx(
            JsxElement::new(ELEMENT).with_attribute(JsxAttribute::literal("type", "caution")),
        )]);
        apply(&mut tree).unwrap();

        let el = tree.children().unwrap()[0].as_jsx().unwrap();
        assert_eq!(el.string_attribute("type"), Some("caution"));
    }

    #[test]
    fn test_unknown_type_errors() {
        let mut tree = Node::document(vec![Node::Jsx(
            JsxElement::new(ELEMENT).with_attribute(JsxAttribute::literal("type", "warning")),
        )]);
        assert!(matches!(
            apply(&mut tree).unwrap_err(),
            DirectiveError::UnknownAdmonitionType { ref value, .. } if value == "warning"
        ));
    }
}
