//! Shared attribute validation helpers.
//!
//! Directive attributes are always literal strings, booleans, or
//! JSON-encoded structures. These helpers turn missing or mistyped
//! attributes into uniform [`DirectiveError`]s carrying position info.

use mx_ast::{AttrValue, JsxElement};

use crate::error::DirectiveError;

/// A required string-literal attribute.
pub(crate) fn require_string<'a>(
    el: &'a JsxElement,
    directive: &'static str,
    attribute: &'static str,
) -> Result<&'a str, DirectiveError> {
    let line = el.position.line;
    match el.attribute(attribute) {
        None => Err(DirectiveError::MissingAttribute {
            directive,
            attribute,
            line,
        }),
        Some(attr) => match &attr.value {
            Some(AttrValue::Literal(value)) => Ok(value),
            _ => Err(DirectiveError::InvalidAttribute {
                directive,
                attribute,
                line,
                message: "must be a string literal".to_owned(),
            }),
        },
    }
}

/// An optional string-literal attribute; present-but-not-a-string errors.
pub(crate) fn optional_string<'a>(
    el: &'a JsxElement,
    directive: &'static str,
    attribute: &'static str,
) -> Result<Option<&'a str>, DirectiveError> {
    match el.attribute(attribute) {
        None => Ok(None),
        Some(attr) => match &attr.value {
            Some(AttrValue::Literal(value)) => Ok(Some(value)),
            _ => Err(DirectiveError::InvalidAttribute {
                directive,
                attribute,
                line: el.position.line,
                message: "must be a string literal".to_owned(),
            }),
        },
    }
}

/// A directive path attribute, normalized to a leading slash.
pub(crate) fn require_path(
    el: &JsxElement,
    directive: &'static str,
) -> Result<String, DirectiveError> {
    let raw = require_string(el, directive, "path")?;
    Ok(if raw.starts_with('/') {
        raw.to_owned()
    } else {
        format!("/{raw}")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mx_ast::JsxAttribute;

    #[test]
    fn test_require_string() {
        let el = JsxElement::new("$Show").with_attribute(JsxAttribute::literal("if", "flag"));
        assert_eq!(require_string(&el, "$Show", "if").unwrap(), "flag");

        let missing = JsxElement::new("$Show");
        assert!(matches!(
            require_string(&missing, "$Show", "if").unwrap_err(),
            DirectiveError::MissingAttribute { .. }
        ));

        let expr = JsxElement::new("$Show").with_attribute(JsxAttribute::expression("if", "flag"));
        assert!(matches!(
            require_string(&expr, "$Show", "if").unwrap_err(),
            DirectiveError::InvalidAttribute { .. }
        ));
    }

    #[test]
    fn test_require_path_normalizes_leading_slash() {
        let el =
            JsxElement::new("$CodeSample").with_attribute(JsxAttribute::literal("path", "a.js"));
        assert_eq!(require_path(&el, "$CodeSample").unwrap(), "/a.js");

        let rooted =
            JsxElement::new("$CodeSample").with_attribute(JsxAttribute::literal("path", "/a.js"));
        assert_eq!(require_path(&rooted, "$CodeSample").unwrap(), "/a.js");
    }
}
