//! MDX JSX flow elements and their attributes.

use crate::{Node, Position};

/// Value of a JSX attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Quoted string literal: `path="/a.js"`.
    Literal(String),
    /// Brace-delimited expression, raw source: `lines={[[1, -1]]}`.
    Expression(String),
}

/// A single attribute on a JSX element.
///
/// A bare attribute (`external`) has no value and reads as boolean true,
/// matching the JSX shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxAttribute {
    /// Attribute name.
    pub name: String,
    /// Attribute value; `None` for bare attributes.
    pub value: Option<AttrValue>,
}

impl JsxAttribute {
    /// Create a string-literal attribute.
    #[must_use]
    pub fn literal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(AttrValue::Literal(value.into())),
        }
    }

    /// Create an expression attribute with the given raw source.
    #[must_use]
    pub fn expression(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(AttrValue::Expression(value.into())),
        }
    }

    /// Create a bare (valueless) attribute.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// An MDX JSX flow element (`<$CodeSample ... />`, `<Admonition>...</Admonition>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsxElement {
    /// Element name, including any `$` directive prefix.
    pub name: String,
    /// Ordered attribute list.
    pub attributes: Vec<JsxAttribute>,
    /// Child blocks; empty for self-closing elements.
    pub children: Vec<Node>,
    /// Whether the element was written self-closing (`<X />`).
    pub self_closing: bool,
    /// Source position.
    pub position: Position,
}

impl JsxElement {
    /// Create a self-closing element with no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: true,
            position: Position::default(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attr: JsxAttribute) -> Self {
        self.attributes.push(attr);
        self
    }

    /// Set the children; the element is no longer self-closing.
    #[must_use]
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self.self_closing = false;
        self
    }

    /// Set the source position.
    #[must_use]
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Look up an attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&JsxAttribute> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// String-literal value of an attribute, if present and literal.
    #[must_use]
    pub fn string_attribute(&self, name: &str) -> Option<&str> {
        match self.attribute(name)?.value.as_ref()? {
            AttrValue::Literal(value) => Some(value),
            AttrValue::Expression(_) => None,
        }
    }

    /// Raw expression source of an attribute, if present and an expression.
    #[must_use]
    pub fn expression_attribute(&self, name: &str) -> Option<&str> {
        match self.attribute(name)?.value.as_ref()? {
            AttrValue::Expression(value) => Some(value),
            AttrValue::Literal(_) => None,
        }
    }

    /// Whether an attribute reads as boolean true.
    ///
    /// True for a bare attribute, the literal `"true"`, or the expression
    /// `{true}`.
    #[must_use]
    pub fn truthy_attribute(&self, name: &str) -> bool {
        match self.attribute(name) {
            Some(attr) => match &attr.value {
                None => true,
                Some(AttrValue::Literal(value)) => value == "true",
                Some(AttrValue::Expression(value)) => value.trim() == "true",
            },
            None => false,
        }
    }

    /// Replace or insert an attribute, keeping attribute order stable.
    pub fn set_attribute(&mut self, attr: JsxAttribute) {
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == attr.name) {
            *existing = attr;
        } else {
            self.attributes.push(attr);
        }
    }
}
