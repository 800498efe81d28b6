//! MDX serializer.
//!
//! Inverse of the parser: raw blocks emit their stored source text, code
//! blocks are re-fenced, and JSX elements are reconstructed from their
//! attribute lists. Blocks are separated by single blank lines, so runs of
//! blank lines in the source are normalized.

use mx_ast::{AttrValue, CodeBlock, JsxAttribute, JsxElement, Node};

/// Serialize a tree back to MDX text.
///
/// The output ends with a single trailing newline.
#[must_use]
pub fn serialize(node: &Node) -> String {
    match node {
        Node::Document { children } => {
            let mut out = join_blocks(children);
            out.push('\n');
            out
        }
        _ => serialize_block(node),
    }
}

fn join_blocks(blocks: &[Node]) -> String {
    blocks
        .iter()
        .map(serialize_block)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn serialize_block(node: &Node) -> String {
    match node {
        Node::Document { children } => join_blocks(children),
        Node::Heading { text, .. }
        | Node::Paragraph { text, .. }
        | Node::List { text, .. }
        | Node::Other { text, .. } => text.clone(),
        Node::Code(code) => serialize_code(code),
        Node::Jsx(el) => serialize_jsx(el),
    }
}

fn serialize_code(code: &CodeBlock) -> String {
    // A fence must be longer than any backtick run in the content
    let longest_run = code
        .value
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(longest_run.max(2) + 1);

    let mut out = fence.clone();
    if let Some(lang) = &code.lang {
        out.push_str(lang);
    }
    if let Some(meta) = &code.meta {
        out.push(' ');
        out.push_str(meta);
    }
    out.push('\n');
    if !code.value.is_empty() {
        out.push_str(&code.value);
        out.push('\n');
    }
    out.push_str(&fence);
    out
}

fn serialize_jsx(el: &JsxElement) -> String {
    let mut open = format!("<{}", el.name);
    for attr in &el.attributes {
        open.push(' ');
        open.push_str(&serialize_attribute(attr));
    }

    if el.self_closing {
        open.push_str(" />");
        return open;
    }
    open.push('>');

    if el.children.is_empty() {
        return format!("{open}</{}>", el.name);
    }
    format!("{open}\n\n{}\n\n</{}>", join_blocks(&el.children), el.name)
}

fn serialize_attribute(attr: &JsxAttribute) -> String {
    match &attr.value {
        None => attr.name.clone(),
        Some(AttrValue::Literal(value)) => format!("{}=\"{value}\"", attr.name),
        Some(AttrValue::Expression(value)) => format!("{}={{{value}}}", attr.name),
    }
}
