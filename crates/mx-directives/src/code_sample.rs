//! `$CodeSample` - embed source files as fenced code blocks.
//!
//! Samples resolve in three phases. First the whole tree is walked and
//! every directive is validated and collected with its index path. Then
//! all file contents are resolved concurrently: internal samples read from
//! the examples root, external samples fetch from GitHub pinned to a
//! commit. Finally each directive node is replaced one-for-one, so the
//! collected index paths stay valid throughout.
//!
//! A sample outside `$CodeTabs` becomes a `CodeSampleWrapper` element
//! carrying the canonical source URL around the code block. Samples inside
//! `$CodeTabs` become bare code blocks, and the enclosing `$CodeTabs` is
//! itself wrapped in one `CodeSampleWrapper` whose `source` merges their
//! URLs (an array expression when they differ).

use std::collections::BTreeMap;

use rayon::prelude::*;

use mx_ast::{AttrValue, CodeBlock, JsxAttribute, JsxElement, Node, Position};
use mx_source::FetchRequest;

use crate::attrs;
use crate::context::DocumentContext;
use crate::error::DirectiveError;
use crate::jsx_spans::JsxSpanIndex;
use crate::lang;
use crate::lines::{self, ElisionStyle, LineRange};

const DIRECTIVE: &str = "$CodeSample";
const TABS: &str = "$CodeTabs";

/// One collected directive, validated but not yet resolved.
struct Sample {
    /// Index path of the directive node.
    node_path: Vec<usize>,
    /// Index path of the nearest `$CodeTabs` ancestor, if any.
    tabs_path: Option<Vec<usize>>,
    /// Sample file path, leading slash included.
    file_path: String,
    /// Line selector.
    ranges: Vec<LineRange>,
    /// Info-string meta carried onto the rendered code block.
    meta: Option<String>,
    origin: Origin,
    position: Position,
}

enum Origin {
    /// Read from the examples root; linked at the canonical repo ref.
    Internal,
    /// Fetched from GitHub at a pinned commit.
    External {
        org: String,
        repo: String,
        commit: String,
    },
    /// External sample on a build without external fetching; rendered as a
    /// bare placeholder element instead of content.
    Dummy,
}

/// Resolve every `$CodeSample` in the document.
pub(crate) fn apply(doc: &mut Node, ctx: &DocumentContext) -> Result<(), DirectiveError> {
    let mut samples = Vec::new();
    collect(doc, &mut Vec::new(), None, ctx, &mut samples)?;
    if samples.is_empty() {
        return Ok(());
    }
    tracing::debug!(count = samples.len(), "resolving code samples");

    let contents: Vec<Option<String>> = samples
        .par_iter()
        .map(|sample| resolve(sample, ctx))
        .collect::<Result<_, _>>()?;

    let mut tab_sources: BTreeMap<Vec<usize>, Vec<String>> = BTreeMap::new();
    for (sample, content) in samples.iter().zip(contents) {
        let replacement = match (&sample.origin, content) {
            (Origin::Dummy, _) => {
                Node::Jsx(JsxElement::new("CodeSampleDummy").at(sample.position))
            }
            (_, Some(content)) => {
                let url = sample.url(ctx);
                let code = Node::Code(render(sample, &content));
                match &sample.tabs_path {
                    Some(tabs_path) => {
                        tab_sources.entry(tabs_path.clone()).or_default().push(url);
                        code
                    }
                    None => Node::Jsx(
                        JsxElement::new("CodeSampleWrapper")
                            .with_attribute(JsxAttribute::literal("source", url))
                            .with_children(vec![code])
                            .at(sample.position),
                    ),
                }
            }
            // resolve() yields None only for Dummy samples
            (_, None) => continue,
        };
        let replaced = doc.replace_at_path(&sample.node_path, replacement);
        debug_assert!(replaced.is_some());
    }

    // Deepest first: wrapping a tabs ancestor adds a level above it, which
    // would shift any nested tabs path below it
    for (tabs_path, urls) in tab_sources.into_iter().rev() {
        if let Some(node) = doc.node_at_path_mut(&tabs_path) {
            let position = node.position();
            let tabs = std::mem::replace(node, Node::Document { children: Vec::new() });
            *node = Node::Jsx(
                JsxElement::new("CodeSampleWrapper")
                    .with_attribute(source_attribute(&urls))
                    .with_children(vec![tabs])
                    .at(position),
            );
        }
    }
    Ok(())
}

/// Walk the tree, validating and recording every sample directive.
fn collect(
    node: &Node,
    path: &mut Vec<usize>,
    tabs_path: Option<&[usize]>,
    ctx: &DocumentContext,
    out: &mut Vec<Sample>,
) -> Result<(), DirectiveError> {
    let Some(children) = node.children() else {
        return Ok(());
    };
    let own_path;
    let tabs_path = if node.as_jsx_named(TABS).is_some() {
        own_path = path.clone();
        Some(own_path.as_slice())
    } else {
        tabs_path
    };

    for (index, child) in children.iter().enumerate() {
        path.push(index);
        if let Some(el) = child.as_jsx_named(DIRECTIVE) {
            out.push(parse_sample(el, path.clone(), tabs_path.map(<[usize]>::to_vec), ctx)?);
        } else {
            collect(child, path, tabs_path, ctx, out)?;
        }
        path.pop();
    }
    Ok(())
}

fn parse_sample(
    el: &JsxElement,
    node_path: Vec<usize>,
    tabs_path: Option<Vec<usize>>,
    ctx: &DocumentContext,
) -> Result<Sample, DirectiveError> {
    let line = el.position.line;

    // Platform-off builds turn every external sample into a placeholder
    // before any attribute checks, so a document that only resolves on
    // platform still builds everywhere else.
    if el.truthy_attribute("external") && !ctx.platform {
        return Ok(Sample {
            node_path,
            tabs_path,
            file_path: String::new(),
            ranges: Vec::new(),
            meta: None,
            origin: Origin::Dummy,
            position: el.position,
        });
    }

    let file_path = attrs::require_path(el, DIRECTIVE)?;
    let meta = attrs::optional_string(el, DIRECTIVE, "meta")?.map(ToOwned::to_owned);

    let ranges = match el.attribute("lines") {
        None => lines::FULL_FILE.to_vec(),
        Some(attr) => match &attr.value {
            Some(AttrValue::Expression(source)) => lines::parse_ranges(source, DIRECTIVE, line)?,
            _ => {
                return Err(DirectiveError::InvalidAttribute {
                    directive: DIRECTIVE,
                    attribute: "lines",
                    line,
                    message: "must be an expression like {[[1, -1]]}".to_owned(),
                });
            }
        },
    };

    let origin = if el.truthy_attribute("external") {
        let org = attrs::require_string(el, DIRECTIVE, "org")?.to_owned();
        let repo = attrs::require_string(el, DIRECTIVE, "repo")?.to_owned();
        let commit = attrs::require_string(el, DIRECTIVE, "commit")?.to_owned();
        if !ctx.allowed_orgs.iter().any(|allowed| *allowed == org) {
            return Err(DirectiveError::DisallowedOrg {
                org,
                allowed: ctx.allowed_orgs.join(", "),
                line,
            });
        }
        Origin::External { org, repo, commit }
    } else {
        Origin::Internal
    };

    Ok(Sample {
        node_path,
        tabs_path,
        file_path,
        ranges,
        meta,
        origin,
        position: el.position,
    })
}

/// Fetch or read the sample content; `None` for dummy samples.
fn resolve(sample: &Sample, ctx: &DocumentContext) -> Result<Option<String>, DirectiveError> {
    match &sample.origin {
        Origin::Internal => Ok(Some(ctx.examples.read(&sample.file_path)?)),
        Origin::External { org, repo, commit } => {
            let request = FetchRequest {
                org: org.clone(),
                repo: repo.clone(),
                commit: commit.clone(),
                path: sample.file_path.clone(),
            };
            Ok(Some(ctx.fetcher.fetch(&request)?))
        }
        Origin::Dummy => Ok(None),
    }
}

impl Sample {
    /// Canonical GitHub URL this sample links back to.
    fn url(&self, ctx: &DocumentContext) -> String {
        match &self.origin {
            Origin::External { org, repo, commit } => format!(
                "https://github.com/{org}/{repo}/blob/{commit}{}",
                self.file_path
            ),
            _ => ctx.source.internal_url(&self.file_path),
        }
    }
}

/// Render resolved content into a code block at the directive's position.
fn render(sample: &Sample, content: &str) -> CodeBlock {
    let language = lang::from_path(&sample.file_path);
    let value = if is_jsx_source(&sample.file_path) {
        let index = JsxSpanIndex::scan(content);
        lines::redact(content, &sample.ranges, &ElisionStyle::JsxAware(&index))
    } else if language == Some("sql") {
        lines::redact(content, &sample.ranges, &ElisionStyle::Sql)
    } else {
        lines::redact(content, &sample.ranges, &ElisionStyle::Plain)
    };
    CodeBlock {
        lang: language.map(ToOwned::to_owned),
        meta: sample.meta.clone(),
        value,
        position: sample.position,
    }
}

fn is_jsx_source(path: &str) -> bool {
    path.ends_with(".jsx") || path.ends_with(".tsx")
}

/// Merged `source` attribute for a `$CodeTabs` element: a string literal
/// for a single URL, a string-array expression otherwise.
fn source_attribute(urls: &[String]) -> JsxAttribute {
    let mut unique: Vec<&str> = Vec::new();
    for url in urls {
        if !unique.contains(&url.as_str()) {
            unique.push(url);
        }
    }
    if let [only] = unique.as_slice() {
        JsxAttribute::literal("source", *only)
    } else {
        let quoted: Vec<String> = unique
            .iter()
            .map(|url| format!("'{}'", url.replace('\'', "\\'")))
            .collect();
        JsxAttribute::expression("source", format!("[{}]", quoted.join(", ")))
    }
}
