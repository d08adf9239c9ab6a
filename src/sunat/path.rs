//! Namespace-qualified path expressions.
//!
//! Supports the ElementTree subset used by invoice field lookups:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `cbc:ID` | child element named `ID` in the `cbc` namespace |
//! | `*` | any child element |
//! | `a/b` | `b` children of `a` children |
//! | `.//a` | `a` descendants of the context element |
//! | `a//b` | `b` descendants of `a` children |
//! | `a[@x]` | `a` with attribute `x` |
//! | `a[@x="v"]` | `a` whose attribute `x` equals `v` |
//!
//! A leading `.` denotes the context element; `./a` is the same as `a`.
//! Absolute paths, parent steps, and positional predicates are rejected.

use std::fmt;

use super::namespaces::NamespaceTable;
use super::tree::Node;
use crate::core::FacturaError;

/// How a step moves away from the nodes selected so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Child,
    Descendant,
}

/// Which element names a step accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NameTest {
    Any,
    Name {
        namespace: Option<String>,
        local: String,
    },
}

/// An attribute filter on a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Predicate {
    HasAttribute(String),
    AttributeEquals(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub axis: Axis,
    pub name: NameTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    fn matches(&self, node: &Node<'_>) -> bool {
        let name_ok = match &self.name {
            NameTest::Any => true,
            NameTest::Name { namespace, local } => node.is(namespace.as_deref(), local),
        };
        name_ok
            && self.predicates.iter().all(|p| match p {
                Predicate::HasAttribute(name) => node.attribute(name).is_some(),
                Predicate::AttributeEquals(name, value) => {
                    node.attribute(name) == Some(value.as_str())
                }
            })
    }
}

/// A compiled path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    expr: String,
    steps: Vec<Step>,
}

impl Path {
    /// Compile `expr`, resolving its prefixes through `namespaces`.
    pub fn compile(expr: &str, namespaces: &NamespaceTable) -> Result<Self, FacturaError> {
        let mut rest = expr.trim();
        if rest.is_empty() {
            return Err(FacturaError::invalid_path(expr, "empty expression"));
        }
        if rest.starts_with('/') {
            return Err(FacturaError::invalid_path(expr, "absolute paths are not supported"));
        }

        let mut axis = Axis::Child;
        if let Some(after_dot) = rest.strip_prefix('.') {
            if after_dot.is_empty() {
                return Ok(Self {
                    expr: expr.to_string(),
                    steps: Vec::new(),
                });
            }
            if let Some(r) = after_dot.strip_prefix("//") {
                axis = Axis::Descendant;
                rest = r;
            } else if let Some(r) = after_dot.strip_prefix('/') {
                rest = r;
            } else {
                return Err(FacturaError::invalid_path(expr, "expected '/' after '.'"));
            }
        }

        let mut steps = Vec::new();
        loop {
            let (text, tail) = split_step(rest);
            steps.push(parse_step(expr, text, axis, namespaces)?);
            match tail {
                None => break,
                Some(r) => match r.strip_prefix('/') {
                    Some(r) => {
                        axis = Axis::Descendant;
                        rest = r;
                    }
                    None => {
                        axis = Axis::Child;
                        rest = r;
                    }
                },
            }
        }

        Ok(Self {
            expr: expr.to_string(),
            steps,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.expr
    }

    /// All matching elements under `ctx`, in document order, without
    /// duplicates.
    pub fn select<'a>(&self, ctx: Node<'a>) -> Vec<Node<'a>> {
        let mut current = vec![ctx];
        for step in &self.steps {
            let mut next: Vec<Node<'a>> = Vec::new();
            match step.axis {
                Axis::Child => {
                    for node in &current {
                        next.extend(node.children().filter(|n| step.matches(n)));
                    }
                }
                Axis::Descendant => {
                    // `current` is sorted: a node inside an already scanned
                    // subtree contributes nothing new.
                    let mut scanned_until = 0;
                    for node in &current {
                        if node.index() < scanned_until {
                            continue;
                        }
                        scanned_until = node.subtree_end();
                        next.extend(node.descendants().filter(|n| step.matches(n)));
                    }
                }
            }
            next.sort_by_key(|n| n.index());
            next.dedup();
            if next.is_empty() {
                return next;
            }
            current = next;
        }
        current
    }

    /// The first match in document order.
    pub fn first<'a>(&self, ctx: Node<'a>) -> Option<Node<'a>> {
        self.select(ctx).into_iter().next()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expr)
    }
}

/// Split off the first step: everything up to the first `/` outside
/// brackets and quotes. The tail starts right after that `/`.
fn split_step(s: &str) -> (&str, Option<&str>) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in s.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, '/') if depth == 0 => return (&s[..i], Some(&s[i + 1..])),
            _ => {}
        }
    }
    (s, None)
}

fn parse_step(
    expr: &str,
    text: &str,
    axis: Axis,
    namespaces: &NamespaceTable,
) -> Result<Step, FacturaError> {
    let (name, mut preds) = match text.find('[') {
        Some(i) => (&text[..i], &text[i..]),
        None => (text, ""),
    };

    let name = match name {
        "" => return Err(FacturaError::invalid_path(expr, "empty step")),
        "*" => NameTest::Any,
        "." | ".." => {
            return Err(FacturaError::invalid_path(
                expr,
                format!("unsupported step '{name}'"),
            ));
        }
        _ => {
            let (namespace, local) = match name.split_once(':') {
                Some((prefix, local)) => {
                    let uri = namespaces.resolve(prefix).ok_or_else(|| {
                        FacturaError::invalid_path(expr, format!("unknown prefix '{prefix}'"))
                    })?;
                    (Some(uri.to_string()), local)
                }
                None => (None, name),
            };
            if !is_name(local) {
                return Err(FacturaError::invalid_path(
                    expr,
                    format!("invalid element name '{name}'"),
                ));
            }
            NameTest::Name {
                namespace,
                local: local.to_string(),
            }
        }
    };

    let mut predicates = Vec::new();
    while !preds.is_empty() {
        let close = preds
            .strip_prefix('[')
            .and_then(|p| find_close(p).map(|i| i + 1))
            .ok_or_else(|| FacturaError::invalid_path(expr, "unterminated predicate"))?;
        predicates.push(parse_predicate(expr, &preds[1..close])?);
        preds = &preds[close + 1..];
    }

    Ok(Step {
        axis,
        name,
        predicates,
    })
}

/// Index of the `]` closing a predicate body, skipping quoted text.
fn find_close(body: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in body.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, ']') => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_predicate(expr: &str, body: &str) -> Result<Predicate, FacturaError> {
    let unsupported =
        || FacturaError::invalid_path(expr, format!("unsupported predicate '[{body}]'"));

    let attr = body.trim().strip_prefix('@').ok_or_else(unsupported)?;
    match attr.split_once('=') {
        None if is_name(attr.trim()) => Ok(Predicate::HasAttribute(attr.trim().to_string())),
        None => Err(unsupported()),
        Some((name, value)) => {
            let name = name.trim();
            let value = value.trim();
            let unquoted = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
            match unquoted {
                Some(v) if is_name(name) && value.len() >= 2 => {
                    Ok(Predicate::AttributeEquals(name.to_string(), v.to_string()))
                }
                _ => Err(unsupported()),
            }
        }
    }
}

/// Element or attribute name, optionally prefixed (`schemeID`, `xsi:type`).
fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}
