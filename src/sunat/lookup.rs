use super::path::Path;
use super::tree::Node;

/// Trimmed text of the first element matching `path` under `ctx`.
///
/// Returns `default` when nothing matches or the element's text is empty
/// after trimming.
pub fn lookup_text(ctx: Node<'_>, path: &Path, default: &str) -> String {
    match path.first(ctx).map(|node| node.text().trim()) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

/// Attribute `attr` of the first element matching `path` under `ctx`.
///
/// Returns `default` when nothing matches or the element lacks the
/// attribute. A present attribute is returned verbatim, even if empty.
pub fn lookup_attribute(ctx: Node<'_>, path: &Path, attr: &str, default: &str) -> String {
    path.first(ctx)
        .and_then(|node| node.attribute(attr))
        .unwrap_or(default)
        .to_string()
}
