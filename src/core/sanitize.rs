use tracing::debug;

const BOM: char = '\u{feff}';
const XML_DECL: &str = "<?xml";
const XML_STYLESHEET: &str = "<?xml-stylesheet";

/// Normalize raw invoice text before parsing.
///
/// Some issuers emit documents that no strict parser accepts: a byte-order
/// mark in front of the declaration, the XML declaration repeated (usually
/// from concatenating templates), or an `<?xml-stylesheet?>` directive that is
/// itself malformed. This function works line by line:
///
/// - every line is trimmed;
/// - lines containing `<?xml-stylesheet` are dropped;
/// - only the first line containing `<?xml` is kept, later ones are dropped;
/// - all other lines are kept.
///
/// Leading/trailing whitespace and byte-order marks are removed from the
/// result, which makes the transformation idempotent.
pub fn sanitize(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut seen_declaration = false;
    let mut dropped = 0usize;

    for line in split_lines(trim_document(raw)) {
        let line = line.trim();
        if line.contains(XML_STYLESHEET) {
            dropped += 1;
        } else if line.contains(XML_DECL) {
            if seen_declaration {
                dropped += 1;
            } else {
                seen_declaration = true;
                kept.push(line);
            }
        } else {
            kept.push(line);
        }
    }

    if dropped > 0 {
        debug!(dropped, "sanitizer removed processing-instruction lines");
    }

    trim_document(&kept.join("\n")).to_string()
}

fn split_lines(s: &str) -> impl Iterator<Item = &str> {
    s.split('\n')
        .flat_map(|line| line.strip_suffix('\r').unwrap_or(line).split('\r'))
}

fn trim_document(s: &str) -> &str {
    s.trim_matches(|c: char| c == BOM || c.is_whitespace())
}
