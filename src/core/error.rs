use thiserror::Error;

/// Errors that can occur while extracting an invoice.
///
/// Missing fields are not errors: lookups fall back to their defaults. Only
/// a document that cannot be parsed, or a failure while walking the parsed
/// tree, ends an extraction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FacturaError {
    /// The (sanitized) text is not well-formed XML.
    #[error("invalid XML document: {0}")]
    InvalidDocument(String),

    /// Any other failure encountered while mapping the parsed tree.
    #[error("unexpected extraction error: {0}")]
    UnexpectedExtraction(String),

    /// A path expression could not be compiled against the namespace table.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending expression.
        path: String,
        /// Why it was rejected.
        reason: String,
    },
}

impl FacturaError {
    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error means the input was not well-formed XML.
    pub fn is_invalid_document(&self) -> bool {
        matches!(self, Self::InvalidDocument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_cause() {
        let e = FacturaError::InvalidDocument("unclosed element <cbc:ID>".into());
        assert_eq!(e.to_string(), "invalid XML document: unclosed element <cbc:ID>");

        let e = FacturaError::invalid_path("x:ID", "unknown prefix 'x'");
        assert_eq!(e.to_string(), "invalid path 'x:ID': unknown prefix 'x'");
        assert!(!e.is_invalid_document());
    }
}
