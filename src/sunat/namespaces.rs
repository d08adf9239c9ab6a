use super::ns;

/// Prefix-to-URI bindings used when compiling path expressions.
///
/// The prefixes in a path are resolved through this table, never through
/// the prefixes a document happens to declare, so a document that binds the
/// basic components to `b:` instead of `cbc:` still matches `cbc:ID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceTable {
    bindings: Vec<(String, String)>,
}

impl NamespaceTable {
    /// An empty table.
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    /// The SUNAT table: `cbc`, `cac` and `sac`.
    pub fn sunat() -> Self {
        Self::new()
            .bind("cbc", ns::CBC)
            .bind("cac", ns::CAC)
            .bind("sac", ns::SAC)
    }

    /// Bind `prefix` to `uri`, replacing an existing binding.
    pub fn bind(mut self, prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        let prefix = prefix.into();
        let uri = uri.into();
        match self.bindings.iter_mut().find(|(p, _)| *p == prefix) {
            Some(binding) => binding.1 = uri,
            None => self.bindings.push((prefix, uri)),
        }
        self
    }

    /// The URI bound to `prefix`, if any.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for NamespaceTable {
    fn default() -> Self {
        Self::sunat()
    }
}
