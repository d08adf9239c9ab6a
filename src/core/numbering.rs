use std::fmt;

/// SUNAT document number split into series and correlative.
///
/// Electronic invoices are numbered `{series}-{correlative}`, e.g. "F001-123".
/// The series is four alphanumeric characters (`F` prefix for facturas,
/// `B` for boletas); the correlative is up to eight digits and is usually
/// written zero-padded in accounting systems ("00000123").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNumber {
    pub series: String,
    /// Correlative with non-digits removed, left-padded with zeros.
    pub correlative: String,
}

impl DocumentNumber {
    /// Width of the zero-padded correlative.
    pub const CORRELATIVE_WIDTH: usize = 8;

    /// Split `number` at its single `-`.
    ///
    /// Returns `None` when there is not exactly one separator, or when either
    /// part is empty.
    pub fn parse(number: &str) -> Option<Self> {
        let mut parts = number.trim().split('-');
        let series = parts.next()?.trim();
        let correlative = parts.next()?.trim();
        if parts.next().is_some() || series.is_empty() || correlative.is_empty() {
            return None;
        }

        let digits: String = correlative.chars().filter(|c| c.is_ascii_digit()).collect();
        Some(Self {
            series: series.to_string(),
            correlative: format!(
                "{:0>width$}",
                digits,
                width = Self::CORRELATIVE_WIDTH
            ),
        })
    }

    /// Whether the series looks like a factura series (`F` + 3 alphanumerics).
    pub fn is_factura_series(&self) -> bool {
        self.series.len() == 4
            && self.series.starts_with(['F', 'f'])
            && self.series.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.series, self.correlative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_correlative() {
        let n = DocumentNumber::parse("F001-123").unwrap();
        assert_eq!(n.series, "F001");
        assert_eq!(n.correlative, "00000123");
        assert_eq!(n.to_string(), "F001-00000123");
        assert!(n.is_factura_series());
    }

    #[test]
    fn strips_non_digits_from_correlative() {
        let n = DocumentNumber::parse(" E001-N°45 ").unwrap();
        assert_eq!(n.series, "E001");
        assert_eq!(n.correlative, "00000045");
        assert!(!n.is_factura_series());
    }

    #[test]
    fn full_width_correlative_untouched() {
        let n = DocumentNumber::parse("B002-12345678").unwrap();
        assert_eq!(n.correlative, "12345678");
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(DocumentNumber::parse(""), None);
        assert_eq!(DocumentNumber::parse("F001123"), None);
        assert_eq!(DocumentNumber::parse("F001-"), None);
        assert_eq!(DocumentNumber::parse("-123"), None);
        assert_eq!(DocumentNumber::parse("F001-1-2"), None);
    }
}
