//! Currency code helpers.
//!
//! SUNAT invoices carry ISO 4217 codes, but hand-edited or legacy documents
//! sometimes spell the currency out ("SOLES", "DOLARES AMERICANOS").

/// Map a currency text to an ISO 4217 code where it is recognizable.
///
/// Soles map to `PEN` and US dollars to `USD`; anything else is returned
/// uppercased and trimmed. Empty input stays empty.
pub fn normalize_currency(text: &str) -> String {
    let upper = text.trim().to_uppercase();
    if upper.is_empty() {
        return upper;
    }
    if upper == "PEN" || upper.contains("SOL") {
        "PEN".to_string()
    } else if upper == "USD" || upper.contains("DOLAR") {
        "USD".to_string()
    } else {
        upper
    }
}

/// Check whether `code` is a known ISO 4217 currency code.
pub fn is_known_currency_code(code: &str) -> bool {
    CURRENCY_CODES.binary_search(&code).is_ok()
}

/// Currencies seen on Peruvian invoices. Sorted for binary search.
static CURRENCY_CODES: &[&str] = &[
    "ARS", // Argentine Peso
    "BOB", // Boliviano
    "BRL", // Brazilian Real
    "CAD", // Canadian Dollar
    "CHF", // Swiss Franc
    "CLP", // Chilean Peso
    "CNY", // Chinese Yuan
    "COP", // Colombian Peso
    "EUR", // Euro
    "GBP", // Pound Sterling
    "JPY", // Japanese Yen
    "MXN", // Mexican Peso
    "PEN", // Peruvian Sol
    "USD", // US Dollar
    "UYU", // Uruguayan Peso
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spelled_out_currencies() {
        assert_eq!(normalize_currency("PEN"), "PEN");
        assert_eq!(normalize_currency("pen"), "PEN");
        assert_eq!(normalize_currency("Soles"), "PEN");
        assert_eq!(normalize_currency("NUEVOS SOLES"), "PEN");
        assert_eq!(normalize_currency("usd"), "USD");
        assert_eq!(normalize_currency("Dolares Americanos"), "USD");
        assert_eq!(normalize_currency(" eur "), "EUR");
        assert_eq!(normalize_currency(""), "");
    }

    #[test]
    fn known_currencies() {
        assert!(is_known_currency_code("PEN"));
        assert!(is_known_currency_code("USD"));
        assert!(is_known_currency_code("EUR"));
        assert!(!is_known_currency_code("SOL"));
        assert!(!is_known_currency_code(""));
    }

    #[test]
    fn list_is_sorted() {
        for window in CURRENCY_CODES.windows(2) {
            assert!(
                window[0] < window[1],
                "currency codes not sorted: {} >= {}",
                window[0],
                window[1]
            );
        }
    }
}
