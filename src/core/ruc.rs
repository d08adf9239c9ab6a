//! RUC (Registro Único de Contribuyentes) format validation.

use std::fmt;

/// Error returned when a RUC fails format validation.
#[derive(Debug, Clone)]
pub struct RucFormatError {
    /// The invalid input value.
    pub value: String,
    /// Why the value failed validation.
    pub reason: String,
}

impl fmt::Display for RucFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid RUC '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for RucFormatError {}

/// Taxpayer type prefixes: individuals (10), non-domiciled (15),
/// other (16, 17), legal entities (20).
const VALID_PREFIXES: &[&str] = &["10", "15", "16", "17", "20"];

const CHECK_WEIGHTS: [u32; 10] = [5, 4, 3, 2, 7, 6, 5, 4, 3, 2];

/// Validate a RUC by format and modulo-11 check digit (no network call).
pub fn validate_ruc(ruc: &str) -> Result<(), RucFormatError> {
    let ruc = ruc.trim();
    let fail = |reason: &str| RucFormatError {
        value: ruc.to_string(),
        reason: reason.to_string(),
    };

    if ruc.len() != 11 || !ruc.bytes().all(|b| b.is_ascii_digit()) {
        return Err(fail("must be exactly 11 digits"));
    }
    if !VALID_PREFIXES.contains(&&ruc[..2]) {
        return Err(fail("unknown taxpayer type prefix"));
    }

    let digits: Vec<u32> = ruc.bytes().map(|b| u32::from(b - b'0')).collect();
    if check_digit(&digits[..10]) != digits[10] {
        return Err(fail("check digit mismatch"));
    }
    Ok(())
}

fn check_digit(body: &[u32]) -> u32 {
    let sum: u32 = body.iter().zip(CHECK_WEIGHTS).map(|(d, w)| d * w).sum();
    match 11 - sum % 11 {
        10 => 0,
        11 => 1,
        d => d,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_rucs() {
        assert!(validate_ruc("20131312955").is_ok());
        assert!(validate_ruc("20100070970").is_ok());
        assert!(validate_ruc(" 20131312955 ").is_ok());
    }

    #[test]
    fn wrong_check_digit() {
        let err = validate_ruc("20131312956").unwrap_err();
        assert_eq!(err.reason, "check digit mismatch");
    }

    #[test]
    fn wrong_shape() {
        assert!(validate_ruc("").is_err());
        assert!(validate_ruc("2013131295").is_err());
        assert!(validate_ruc("2013131295X").is_err());
        assert_eq!(
            validate_ruc("30131312955").unwrap_err().reason,
            "unknown taxpayer type prefix"
        );
    }

    #[test]
    fn display() {
        let err = validate_ruc("123").unwrap_err();
        assert_eq!(err.to_string(), "invalid RUC '123': must be exactly 11 digits");
    }
}
