//! Property-based tests for sanitization and extraction.
//!
//! Run with: `cargo test --features all --test proptest_tests`

#![cfg(feature = "sunat")]

use factura::core::*;
use factura::sunat::{self, ns};
use proptest::prelude::*;
use rust_decimal::Decimal;

const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const STYLESHEET: &str = r#"<?xml-stylesheet type="text/xsl" href="factura.xsl"?>"#;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn invoice(body: &str) -> String {
    format!(
        "{DECL}\n<Invoice xmlns=\"{}\" xmlns:cbc=\"{}\" xmlns:cac=\"{}\">\n{body}\n</Invoice>",
        ns::INVOICE,
        ns::CBC,
        ns::CAC
    )
}

// ── Proptest Strategies ─────────────────────────────────────────────────────

/// One raw input line: a declaration, a stylesheet directive, or content
/// that contains neither.
fn arb_raw_line() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just(DECL.to_string()),
        1 => Just(format!("  {DECL}")),
        1 => Just(STYLESHEET.to_string()),
        1 => Just(format!("\u{feff}{STYLESHEET}")),
        4 => "[a-z/<> \t]{0,16}",
    ]
}

/// Amount in cents between -999999.99 and 999999.99.
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-99_999_999i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn arb_description() -> impl Strategy<Value = String> {
    "[A-Za-z0-9]{1,12}( [A-Za-z0-9]{1,12}){0,3}"
}

// ── Sanitizer ───────────────────────────────────────────────────────────────

proptest! {
    /// sanitize(sanitize(x)) == sanitize(x) for any text.
    #[test]
    fn sanitize_is_idempotent(raw in any::<String>()) {
        let once = sanitize(&raw);
        prop_assert_eq!(sanitize(&once), once);
    }

    /// Line-structured input keeps at most one declaration and no
    /// stylesheet directive, wherever they appeared.
    #[test]
    fn sanitize_keeps_one_declaration(lines in prop::collection::vec(arb_raw_line(), 0..12)) {
        let raw = lines.join("\n");
        let cleaned = sanitize(&raw);

        let had_declaration = lines.iter().any(|l| l.contains(DECL));
        let declarations = cleaned.lines().filter(|l| l.contains("<?xml")).count();
        prop_assert_eq!(declarations, usize::from(had_declaration));
        prop_assert!(!cleaned.contains("xml-stylesheet"));
        prop_assert!(!cleaned.starts_with('\u{feff}'), "cleaned output starts with a BOM");
        prop_assert_eq!(cleaned.trim(), cleaned.as_str());
    }
}

// ── Extraction ──────────────────────────────────────────────────────────────

proptest! {
    /// N invoice lines come back as N entries in document order.
    #[test]
    fn lines_preserve_count_and_order(
        items in prop::collection::vec((arb_description(), arb_amount()), 0..8)
    ) {
        let body: String = items
            .iter()
            .enumerate()
            .map(|(i, (description, amount))| {
                format!(
                    "<cac:InvoiceLine><cbc:ID>{}</cbc:ID>\
                     <cbc:LineExtensionAmount>{amount}</cbc:LineExtensionAmount>\
                     <cac:Item><cbc:Description>{description}</cbc:Description></cac:Item>\
                     </cac:InvoiceLine>\n",
                    i + 1
                )
            })
            .collect();

        let record = sunat::extract(&invoice(&body)).unwrap();
        prop_assert_eq!(record.invoice_lines.len(), items.len());
        for (i, (line, (description, amount))) in record.invoice_lines.iter().zip(&items).enumerate() {
            prop_assert_eq!(&line.id, &(i + 1).to_string());
            prop_assert_eq!(&line.description, description);
            prop_assert_eq!(&line.line_total, &amount.to_string());
        }
    }

    /// Decimal payable amounts survive extraction exactly.
    #[test]
    fn payable_amount_is_exact(amount in arb_amount()) {
        let xml = invoice(&format!(
            "<cac:LegalMonetaryTotal><cbc:PayableAmount currencyID=\"PEN\">{amount}</cbc:PayableAmount></cac:LegalMonetaryTotal>"
        ));
        let record = sunat::extract(&xml).unwrap();
        prop_assert_eq!(record.totals.payable_amount, amount);
    }

    /// Whatever text a total element holds, extraction succeeds and yields a
    /// number; text that is not a number yields zero.
    #[test]
    fn totals_are_always_numeric(text in "[^\r\n]{0,24}") {
        let xml = invoice(&format!(
            "<cac:TaxTotal><cbc:TaxAmount>{}</cbc:TaxAmount></cac:TaxTotal>",
            escape(&text)
        ));
        let record = sunat::extract(&xml).unwrap();
        if text.trim().chars().all(|c| c.is_alphabetic() && c != 'e' && c != 'E') {
            prop_assert_eq!(record.totals.tax_total, Decimal::ZERO);
        }
    }
}
