use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::currencies::normalize_currency;
use super::numbering::DocumentNumber;
use super::ruc::validate_ruc;

/// The structured result of one invoice extraction.
///
/// Built fresh by every extraction call and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Document-level header fields.
    pub invoice_data: InvoiceHeader,
    /// Issuer (`cac:AccountingSupplierParty`).
    pub supplier: Party,
    /// Acquirer (`cac:AccountingCustomerParty`).
    pub customer: Party,
    /// Monetary totals.
    pub totals: Totals,
    /// One entry per `cac:InvoiceLine`, in document order.
    pub invoice_lines: Vec<InvoiceLine>,
}

impl InvoiceRecord {
    /// True when no field carries any extracted value.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Invoice header. All fields are the trimmed document text, `""` if absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Series and correlative, e.g. "F001-123".
    pub invoice_number: String,
    /// Issue date as written (normally `YYYY-MM-DD`).
    pub issue_date: String,
    /// Issue time as written.
    pub issue_time: String,
    /// Payment due date as written.
    pub due_date: String,
    /// Catalogue 01 document type (`01` = factura).
    pub invoice_type_code: String,
    /// Document currency code.
    pub currency: String,
    /// Amount in words (note with `languageLocaleID="1000"`).
    pub amount_text: String,
    /// Purchase order reference.
    pub order_reference: String,
    /// Detracción percentage from the `Detraccion` payment terms.
    pub detraction_percent: String,
}

impl InvoiceHeader {
    /// Split the invoice number into series and zero-padded correlative.
    pub fn document_number(&self) -> Option<DocumentNumber> {
        DocumentNumber::parse(&self.invoice_number)
    }

    /// The issue date as a calendar date, if it is a valid `YYYY-MM-DD`.
    pub fn issue_date_parsed(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.issue_date, "%Y-%m-%d").ok()
    }

    /// The currency normalized to an ISO 4217 code where recognizable.
    pub fn normalized_currency(&self) -> String {
        normalize_currency(&self.currency)
    }
}

/// A supplier or customer. Both roles share this shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Tax identifier (RUC for companies, DNI for individuals).
    pub ruc: String,
    /// Identity document type (`schemeID`; catalogue 06, `6` = RUC).
    pub id_scheme: String,
    /// Registered legal name.
    pub name: String,
    /// Street address line.
    pub address: String,
    pub district: String,
    pub city: String,
}

impl Party {
    /// Whether the identifier is a RUC with a correct check digit.
    pub fn has_valid_ruc(&self) -> bool {
        validate_ruc(&self.ruc).is_ok()
    }
}

/// Invoice totals. Values that are absent or not numeric are zero.
///
/// A number too large for [`Decimal`] (such as `1e30`) is also zero; the
/// extractor logs a warning when that happens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Total tax amount (IGV plus other taxes).
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_total: Decimal,
    /// Amount payable.
    #[serde(with = "rust_decimal::serde::float")]
    pub payable_amount: Decimal,
    /// Sum of line amounts, tax excluded.
    #[serde(with = "rust_decimal::serde::float")]
    pub line_extension_amount: Decimal,
    /// Total including taxes.
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_inclusive_amount: Decimal,
    /// Taxable base of the first tax subtotal.
    #[serde(with = "rust_decimal::serde::float")]
    pub taxable_amount: Decimal,
}

/// One invoice line. Quantities and amounts are kept as document text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    pub id: String,
    pub description: String,
    pub quantity: String,
    /// Unit of measure (`unitCode` of the invoiced quantity).
    pub unit_code: String,
    /// Unit price.
    pub price: String,
    /// Line amount, tax excluded.
    pub line_total: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_empty() {
        let mut record = InvoiceRecord::default();
        assert!(record.is_empty());
        record.invoice_lines.push(InvoiceLine::default());
        assert!(!record.is_empty());
    }

    #[test]
    fn header_helpers() {
        let header = InvoiceHeader {
            invoice_number: "F001-123".into(),
            issue_date: "2024-03-15".into(),
            currency: "soles".into(),
            ..Default::default()
        };
        let number = header.document_number().unwrap();
        assert_eq!(number.series, "F001");
        assert_eq!(number.correlative, "00000123");
        assert_eq!(
            header.issue_date_parsed(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(header.normalized_currency(), "PEN");
    }

    #[test]
    fn unparsable_issue_date() {
        let header = InvoiceHeader {
            issue_date: "15/03/2024".into(),
            ..Default::default()
        };
        assert_eq!(header.issue_date_parsed(), None);
    }
}
