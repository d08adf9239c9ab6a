use std::borrow::Cow;
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::lookup::{lookup_attribute, lookup_text};
use super::namespaces::NamespaceTable;
use super::path::Path;
use super::tree::{Document, Node};
use crate::core::*;

const SUPPLIER: &str = "cac:AccountingSupplierParty";
const CUSTOMER: &str = "cac:AccountingCustomerParty";
const SUPPLIER_ADDRESS_BLOCK: &str = "cac:RegistrationAddress";

/// `cbc:ID` of the payment terms that carry the detracción percentage.
const DETRACTION_TERMS_ID: &str = "Detraccion";

/// Maps SUNAT invoice documents to [`InvoiceRecord`]s.
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct Extractor {
    namespaces: NamespaceTable,
    sanitize: bool,
}

impl Extractor {
    /// Extractor with the SUNAT namespace table and sanitization enabled.
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceTable::sunat(),
            sanitize: true,
        }
    }

    /// Resolve path prefixes through `namespaces` instead of the SUNAT table.
    ///
    /// The field paths use the `cbc` and `cac` prefixes; a table that does
    /// not bind them makes every extraction fail with
    /// [`FacturaError::UnexpectedExtraction`].
    pub fn with_namespaces(mut self, namespaces: NamespaceTable) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Enable or disable [`sanitize`] before parsing (default: enabled).
    pub fn with_sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    /// Extract the five record sections from `xml`.
    ///
    /// Fails with [`FacturaError::InvalidDocument`] when the (sanitized) text
    /// is not well-formed XML, and with
    /// [`FacturaError::UnexpectedExtraction`] when mapping the parsed tree
    /// fails. Missing fields never fail: they take their defaults.
    pub fn extract(&self, xml: &str) -> Result<InvoiceRecord, FacturaError> {
        let text = if self.sanitize {
            Cow::Owned(sanitize(xml))
        } else {
            Cow::Borrowed(xml)
        };
        let doc = Document::parse(&text)?;

        let record = self
            .map_document(doc.root())
            .map_err(|e| FacturaError::UnexpectedExtraction(e.to_string()))?;

        debug!(
            invoice = %record.invoice_data.invoice_number,
            lines = record.invoice_lines.len(),
            "extracted invoice"
        );
        Ok(record)
    }

    fn map_document(&self, root: Node<'_>) -> Result<InvoiceRecord, FacturaError> {
        Ok(InvoiceRecord {
            invoice_data: self.header(root)?,
            supplier: self.party(root, SUPPLIER, Some(SUPPLIER_ADDRESS_BLOCK))?,
            customer: self.party(root, CUSTOMER, None)?,
            totals: self.totals(root)?,
            invoice_lines: self.lines(root)?,
        })
    }

    fn header(&self, root: Node<'_>) -> Result<InvoiceHeader, FacturaError> {
        Ok(InvoiceHeader {
            invoice_number: self.text(root, ".//cbc:ID")?,
            issue_date: self.text(root, ".//cbc:IssueDate")?,
            issue_time: self.text(root, ".//cbc:IssueTime")?,
            due_date: self.text(root, ".//cbc:DueDate")?,
            invoice_type_code: self.text(root, ".//cbc:InvoiceTypeCode")?,
            currency: self.text(root, ".//cbc:DocumentCurrencyCode")?,
            amount_text: self.text(root, r#".//cbc:Note[@languageLocaleID="1000"]"#)?,
            order_reference: self.text(root, ".//cac:OrderReference/cbc:ID")?,
            detraction_percent: self.detraction_percent(root)?,
        })
    }

    fn detraction_percent(&self, root: Node<'_>) -> Result<String, FacturaError> {
        let id = self.path("cbc:ID")?;
        let percent = self.path("cbc:PaymentPercent")?;
        let terms = self.path(".//cac:PaymentTerms")?.select(root);
        Ok(terms
            .into_iter()
            .find(|t| lookup_text(*t, &id, "") == DETRACTION_TERMS_ID)
            .map(|t| lookup_text(t, &percent, ""))
            .unwrap_or_default())
    }

    /// Supplier and customer share the same fields under different
    /// containers. The supplier's address line sits inside an extra
    /// `address_block` level that the customer's lookup skips.
    fn party(
        &self,
        root: Node<'_>,
        container: &str,
        address_block: Option<&str>,
    ) -> Result<Party, FacturaError> {
        let within = |rel: &str| format!(".//{container}//{rel}");
        let address = match address_block {
            Some(block) => within(&format!("{block}/cac:AddressLine/cbc:Line")),
            None => within("cac:AddressLine/cbc:Line"),
        };

        Ok(Party {
            ruc: self.text(root, &within("cbc:ID"))?,
            id_scheme: self.attribute(root, &within("cbc:ID"), "schemeID")?,
            name: self.text(root, &within("cbc:RegistrationName"))?,
            address: self.text(root, &address)?,
            district: self.text(root, &within("cbc:District"))?,
            city: self.text(root, &within("cbc:CityName"))?,
        })
    }

    fn totals(&self, root: Node<'_>) -> Result<Totals, FacturaError> {
        Ok(Totals {
            tax_total: self.amount(root, ".//cac:TaxTotal/cbc:TaxAmount")?,
            payable_amount: self.amount(root, ".//cac:LegalMonetaryTotal/cbc:PayableAmount")?,
            line_extension_amount: self
                .amount(root, ".//cac:LegalMonetaryTotal/cbc:LineExtensionAmount")?,
            tax_inclusive_amount: self
                .amount(root, ".//cac:LegalMonetaryTotal/cbc:TaxInclusiveAmount")?,
            taxable_amount: self.amount(root, ".//cac:TaxTotal/cac:TaxSubtotal/cbc:TaxableAmount")?,
        })
    }

    fn lines(&self, root: Node<'_>) -> Result<Vec<InvoiceLine>, FacturaError> {
        let id = self.path("cbc:ID")?;
        let description = self.path(".//cac:Item/cbc:Description")?;
        let quantity = self.path("cbc:InvoicedQuantity")?;
        let price = self.path(".//cac:Price/cbc:PriceAmount")?;
        let line_total = self.path("cbc:LineExtensionAmount")?;

        Ok(self
            .path(".//cac:InvoiceLine")?
            .select(root)
            .into_iter()
            .map(|line| InvoiceLine {
                id: lookup_text(line, &id, ""),
                description: lookup_text(line, &description, ""),
                quantity: lookup_text(line, &quantity, ""),
                unit_code: lookup_attribute(line, &quantity, "unitCode", ""),
                price: lookup_text(line, &price, ""),
                line_total: lookup_text(line, &line_total, ""),
            })
            .collect())
    }

    fn path(&self, expr: &str) -> Result<Path, FacturaError> {
        Path::compile(expr, &self.namespaces)
    }

    fn text(&self, ctx: Node<'_>, expr: &str) -> Result<String, FacturaError> {
        Ok(lookup_text(ctx, &self.path(expr)?, ""))
    }

    fn attribute(&self, ctx: Node<'_>, expr: &str, attr: &str) -> Result<String, FacturaError> {
        Ok(lookup_attribute(ctx, &self.path(expr)?, attr, ""))
    }

    /// Numeric field; absent, non-numeric or out-of-range text is zero.
    fn amount(&self, ctx: Node<'_>, expr: &str) -> Result<Decimal, FacturaError> {
        let raw = self.text(ctx, expr)?;
        Ok(parse_amount(&raw).unwrap_or_else(|| {
            if is_out_of_range(&raw) {
                warn!(path = expr, value = %raw, "amount exceeds decimal range, using zero");
            } else if !raw.is_empty() {
                debug!(path = expr, value = %raw, "non-numeric amount, using zero");
            }
            Decimal::ZERO
        }))
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_amount(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// A finite number that [`Decimal`] cannot hold (about ±7.9e28, or an
/// exponent beyond 28 places).
fn is_out_of_range(raw: &str) -> bool {
    raw.parse::<f64>().is_ok_and(f64::is_finite)
}

/// Extract `xml` with the default [`Extractor`].
pub fn extract(xml: &str) -> Result<InvoiceRecord, FacturaError> {
    Extractor::new().extract(xml)
}

/// Extract `xml`, logging any failure and returning `None` instead of an
/// error.
pub fn process_invoice(xml: &str) -> Option<InvoiceRecord> {
    match extract(xml) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "failed to process invoice");
            None
        }
    }
}
