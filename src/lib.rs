//! # factura
//!
//! Extraction library for Peruvian SUNAT electronic invoices (UBL 2.1).
//!
//! Raw invoice XML goes through three stages:
//!
//! 1. [`sanitize`](crate::core::sanitize) repairs common malformations
//!    (byte-order marks, repeated XML declarations, stylesheet directives).
//! 2. [`sunat::Document`] parses the result into a namespace-resolved tree.
//! 3. [`sunat::Extractor`] maps the tree into an [`InvoiceRecord`] with five
//!    sections: header, supplier, customer, totals and lines.
//!
//! Missing or malformed fields never fail an extraction: text fields default
//! to `""`, the monetary totals to zero. Only a document that is not
//! well-formed XML is rejected.
//!
//! Grand totals use [`rust_decimal::Decimal`]; line quantities and prices are
//! kept as the text found in the document.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "sunat")] {
//! let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
//! <Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
//!   xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2"
//!   xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2">
//!   <cbc:ID>F001-123</cbc:ID>
//!   <cac:LegalMonetaryTotal>
//!     <cbc:PayableAmount currencyID="PEN">1234.50</cbc:PayableAmount>
//!   </cac:LegalMonetaryTotal>
//! </Invoice>"#;
//!
//! let record = factura::sunat::extract(xml).unwrap();
//! assert_eq!(record.invoice_data.invoice_number, "F001-123");
//! assert_eq!(record.totals.payable_amount.to_string(), "1234.50");
//! assert!(record.invoice_lines.is_empty());
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` | Record types, errors, sanitizer, numbering, currencies, RUC |
//! | `sunat` (default) | XML tree, path lookups, invoice extraction |
//! | `summary` (default) | Human-readable invoice summary |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "sunat")]
pub mod sunat;

#[cfg(feature = "summary")]
pub mod summary;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
