//! SUNAT UBL invoice parsing and extraction.
//!
//! Documents are parsed into a read-only [`Document`] tree whose element
//! names are resolved against their namespace URIs. Fields are then located
//! with ElementTree-style [`Path`] expressions such as
//! `.//cac:LegalMonetaryTotal/cbc:PayableAmount`, where prefixes are bound
//! through a [`NamespaceTable`] rather than through the document's own
//! prefixes.
//!
//! # Example
//!
//! ```no_run
//! use factura::sunat::{self, Extractor};
//!
//! let xml = std::fs::read_to_string("F001-123.xml").unwrap();
//! let record = Extractor::new().extract(&xml).unwrap();
//! println!("{} {}", record.invoice_data.invoice_number, record.totals.payable_amount);
//!
//! // Or, degrading failures to `None` with a logged warning:
//! let maybe = sunat::process_invoice(&xml);
//! ```

mod extract;
mod lookup;
mod namespaces;
mod path;
mod tree;

pub use extract::{Extractor, extract, process_invoice};
pub use lookup::{lookup_attribute, lookup_text};
pub use namespaces::NamespaceTable;
pub use path::Path;
pub use tree::{Document, Node};

/// UBL 2.1 / SUNAT namespace URIs.
pub mod ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const SAC: &str =
        "urn:sunat:names:specification:ubl:peru:schema:xsd:SunatAggregateComponents-1";
}
