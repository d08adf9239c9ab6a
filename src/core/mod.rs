//! Core record types, errors, and document-independent helpers.
//!
//! Nothing in this module touches XML parsing; it holds the output shape of
//! an extraction, the pre-parse sanitizer, and small SUNAT domain helpers
//! (document numbers, currency codes, RUC check digits).

mod currencies;
mod error;
mod numbering;
pub mod ruc;
mod sanitize;
mod types;

pub use currencies::{is_known_currency_code, normalize_currency};
pub use error::*;
pub use numbering::*;
pub use ruc::{RucFormatError, validate_ruc};
pub use sanitize::*;
pub use types::*;
