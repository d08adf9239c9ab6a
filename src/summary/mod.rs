//! Human-readable invoice summaries.

use std::fmt::Write;

use crate::core::{InvoiceRecord, Party};

/// Shown in place of a summary when there is nothing to summarize.
pub const NO_INVOICE_DATA: &str = "No invoice data to display";

/// Render `record` as a plain-text summary.
///
/// `None` and an all-default record both render [`NO_INVOICE_DATA`].
/// Totals are printed with two decimals; line blocks follow document order.
pub fn format_summary(record: Option<&InvoiceRecord>) -> String {
    let Some(record) = record.filter(|r| !r.is_empty()) else {
        return format!("{NO_INVOICE_DATA}\n");
    };

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write_summary(&mut out, record);
    out
}

/// Print [`format_summary`] to standard output.
pub fn print_summary(record: Option<&InvoiceRecord>) {
    print!("{}", format_summary(record));
}

fn write_summary(out: &mut String, record: &InvoiceRecord) -> std::fmt::Result {
    let header = &record.invoice_data;
    writeln!(out, "=== INVOICE SUMMARY ===")?;
    writeln!(out, "Number: {}", header.invoice_number)?;
    writeln!(out, "Date: {}", header.issue_date)?;
    writeln!(out, "Currency: {}", header.currency)?;

    write_party(out, "SUPPLIER", &record.supplier)?;
    write_party(out, "CUSTOMER", &record.customer)?;

    writeln!(out)?;
    writeln!(out, "TOTALS:")?;
    writeln!(out, "Tax: {:.2}", record.totals.tax_total)?;
    writeln!(out, "Total: {:.2}", record.totals.payable_amount)?;

    writeln!(out)?;
    writeln!(out, "LINES:")?;
    for line in &record.invoice_lines {
        writeln!(out)?;
        writeln!(out, "- {}", line.description)?;
        writeln!(out, "  Quantity: {}", line.quantity)?;
        writeln!(out, "  Price: {}", line.price)?;
        writeln!(out, "  Subtotal: {}", line.line_total)?;
    }
    Ok(())
}

fn write_party(out: &mut String, title: &str, party: &Party) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{title}:")?;
    writeln!(out, "RUC: {}", party.ruc)?;
    writeln!(out, "Name: {}", party.name)
}
