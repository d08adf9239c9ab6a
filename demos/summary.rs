//! Extract a SUNAT invoice file and print its summary.
//!
//! ```text
//! cargo run --example summary -- tests/fixtures/sunat/F001-00000123.xml
//! RUST_LOG=factura=debug cargo run --example summary -- invoice.xml
//! ```

use factura::summary::print_summary;
use factura::sunat;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("factura=info")),
        )
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: summary <invoice.xml>");
        std::process::exit(2);
    };

    let xml = match std::fs::read_to_string(&path) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("cannot read {path}: {e}");
            std::process::exit(1);
        }
    };

    let record = sunat::process_invoice(&xml);
    print_summary(record.as_ref());

    if let Some(number) = record
        .as_ref()
        .and_then(|r| r.invoice_data.document_number())
    {
        println!();
        println!("Document: {number} (factura series: {})", number.is_factura_series());
    }
}
