#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let record = factura::sunat::process_invoice(s);
        let _ = factura::summary::format_summary(record.as_ref());
    }
});
