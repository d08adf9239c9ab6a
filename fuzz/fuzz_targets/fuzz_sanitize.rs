#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let once = factura::core::sanitize(s);
        assert_eq!(factura::core::sanitize(&once), once);
    }
});
