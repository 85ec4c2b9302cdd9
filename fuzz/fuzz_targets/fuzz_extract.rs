#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let _ = nfe_audit::extract::extract_document(data, "11222333000144");
});
