#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let d = nfe_audit::core::normalize_number(Some(s));
        assert!(d.scale() <= nfe_audit::core::numeric::SCALE);
    }
});
