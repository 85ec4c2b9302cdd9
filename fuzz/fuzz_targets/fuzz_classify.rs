#![no_main]

use libfuzzer_sys::fuzz_target;
use nfe_audit::core::AuditConfig;

fuzz_target!(|data: &[u8]| {
    let Ok(config) = AuditConfig::new("11222333000144") else {
        return;
    };
    let _ = nfe_audit::classify::classify_document(data, "fuzz.xml", &config);
    // the same bytes as an archive must fail cleanly
    let source = nfe_audit::core::InputSource::new("fuzz.zip", data);
    let _ = nfe_audit::classify::classify_batch(&[source], &config);
});
