#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are bugs.
        if let Ok(root) = nfe_audit::core::XmlNode::parse(s) {
            let _ = root.iter().count();
            let _ = nfe_audit::core::tag_text("infNFe", Some(&root));
        }
    }
});
