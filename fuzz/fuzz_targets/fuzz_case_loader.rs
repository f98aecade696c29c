#![no_main]

use libfuzzer_sys::fuzz_target;
use casefile::case::CaseLoader;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = CaseLoader::with_defaults();

        // Any outcome is fine as long as it doesn't panic
        let _ = loader.load_from_str(yaml_str);
    }
});
