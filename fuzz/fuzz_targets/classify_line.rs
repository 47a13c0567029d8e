#![no_main]

use libfuzzer_sys::fuzz_target;
use timeparse::classifier::LineClassifier;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Every line either classifies or yields a field error; never panics
        let classifier = LineClassifier::new();
        for line in input.lines() {
            let _ = classifier.classify(line);
        }
        let _ = timeparse::parse_reader(input.as_bytes());
    }
});
