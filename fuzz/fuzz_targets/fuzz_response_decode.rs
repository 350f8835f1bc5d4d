//! Fuzz target: modem response decoding and classification
//!
//! Feeds arbitrary serial bytes through `decode_lossy` and both
//! classifiers, verifying:
//! - No panics under arbitrary byte inputs
//! - Decoding only ever drops bytes
//! - A classifier match is always a substring of the decoded text
//!
//! cargo fuzz run fuzz_response_decode

#![no_main]

use libfuzzer_sys::fuzz_target;
use roomsentinel::modem::classifier::{ResponseClassifier, decode_lossy};

fuzz_target!(|data: &[u8]| {
    let text = decode_lossy(data);
    assert!(text.len() <= data.len(), "decoder grew the input");

    if core::str::from_utf8(data).is_ok() {
        assert_eq!(text.as_bytes(), data, "valid UTF-8 must pass through untouched");
    }

    for classifier in [ResponseClassifier::JOINED, ResponseClassifier::HTTP_OK] {
        if let Some(marker) = classifier.matched(&text) {
            assert!(text.contains(marker));
            assert!(classifier.is_success(&text));
        }
    }
});
