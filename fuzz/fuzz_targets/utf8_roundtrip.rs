#![no_main]

use libfuzzer_sys::fuzz_target;
use openwire_wire::utf8::{modified_utf8_len, read_utf8, write_utf8};

// Fuzz target: modified UTF-8 string codec roundtrip.
//
// Any valid Rust string must encode, report the same length as the
// length prefix, and decode back to itself.
fuzz_target!(|text: String| {
    let mut encoded = Vec::new();
    write_utf8(&mut encoded, Some(&text)).expect("encode must succeed");

    assert_eq!(encoded.len(), 4 + modified_utf8_len(&text));

    let decoded = read_utf8(&mut encoded.as_slice()).expect("decode must succeed");
    assert_eq!(decoded.as_deref(), Some(text.as_str()));
});
