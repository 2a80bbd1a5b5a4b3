#![no_main]

use bytes::Bytes;
use libfuzzer_sys::fuzz_target;
use openwire_message::{Message, TextMessage};

// Fuzz target: lazy decode of a received text body.
//
// Input format:
//   - First byte: bit 0 selects the compressed (inflate) path
//   - Remaining bytes: body content as received from the wire
//
// Catches bugs in:
// - Length prefix handling (negative, huge, truncated)
// - Modified UTF-8 decoding and surrogate pairing
// - Inflate error propagation and the inflated size ceiling
// - Body left unchanged after a failed decode
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let compressed = data[0] & 1 == 1;
    let content = Bytes::copy_from_slice(&data[1..]);
    let mut message = TextMessage::from_wire(Message::new(), content.clone(), compressed);

    if message.text_within(1 << 20).is_err() {
        assert_eq!(message.content(), Some(&content));
    } else {
        assert!(message.content().is_none());
    }

    let _ = message.debug_summary();
});
