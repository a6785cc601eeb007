// Copyright (c) 2026 Memechain
// Licensed under the Apache-2.0 License.

#![no_main]
#![forbid(unsafe_code)]

use libfuzzer_sys::fuzz_target;
use memechain::networking::message::Message;

fuzz_target!(|data: &[u8]| {
    // Any peer can send anything; decoding must never panic.
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(msg) = Message::decode(s) {
            let raw = msg.encode().expect("decoded message re-encodes");
            assert_eq!(Message::decode(&raw).expect("re-decodes"), msg);
        }
    }
});
