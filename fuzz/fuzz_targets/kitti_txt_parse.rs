//! Fuzz target for KITTI annotation text parsing.
//!
//! This fuzzer feeds arbitrary UTF-8 blocks to the label parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use kittirec::label::parse_label_block;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(block) = std::str::from_utf8(data) else {
        return;
    };

    let _ = parse_label_block(block);
});
