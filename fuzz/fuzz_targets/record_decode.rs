//! Fuzz target for record framing.
//!
//! This fuzzer feeds arbitrary byte sequences to the record decoder,
//! checking for panics, crashes, hangs, or unbounded allocations.

#![no_main]

use kittirec::container::decode_record;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = decode_record(data);
});
