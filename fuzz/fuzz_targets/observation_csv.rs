#![no_main]

use escala::store::{decode, encode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Loading must never panic, whatever is on disk
    let loaded = decode(data);

    // Whatever survived decoding must be writable again
    let _ = encode(&loaded.value);
});
