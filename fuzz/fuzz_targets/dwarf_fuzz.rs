#![no_main]

use std::path::Path;

use goffsets::platform::dwarf::load_entry_stream;
use goffsets::{extract_runtime_offsets, Navigator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce an error, never a panic
    if let Ok(stream) = load_entry_stream(data, Path::new("fuzz")) {
        if let Ok(nav) = Navigator::new(&stream) {
            let _ = nav.locate_struct("runtime.g");
        }
        let _ = extract_runtime_offsets(&stream);
    }
});
