#![no_main]

use arbitrary::Arbitrary;
use goffsets::debuginfo::{DebugEntry, EntryLocation, EntryStream, RawEntry, TypeReference};
use goffsets::extract_runtime_offsets;
use libfuzzer_sys::fuzz_target;

const NAMES: &[&str] = &[
    "runtime.g", "runtime.m", "runtime.hmap", "m", "vdsoSP", "vdsoPC", "curg", "labels",
    "count", "B", "buckets",
];

#[derive(Debug, Arbitrary)]
enum Item {
    Entry {
        location: u8,
        tag: u8,
        name: Option<u8>,
        type_ref: Option<u8>,
        offset: Option<u32>,
        has_children: bool,
    },
    Terminator,
}

fuzz_target!(|items: Vec<Item>| {
    let entries = items
        .into_iter()
        .map(|item| match item {
            Item::Entry { location, tag, name, type_ref, offset, has_children } => {
                let mut entry = DebugEntry::new(
                    EntryLocation(u64::from(location)),
                    gimli::DwTag(u16::from(tag % 0x40)),
                );
                entry.name = name.map(|n| NAMES[usize::from(n) % NAMES.len()].to_string());
                entry.type_ref = type_ref.map(|r| TypeReference(EntryLocation(u64::from(r))));
                entry.member_offset = offset.map(u64::from);
                entry.has_children = has_children;
                RawEntry::Entry(entry)
            }
            Item::Terminator => RawEntry::Terminator,
        })
        .collect();

    // Malformed streams must be rejected with an error, never a panic
    if let Ok(stream) = EntryStream::new(entries) {
        let _ = extract_runtime_offsets(&stream);
    }
});
