use std::collections::HashSet;

use gimli::{DW_TAG_pointer_type, DW_TAG_structure_type};
use goffsets::debuginfo::builder::StreamBuilder;
use goffsets::debuginfo::EntryLocation;
use goffsets::{ErrorKind, Navigator};
use proptest::prelude::*;

#[test]
fn test_members_resolve_in_any_order() {
    let mut builder = StreamBuilder::new();
    let int = builder.base_type("int");
    let hmap = builder.begin_struct("runtime.hmap");
    builder.member("count", int, 0);
    builder.member("B", int, 9);
    builder.member("buckets", int, 16);
    builder.end();
    let stream = builder.finish().unwrap();

    let nav = Navigator::new(&stream).unwrap();
    let container = stream.get(hmap).unwrap();
    assert_eq!(nav.resolve_member(container, "buckets").unwrap().offset, 16);
    assert_eq!(nav.resolve_member(container, "count").unwrap().offset, 0);
    assert_eq!(nav.resolve_member(container, "B").unwrap().offset, 9);
    assert_eq!(nav.resolve_member(container, "buckets").unwrap().offset, 16);
}

#[test]
fn test_member_lookup_does_not_leak_into_siblings() {
    let mut builder = StreamBuilder::new();
    let int = builder.base_type("int");
    let first = builder.begin_struct("first");
    builder.end();
    builder.begin_struct("second");
    builder.member("count", int, 8);
    builder.end();
    let stream = builder.finish().unwrap();

    let nav = Navigator::new(&stream).unwrap();
    let err = nav.resolve_member(stream.get(first).unwrap(), "count").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.to_string(), "member count not found in first");
}

#[test]
fn test_member_without_offset_is_a_stream_error() {
    let mut builder = StreamBuilder::new();
    let holder = builder.begin_struct("holder");
    builder.leaf(gimli::DW_TAG_member, "bare");
    builder.end();
    let stream = builder.finish().unwrap();

    let nav = Navigator::new(&stream).unwrap();
    let err = nav.resolve_member(stream.get(holder).unwrap(), "bare").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Stream);
}

#[test]
fn test_dereference_yields_pointer_then_pointee() {
    let mut builder = StreamBuilder::new();
    let m = builder.reserve();
    let m_ptr = builder.pointer(m);
    let g = builder.begin_struct("runtime.g");
    builder.member("m", m_ptr, 48);
    builder.end();
    builder.begin_struct_at(m, "runtime.m");
    builder.end();
    let stream = builder.finish().unwrap();

    let nav = Navigator::new(&stream).unwrap();
    let field = nav.resolve_member(stream.get(g).unwrap(), "m").unwrap();
    let pointer = nav.dereference(field.type_ref).unwrap();
    assert_eq!(pointer.tag, DW_TAG_pointer_type);
    let pointee = nav.dereference(pointer.type_ref.unwrap()).unwrap();
    assert_eq!(pointee.tag, DW_TAG_structure_type);
    assert_eq!(pointee.location, m);
}

#[test]
fn test_pointer_to_non_struct_is_a_mismatch() {
    let mut builder = StreamBuilder::new();
    let int = builder.base_type("int");
    let int_ptr = builder.pointer(int);
    let g = builder.begin_struct("runtime.g");
    builder.member("m", int_ptr, 48);
    builder.end();
    let stream = builder.finish().unwrap();

    let nav = Navigator::new(&stream).unwrap();
    let field = nav.resolve_member(stream.get(g).unwrap(), "m").unwrap();
    let err = nav.pointee_struct(&field).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

proptest! {
    /// Keyed member lookup agrees with a full cursor enumeration of the
    /// child list, first match winning for repeated names
    #[test]
    fn prop_lookup_matches_enumeration(
        members in prop::collection::vec(("[a-f]{1,2}", 0u64..4096), 1..24)
    ) {
        let mut builder = StreamBuilder::new();
        builder.begin_unit("prop");
        let int = builder.base_type("int");
        let target = builder.begin_struct("target");
        for (name, offset) in &members {
            builder.member(name, int, *offset);
        }
        builder.end();
        builder.end();
        let stream = builder.finish().unwrap();

        let nav = Navigator::new(&stream).unwrap();
        let container = stream.get(target).unwrap();
        let children = stream.cursor().children(target).unwrap();
        prop_assert_eq!(children.len(), members.len());

        let mut seen = HashSet::new();
        for (name, _) in &members {
            if !seen.insert(name.clone()) {
                continue;
            }
            let enumerated = children.iter().find(|child| child.is_named(name)).unwrap();
            let resolved = nav.resolve_member(container, name).unwrap();
            prop_assert_eq!(Some(resolved.offset), enumerated.member_offset);
            prop_assert_eq!(resolved.location, enumerated.location);
        }
    }

    #[test]
    fn prop_unknown_locations_never_resolve(raw in 10_000u64..u64::MAX) {
        let mut builder = StreamBuilder::new();
        builder.base_type("int");
        let stream = builder.finish().unwrap();

        let nav = Navigator::new(&stream).unwrap();
        let err = nav.dereference(goffsets::debuginfo::TypeReference(EntryLocation(raw))).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::Stream);
    }
}
