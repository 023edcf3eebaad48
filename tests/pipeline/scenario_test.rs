use goffsets::debuginfo::builder::{runtime_stream, StreamBuilder};
use goffsets::debuginfo::{EntryLocation, EntryStream};
use goffsets::{extract_runtime_offsets, ErrorKind, OffsetError, RuntimeOffsets};
use proptest::prelude::*;
use test_case::test_case;

use crate::test_helpers::amd64_layout;

/// Knobs for `stream`
#[derive(Default)]
struct Shape<'a> {
    /// Member to leave out entirely
    omit: Option<&'a str>,
    /// Skip `runtime.hmap`
    no_hmap: bool,
    /// Give `m` an integer type
    m_not_pointer: bool,
    /// Give `curg` an integer type
    curg_not_pointer: bool,
}

/// `runtime.m` with vdsoSP@0, vdsoPC@8, curg@16 and the goroutine's labels@24
fn stream(shape: &Shape<'_>) -> EntryStream {
    let mut builder = StreamBuilder::new();
    builder.begin_unit("runtime");
    let int = builder.base_type("int");
    let g = builder.reserve();
    let m = builder.reserve();
    let g_ptr = builder.pointer(g);
    let m_ptr = builder.pointer(m);

    let member = |builder: &mut StreamBuilder, name: &str, ty: EntryLocation, offset: u64| {
        if shape.omit != Some(name) {
            builder.member(name, ty, offset);
        }
    };

    builder.begin_struct_at(g, "runtime.g");
    member(&mut builder, "m", if shape.m_not_pointer { int } else { m_ptr }, 48);
    member(&mut builder, "labels", int, 24);
    builder.end();

    builder.begin_struct_at(m, "runtime.m");
    member(&mut builder, "vdsoSP", int, 0);
    member(&mut builder, "vdsoPC", int, 8);
    member(&mut builder, "curg", if shape.curg_not_pointer { int } else { g_ptr }, 16);
    builder.end();

    if !shape.no_hmap {
        builder.begin_struct("runtime.hmap");
        member(&mut builder, "count", int, 0);
        member(&mut builder, "B", int, 8);
        member(&mut builder, "buckets", int, 16);
        builder.end();
    }

    builder.end();
    builder.finish().unwrap()
}

#[test]
fn test_scenario_thread_fields() {
    let offsets = extract_runtime_offsets(&stream(&Shape::default())).unwrap();
    assert_eq!(offsets.m_offset, 48);
    assert_eq!(offsets.vdso_sp, 0);
    assert_eq!(offsets.vdso_pc, 8);
    assert_eq!(offsets.curg, 16);
    assert_eq!(offsets.labels, 24);
}

#[test]
fn test_scenario_hmap_fields() {
    let offsets = extract_runtime_offsets(&stream(&Shape::default())).unwrap();
    assert_eq!(offsets.hmap_count, 0);
    assert_eq!(offsets.hmap_log2_bucket_count, 8);
    assert_eq!(offsets.hmap_buckets, 16);
}

#[test]
fn test_scenario_missing_hmap() {
    let err = extract_runtime_offsets(&stream(&Shape {
        no_hmap: true,
        ..Shape::default()
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(err.exit_code(), 1);
    assert_eq!(err.to_string(), "type runtime.hmap not found");
}

#[test]
fn test_missing_goroutine_type() {
    let mut builder = StreamBuilder::new();
    builder.begin_struct("runtime.hmap");
    builder.end();
    let err = extract_runtime_offsets(&builder.finish().unwrap()).unwrap_err();
    assert!(matches!(err, OffsetError::TypeNotFound { ref name } if name == "runtime.g"));
}

#[test]
fn test_m_must_be_a_pointer() {
    let err = extract_runtime_offsets(&stream(&Shape {
        m_not_pointer: true,
        ..Shape::default()
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.to_string(), "m is DW_TAG_base_type, expected DW_TAG_pointer_type");
}

#[test]
fn test_curg_must_be_a_pointer() {
    let err = extract_runtime_offsets(&stream(&Shape {
        curg_not_pointer: true,
        ..Shape::default()
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert!(err.to_string().starts_with("curg is"));
}

#[test_case("m", "runtime.g")]
#[test_case("vdsoSP", "runtime.m")]
#[test_case("vdsoPC", "runtime.m")]
#[test_case("curg", "runtime.m")]
#[test_case("labels", "runtime.g")]
#[test_case("count", "runtime.hmap")]
#[test_case("B", "runtime.hmap")]
#[test_case("buckets", "runtime.hmap")]
fn test_missing_member_aborts(member: &str, container: &str) {
    let err = extract_runtime_offsets(&stream(&Shape {
        omit: Some(member),
        ..Shape::default()
    }))
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert_eq!(
        err.to_string(),
        format!("member {} not found in {}", member, container)
    );
}

#[test]
fn test_realistic_layout_with_unrelated_types() {
    let layout = amd64_layout();
    let stream = runtime_stream(&layout, 500).unwrap();
    assert_eq!(extract_runtime_offsets(&stream).unwrap(), layout);
}

fn any_layout() -> impl Strategy<Value = RuntimeOffsets> {
    prop::array::uniform8(0u32..0x10000).prop_map(|o| RuntimeOffsets {
        m_offset: o[0],
        vdso_sp: o[1],
        vdso_pc: o[2],
        curg: o[3],
        labels: o[4],
        hmap_count: o[5],
        hmap_log2_bucket_count: o[6],
        hmap_buckets: o[7],
    })
}

proptest! {
    #[test]
    fn prop_extraction_recovers_layout(layout in any_layout(), filler in 0usize..16) {
        let stream = runtime_stream(&layout, filler).unwrap();
        prop_assert_eq!(extract_runtime_offsets(&stream).unwrap(), layout);
    }

    #[test]
    fn prop_extraction_is_deterministic(layout in any_layout()) {
        let stream = runtime_stream(&layout, 4).unwrap();
        let first = extract_runtime_offsets(&stream).unwrap();
        let second = extract_runtime_offsets(&stream).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.to_pretty_json().unwrap(), second.to_pretty_json().unwrap());
    }
}
