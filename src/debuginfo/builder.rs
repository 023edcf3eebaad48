//! Synthetic entry streams
//!
//! Builds streams in memory, without an object file, for tests, fuzzing and
//! benchmarks. Entries get sequential locations; `reserve` hands out a
//! location up front so a pointer can refer to a struct defined later.

use gimli::{
    DwTag, DW_TAG_base_type, DW_TAG_compile_unit, DW_TAG_member, DW_TAG_pointer_type,
    DW_TAG_structure_type,
};

use crate::debuginfo::cursor::EntryStream;
use crate::debuginfo::entry::{DebugEntry, EntryLocation, RawEntry, TypeReference};
use crate::error::Result;
use crate::runtime::record::RuntimeOffsets;

/// Incremental builder for an `EntryStream`
#[derive(Debug)]
pub struct StreamBuilder {
    entries: Vec<RawEntry>,
    next_location: u64,
}

impl StreamBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_location: 1,
        }
    }

    /// Hand out a fresh location without emitting an entry
    pub fn reserve(&mut self) -> EntryLocation {
        let location = EntryLocation(self.next_location);
        self.next_location += 1;
        location
    }

    /// Append a fully specified entry
    pub fn push(&mut self, entry: DebugEntry) -> EntryLocation {
        let location = entry.location;
        self.entries.push(RawEntry::Entry(entry));
        location
    }

    /// Append a terminator, closing the innermost open child list
    pub fn end(&mut self) {
        self.entries.push(RawEntry::Terminator);
    }

    /// Open a compilation unit
    pub fn begin_unit(&mut self, name: &str) -> EntryLocation {
        let location = self.reserve();
        self.begin_at(location, DW_TAG_compile_unit, name)
    }

    /// Open a structured type
    pub fn begin_struct(&mut self, name: &str) -> EntryLocation {
        let location = self.reserve();
        self.begin_struct_at(location, name)
    }

    /// Open a structured type at a reserved location
    pub fn begin_struct_at(&mut self, location: EntryLocation, name: &str) -> EntryLocation {
        self.begin_at(location, DW_TAG_structure_type, name)
    }

    /// Open a container entry with an arbitrary tag
    pub fn begin_at(&mut self, location: EntryLocation, tag: DwTag, name: &str) -> EntryLocation {
        let mut entry = DebugEntry::new(location, tag);
        entry.name = Some(name.to_string());
        entry.has_children = true;
        self.push(entry)
    }

    /// Append a leaf entry with a name and tag
    pub fn leaf(&mut self, tag: DwTag, name: &str) -> EntryLocation {
        let location = self.reserve();
        let mut entry = DebugEntry::new(location, tag);
        entry.name = Some(name.to_string());
        self.push(entry)
    }

    /// Append a base type
    pub fn base_type(&mut self, name: &str) -> EntryLocation {
        self.leaf(DW_TAG_base_type, name)
    }

    /// Append a pointer type to `pointee`
    pub fn pointer(&mut self, pointee: EntryLocation) -> EntryLocation {
        let location = self.reserve();
        let mut entry = DebugEntry::new(location, DW_TAG_pointer_type);
        entry.type_ref = Some(TypeReference(pointee));
        self.push(entry)
    }

    /// Append a data member of type `ty` at `offset`
    pub fn member(&mut self, name: &str, ty: EntryLocation, offset: u64) -> EntryLocation {
        let location = self.reserve();
        let mut entry = DebugEntry::new(location, DW_TAG_member);
        entry.name = Some(name.to_string());
        entry.type_ref = Some(TypeReference(ty));
        entry.member_offset = Some(offset);
        self.push(entry)
    }

    /// Finish the stream
    ///
    /// Child lists are not checked for balance here, so malformed streams
    /// can be built on purpose.
    pub fn finish(self) -> Result<EntryStream> {
        EntryStream::new(self.entries)
    }
}

impl Default for StreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build a stream shaped like a Go binary's runtime types
///
/// Extraction over the result yields `layout`. `filler` unrelated struct
/// types are emitted ahead of the runtime ones.
pub fn runtime_stream(layout: &RuntimeOffsets, filler: usize) -> Result<EntryStream> {
    let mut builder = StreamBuilder::new();
    builder.begin_unit("runtime");
    let uintptr = builder.base_type("uintptr");
    let int = builder.base_type("int");
    let uint8 = builder.base_type("uint8");

    for i in 0..filler {
        builder.begin_struct(&format!("main.filler{}", i));
        builder.member("a", int, 0);
        builder.member("b", uintptr, 8);
        builder.end();
    }

    let g = builder.reserve();
    let m = builder.reserve();
    let g_ptr = builder.pointer(g);
    let m_ptr = builder.pointer(m);
    let unsafe_ptr = builder.leaf(DW_TAG_pointer_type, "unsafe.Pointer");

    builder.begin_struct_at(g, "runtime.g");
    builder.member("goid", int, 152);
    builder.member("m", m_ptr, u64::from(layout.m_offset));
    builder.member("labels", unsafe_ptr, u64::from(layout.labels));
    builder.end();

    builder.begin_struct_at(m, "runtime.m");
    builder.member("g0", g_ptr, 0);
    builder.member("vdsoSP", uintptr, u64::from(layout.vdso_sp));
    builder.member("vdsoPC", uintptr, u64::from(layout.vdso_pc));
    builder.member("curg", g_ptr, u64::from(layout.curg));
    builder.end();

    builder.begin_struct("runtime.hmap");
    builder.member("count", int, u64::from(layout.hmap_count));
    builder.member("flags", uint8, 8);
    builder.member("B", uint8, u64::from(layout.hmap_log2_bucket_count));
    builder.member("buckets", unsafe_ptr, u64::from(layout.hmap_buckets));
    builder.end();

    builder.end();
    builder.finish()
}
