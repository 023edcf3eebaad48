//! Offset extraction for the Go runtime types profilers care about
//!
//! A fixed walk: `runtime.g` -> `m` -> `runtime.m` fields, then `curg` ->
//! its goroutine's `labels`, then the `runtime.hmap` fields. Any failed step
//! aborts the whole extraction.

use std::path::Path;

use log::{debug, info};

use crate::debuginfo::cursor::EntryStream;
use crate::debuginfo::entry::{DebugEntry, MemberEntry};
use crate::debuginfo::navigator::Navigator;
use crate::error::{OffsetError, Result};
use crate::platform::{DebugInfoSource, ObjectFile};
use crate::runtime::record::RuntimeOffsets;

/// Goroutine descriptor
pub const GOROUTINE_TYPE: &str = "runtime.g";
/// Go map header
pub const HMAP_TYPE: &str = "runtime.hmap";

/// Read the executable at `path` and extract its runtime offsets
pub fn extract_from_path<P: AsRef<Path>>(path: P) -> Result<RuntimeOffsets> {
    let file = ObjectFile::open(path)?;
    info!("Extracting runtime offsets from {}", file.path().display());
    extract_from_source(&file)
}

/// Extract runtime offsets from any debug-info provider
pub fn extract_from_source<S: DebugInfoSource + ?Sized>(source: &S) -> Result<RuntimeOffsets> {
    let stream = source.entry_stream()?;
    extract_runtime_offsets(&stream)
}

/// Extract runtime offsets from an entry stream
pub fn extract_runtime_offsets(stream: &EntryStream) -> Result<RuntimeOffsets> {
    let nav = Navigator::new(stream)?;

    let g = nav.locate_struct(GOROUTINE_TYPE)?;
    let m_field = nav.resolve_member(g, "m")?;
    let m = nav.pointee_struct(&m_field)?;

    let vdso_sp = nav.resolve_member(m, "vdsoSP")?;
    let vdso_pc = nav.resolve_member(m, "vdsoPC")?;
    let curg = nav.resolve_member(m, "curg")?;
    // labels lives on the goroutine, reached through curg
    let current_g = nav.pointee_struct(&curg)?;
    let labels = nav.resolve_member(current_g, "labels")?;

    let hmap = nav.locate_struct(HMAP_TYPE)?;
    let count = nav.resolve_member(hmap, "count")?;
    let log2_buckets = nav.resolve_member(hmap, "B")?;
    let buckets = nav.resolve_member(hmap, "buckets")?;

    let offsets = RuntimeOffsets {
        m_offset: narrow(g, &m_field)?,
        vdso_sp: narrow(m, &vdso_sp)?,
        vdso_pc: narrow(m, &vdso_pc)?,
        curg: narrow(m, &curg)?,
        labels: narrow(current_g, &labels)?,
        hmap_count: narrow(hmap, &count)?,
        hmap_log2_bucket_count: narrow(hmap, &log2_buckets)?,
        hmap_buckets: narrow(hmap, &buckets)?,
    };
    info!("Extracted runtime offsets: {:?}", offsets);
    Ok(offsets)
}

/// Offset of `member` as a u32
fn narrow(container: &DebugEntry, member: &MemberEntry) -> Result<u32> {
    let offset = u32::try_from(member.offset).map_err(|_| {
        OffsetError::Stream(format!(
            "offset {} of {}.{} does not fit in 32 bits",
            member.offset,
            container.display_name(),
            member.name
        ))
    })?;
    debug!("{}.{} = {}", container.display_name(), member.name, offset);
    Ok(offset)
}
