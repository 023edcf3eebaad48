//! The extracted offsets and their JSON form

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::error::Result;

/// Byte offsets of the Go runtime fields profilers read directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RuntimeOffsets {
    /// `m` within `runtime.g`
    pub m_offset: u32,
    /// `vdsoSP` within `runtime.m`
    pub vdso_sp: u32,
    /// `vdsoPC` within `runtime.m`
    pub vdso_pc: u32,
    /// `curg` within `runtime.m`
    pub curg: u32,
    /// `labels` within the goroutine `curg` points to
    pub labels: u32,
    /// `count` within `runtime.hmap`
    pub hmap_count: u32,
    /// `B` within `runtime.hmap`
    pub hmap_log2_bucket_count: u32,
    /// `buckets` within `runtime.hmap`
    pub hmap_buckets: u32,
}

impl RuntimeOffsets {
    /// Render as JSON indented by four spaces
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut buffer = Vec::with_capacity(256);
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
        self.serialize(&mut serializer)?;

        // serde_json only ever writes UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
