//! Go runtime layout extraction

pub mod pipeline;
pub mod record;

pub use pipeline::{extract_from_path, extract_from_source, extract_runtime_offsets};
pub use record::RuntimeOffsets;
