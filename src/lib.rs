//! GOFFSETS - Go runtime struct offsets from DWARF debug info
//!
//! Reads the debug info embedded in a Go executable and reports where a few
//! runtime-internal fields sit inside their structs, so profilers and
//! tracers can read live process state without symbol lookups at runtime.

pub mod debuginfo;
pub mod error;
pub mod platform;
pub mod runtime;

/// Re-export key types for easier access in tests
pub use debuginfo::{EntryCursor, EntryStream, Navigator};
pub use error::{ErrorKind, OffsetError};
pub use platform::{DebugInfoSource, ObjectFile};
pub use runtime::{extract_from_path, extract_from_source, extract_runtime_offsets, RuntimeOffsets};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Initialize the logging system
///
/// Logs go to stderr; stdout is reserved for the JSON result.
pub fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("goffsets", level)
        .format_timestamp_secs()
        .init();
}

/// Map a `-v` count to a log level
pub fn verbosity_level(occurrences: u64) -> log::LevelFilter {
    match occurrences {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
