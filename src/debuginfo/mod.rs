//! Debug-info tree navigation
//!
//! The entry stream is a flattened, depth-first view of the DWARF tree.
//! `EntryCursor` reads it sequentially; `Navigator` indexes it once and
//! answers type and member lookups from that index.

pub mod builder;
pub mod cursor;
pub mod entry;
pub mod index;
pub mod navigator;

pub use cursor::{EntryCursor, EntryStream};
pub use entry::{DebugEntry, EntryLocation, MemberEntry, RawEntry, TypeReference};
pub use navigator::Navigator;
