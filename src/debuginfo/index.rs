//! Tree index built in one pass over the entry stream
//!
//! Records, for every name, the stream positions carrying it (in traversal
//! order), and for every container, its immediate children keyed by name.
//! Member lookup then becomes a map access instead of a seek and re-scan.

use std::collections::HashMap;

use log::debug;

use crate::debuginfo::cursor::EntryStream;
use crate::debuginfo::entry::{EntryLocation, RawEntry};
use crate::error::{OffsetError, Result};

/// Name and child lookup tables over one `EntryStream`
#[derive(Debug, Default)]
pub struct TreeIndex {
    /// Positions of named entries, first occurrence first
    by_name: HashMap<String, Vec<usize>>,
    /// First child of each name, per container
    children: HashMap<EntryLocation, HashMap<String, usize>>,
}

impl TreeIndex {
    /// Walk the whole stream once and index it
    ///
    /// Fails if a terminator has no open child list or the stream ends with
    /// one still open.
    pub fn build(stream: &EntryStream) -> Result<Self> {
        let mut index = Self::default();
        let mut open: Vec<EntryLocation> = Vec::new();

        for (position, raw) in stream.cursor().enumerate() {
            match raw {
                RawEntry::Entry(entry) => {
                    if let Some(name) = &entry.name {
                        index.by_name.entry(name.clone()).or_default().push(position);

                        if let Some(parent) = open.last() {
                            index
                                .children
                                .entry(*parent)
                                .or_default()
                                .entry(name.clone())
                                .or_insert(position);
                        }
                    }
                    if entry.has_children {
                        open.push(entry.location);
                    }
                }
                RawEntry::Terminator => {
                    if open.pop().is_none() {
                        return Err(OffsetError::Stream(format!(
                            "unexpected terminator at position {}",
                            position
                        )));
                    }
                }
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(OffsetError::Stream(format!(
                "child list of {} is not terminated",
                unclosed
            )));
        }

        debug!(
            "Indexed {} stream items, {} distinct names, {} containers",
            stream.len(),
            index.by_name.len(),
            index.children.len()
        );
        Ok(index)
    }

    /// Stream positions of every entry named `name`, in traversal order
    pub fn named(&self, name: &str) -> &[usize] {
        self.by_name.get(name).map_or(&[][..], Vec::as_slice)
    }

    /// Stream position of the first child of `container` named `name`
    pub fn child(&self, container: EntryLocation, name: &str) -> Option<usize> {
        self.children.get(&container)?.get(name).copied()
    }
}
