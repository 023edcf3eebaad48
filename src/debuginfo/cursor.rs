//! Entry stream and the seekable cursor over it

use std::collections::HashMap;

use crate::debuginfo::entry::{DebugEntry, EntryLocation, RawEntry};
use crate::error::{OffsetError, Result};

/// Depth-first sequence of debug-info entries
#[derive(Debug, Clone, Default)]
pub struct EntryStream {
    /// Entries in traversal order
    entries: Vec<RawEntry>,
    /// Stream position of every located entry
    positions: HashMap<EntryLocation, usize>,
}

impl EntryStream {
    /// Build a stream, rejecting duplicate locations
    pub fn new(entries: Vec<RawEntry>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(entries.len());
        for (position, raw) in entries.iter().enumerate() {
            if let RawEntry::Entry(entry) = raw {
                if positions.insert(entry.location, position).is_some() {
                    return Err(OffsetError::Stream(format!(
                        "duplicate entry location {}",
                        entry.location
                    )));
                }
            }
        }

        Ok(Self { entries, positions })
    }

    /// Number of items, terminators included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the stream holds nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All items in traversal order
    pub fn entries(&self) -> &[RawEntry] {
        &self.entries
    }

    /// Stream position of a location
    pub fn position_of(&self, location: EntryLocation) -> Option<usize> {
        self.positions.get(&location).copied()
    }

    /// Entry at a location
    pub fn get(&self, location: EntryLocation) -> Option<&DebugEntry> {
        self.position_of(location)
            .and_then(|position| self.entries[position].as_entry())
    }

    /// Open a cursor at the start of the stream
    pub fn cursor(&self) -> EntryCursor<'_> {
        EntryCursor { stream: self, position: 0 }
    }
}

/// Stateful reader over an `EntryStream`
///
/// `seek` places the cursor just before an entry, so the following `next`
/// returns that entry and the `next` after it returns its first child.
#[derive(Debug, Clone)]
pub struct EntryCursor<'a> {
    stream: &'a EntryStream,
    position: usize,
}

impl<'a> EntryCursor<'a> {
    /// Reposition to a previously recorded location
    pub fn seek(&mut self, location: EntryLocation) -> Result<()> {
        self.position = self
            .stream
            .position_of(location)
            .ok_or(OffsetError::UnresolvedReference(location))?;
        Ok(())
    }

    /// Reposition to the start of the stream
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Skip the child list of an entry that was just returned by `next`
    pub fn skip_children(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            match self.next() {
                Some(RawEntry::Entry(entry)) if entry.has_children => depth += 1,
                Some(RawEntry::Entry(_)) => {}
                Some(RawEntry::Terminator) => depth -= 1,
                None => {
                    return Err(OffsetError::Stream(
                        "stream ended inside a child list".to_string(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Enumerate the immediate children of the entry at `location`
    ///
    /// Seeks to the container, descends, and walks siblings up to the
    /// terminator. Leaves the cursor just past that terminator.
    pub fn children(&mut self, location: EntryLocation) -> Result<Vec<&'a DebugEntry>> {
        self.seek(location)?;
        let container = match self.next() {
            Some(RawEntry::Entry(entry)) => entry,
            _ => return Err(OffsetError::UnresolvedReference(location)),
        };

        let mut children = Vec::new();
        if !container.has_children {
            return Ok(children);
        }

        loop {
            match self.next() {
                Some(RawEntry::Entry(child)) => {
                    children.push(child);
                    if child.has_children {
                        self.skip_children()?;
                    }
                }
                Some(RawEntry::Terminator) => return Ok(children),
                None => {
                    return Err(OffsetError::Stream(format!(
                        "child list of {} is not terminated",
                        container.display_name()
                    )))
                }
            }
        }
    }
}

impl<'a> Iterator for EntryCursor<'a> {
    type Item = &'a RawEntry;

    /// Advance and return the next item, or `None` at end of stream
    fn next(&mut self) -> Option<Self::Item> {
        let raw = self.stream.entries.get(self.position)?;
        self.position += 1;
        Some(raw)
    }
}
