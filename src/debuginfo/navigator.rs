//! Navigation over an indexed entry stream
//!
//! `Navigator` is the explicit context every lookup goes through: it owns the
//! index and borrows the stream, so there is no shared cursor position to
//! restore between member lookups. `resolve_member` is keyed by the
//! container's location, so any member can be resolved in any order.

use gimli::{DwTag, DW_TAG_pointer_type, DW_TAG_structure_type};
use log::{debug, trace};

use crate::debuginfo::cursor::EntryStream;
use crate::debuginfo::entry::{DebugEntry, MemberEntry, RawEntry, TypeReference};
use crate::debuginfo::index::TreeIndex;
use crate::error::{OffsetError, Result};

/// Lookup context over one entry stream
#[derive(Debug)]
pub struct Navigator<'a> {
    stream: &'a EntryStream,
    index: TreeIndex,
}

impl<'a> Navigator<'a> {
    /// Index `stream` and wrap it
    pub fn new(stream: &'a EntryStream) -> Result<Self> {
        let index = TreeIndex::build(stream)?;
        Ok(Self { stream, index })
    }

    /// The underlying stream
    pub fn stream(&self) -> &'a EntryStream {
        self.stream
    }

    fn entry_at(&self, position: usize) -> Option<&'a DebugEntry> {
        self.stream.entries().get(position).and_then(RawEntry::as_entry)
    }

    /// Find the first entry, in traversal order, named `name` with tag `tag`
    ///
    /// Entries with the right name but another tag are skipped; when nothing
    /// matches both, the result is `TypeNotFound`.
    pub fn locate(&self, name: &str, tag: DwTag) -> Result<&'a DebugEntry> {
        for &position in self.index.named(name) {
            let Some(entry) = self.entry_at(position) else {
                continue;
            };
            if entry.tag == tag {
                debug!("Located {} at {}", name, entry.location);
                return Ok(entry);
            }
            debug!(
                "Skipping {} at {}: {} is not {}",
                name, entry.location, entry.tag, tag
            );
        }

        Err(OffsetError::TypeNotFound { name: name.to_string() })
    }

    /// Find a structured type by name
    pub fn locate_struct(&self, name: &str) -> Result<&'a DebugEntry> {
        self.locate(name, DW_TAG_structure_type)
    }

    /// Resolve the first immediate child of `container` named `member`
    pub fn resolve_member(&self, container: &DebugEntry, member: &str) -> Result<MemberEntry> {
        let not_found = || OffsetError::MemberNotFound {
            container: container.display_name().to_string(),
            member: member.to_string(),
        };

        let entry = self
            .index
            .child(container.location, member)
            .and_then(|position| self.entry_at(position))
            .ok_or_else(not_found)?;

        let resolved = MemberEntry::from_entry(entry).ok_or_else(|| {
            OffsetError::Stream(format!(
                "member {} of {} has no type or no data member location",
                member,
                container.display_name()
            ))
        })?;
        trace!(
            "{}.{} at offset {} has type {}",
            container.display_name(),
            member,
            resolved.offset,
            resolved.type_ref.target()
        );
        Ok(resolved)
    }

    /// Resolve the entry a type reference points to
    pub fn dereference(&self, reference: TypeReference) -> Result<&'a DebugEntry> {
        self.stream
            .get(reference.target())
            .ok_or(OffsetError::UnresolvedReference(reference.target()))
    }

    /// Dereference and require a particular tag
    ///
    /// `what` names the thing being checked, for the error message.
    pub fn dereference_expecting(
        &self,
        reference: TypeReference,
        expected: DwTag,
        what: &str,
    ) -> Result<&'a DebugEntry> {
        let entry = self.dereference(reference)?;
        expect_tag(entry, expected, what)?;
        Ok(entry)
    }

    /// Follow a pointer-typed member to the structured type it points at
    ///
    /// The member's type must be a pointer and the pointer's own type must
    /// be a structured type; anything else is a `TypeMismatch`.
    pub fn pointee_struct(&self, member: &MemberEntry) -> Result<&'a DebugEntry> {
        let pointer =
            self.dereference_expecting(member.type_ref, DW_TAG_pointer_type, &member.name)?;
        let target = pointer.type_ref.ok_or_else(|| {
            OffsetError::Stream(format!("pointer type of {} has no target type", member.name))
        })?;
        self.dereference_expecting(target, DW_TAG_structure_type, &format!("*{}", member.name))
    }
}

/// Fail with `TypeMismatch` unless `entry` carries `expected`
pub fn expect_tag(entry: &DebugEntry, expected: DwTag, what: &str) -> Result<()> {
    if entry.tag == expected {
        Ok(())
    } else {
        Err(OffsetError::TypeMismatch {
            name: what.to_string(),
            expected,
            actual: entry.tag,
        })
    }
}
