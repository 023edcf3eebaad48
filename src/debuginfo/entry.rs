//! Debug-info entries as read from the stream

use std::fmt;

use gimli::DwTag;

/// Stable position of an entry in the debug-info stream
///
/// For entries loaded from an object file this is the entry's offset in
/// `.debug_info`; synthetic streams hand out their own locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryLocation(pub u64);

impl fmt::Display for EntryLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<0x{:x}>", self.0)
    }
}

/// Reference from an entry to the entry describing its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeReference(pub EntryLocation);

impl TypeReference {
    /// Location of the referenced entry
    pub fn target(self) -> EntryLocation {
        self.0
    }
}

/// One node of the debug-info tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugEntry {
    /// Where this entry sits in the stream
    pub location: EntryLocation,
    /// Structural kind
    pub tag: DwTag,
    /// `DW_AT_name`, if present
    pub name: Option<String>,
    /// `DW_AT_type`, if present
    pub type_ref: Option<TypeReference>,
    /// `DW_AT_data_member_location`, for members
    pub member_offset: Option<u64>,
    /// Whether a child list (closed by a terminator) follows this entry
    pub has_children: bool,
}

impl DebugEntry {
    /// Create an entry with no attributes
    pub fn new(location: EntryLocation, tag: DwTag) -> Self {
        Self {
            location,
            tag,
            name: None,
            type_ref: None,
            member_offset: None,
            has_children: false,
        }
    }

    /// Entry name, or `"<anonymous>"` for use in messages
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }

    /// Check whether this entry has the given name
    pub fn is_named(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

/// An item in the flattened stream
///
/// Children of an entry follow it directly and end with a `Terminator`,
/// matching the null entries of a DWARF unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEntry {
    Entry(DebugEntry),
    Terminator,
}

impl RawEntry {
    /// The entry, unless this is a terminator
    pub fn as_entry(&self) -> Option<&DebugEntry> {
        match self {
            RawEntry::Entry(entry) => Some(entry),
            RawEntry::Terminator => None,
        }
    }
}

/// A data member resolved inside a structured type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEntry {
    /// Member name
    pub name: String,
    /// Declared type of the member
    pub type_ref: TypeReference,
    /// Byte offset within the enclosing type
    pub offset: u64,
    /// Location of the member entry itself
    pub location: EntryLocation,
}

impl MemberEntry {
    /// Build a member view from a raw entry
    ///
    /// Returns `None` when the entry lacks a type or an offset.
    pub fn from_entry(entry: &DebugEntry) -> Option<Self> {
        Some(Self {
            name: entry.name.clone()?,
            type_ref: entry.type_ref?,
            offset: entry.member_offset?,
            location: entry.location,
        })
    }
}
