use std::borrow::Cow;
use std::path::Path;

use gimli::{AttributeValue, DebuggingInformationEntry, EndianSlice, RunTimeEndian, Unit};
use log::{debug, info, trace};
use object::{Object, ObjectSection};

use crate::debuginfo::cursor::EntryStream;
use crate::debuginfo::entry::{DebugEntry, EntryLocation, RawEntry, TypeReference};
use crate::error::{OffsetError, Result};

type Reader<'a> = EndianSlice<'a, RunTimeEndian>;

/// Parse `data` as an object file and flatten its DWARF tree into a stream
///
/// `path` is only used in error messages.
pub fn load_entry_stream(data: &[u8], path: &Path) -> Result<EntryStream> {
    let file = object::File::parse(data).map_err(|source| OffsetError::Container {
        path: path.to_path_buf(),
        source,
    })?;

    let has_debug_info = file
        .section_by_name(".debug_info")
        .map_or(false, |section| section.size() > 0);
    if !has_debug_info {
        return Err(OffsetError::MissingDebugInfo { path: path.to_path_buf() });
    }

    let endian = if file.is_little_endian() {
        RunTimeEndian::Little
    } else {
        RunTimeEndian::Big
    };

    // Go linkers compress debug sections by default
    let load_section = |id: gimli::SectionId| -> std::result::Result<Cow<[u8]>, object::Error> {
        match file.section_by_name(id.name()) {
            Some(section) => section.uncompressed_data(),
            None => Ok(Cow::Borrowed(&[][..])),
        }
    };

    let sections = gimli::Dwarf::load(load_section).map_err(|source| OffsetError::Container {
        path: path.to_path_buf(),
        source,
    })?;
    let dwarf = sections.borrow(|section| EndianSlice::new(section, endian));

    let mut entries = Vec::new();
    let mut units = dwarf.units();
    let mut unit_count = 0usize;
    while let Some(header) = units.next()? {
        let unit = dwarf.unit(header)?;
        flatten_unit(&dwarf, &unit, &mut entries)?;
        unit_count += 1;
    }

    info!(
        "Loaded {} debug entries from {} units in {}",
        entries.len(),
        unit_count,
        path.display()
    );
    EntryStream::new(entries)
}

/// Append the entries of one unit, with null entries as terminators
fn flatten_unit<'a>(
    dwarf: &gimli::Dwarf<Reader<'a>>,
    unit: &Unit<Reader<'a>>,
    out: &mut Vec<RawEntry>,
) -> Result<()> {
    let mut cursor = unit.entries();
    let mut depth = 0usize;

    while cursor.next_entry()?.is_some() {
        match cursor.current() {
            Some(die) => {
                if die.has_children() {
                    depth += 1;
                }
                out.push(RawEntry::Entry(convert_entry(dwarf, unit, die)?));
            }
            // Padding after the unit's root has been closed
            None if depth == 0 => trace!("Ignoring null entry outside any child list"),
            None => {
                depth -= 1;
                out.push(RawEntry::Terminator);
            }
        }
    }

    Ok(())
}

fn convert_entry<'a>(
    dwarf: &gimli::Dwarf<Reader<'a>>,
    unit: &Unit<Reader<'a>>,
    die: &DebuggingInformationEntry<'_, '_, Reader<'a>>,
) -> Result<DebugEntry> {
    let offset = die
        .offset()
        .to_debug_info_offset(&unit.header)
        .ok_or_else(|| OffsetError::Stream("entry outside .debug_info".to_string()))?;

    let mut entry = DebugEntry::new(EntryLocation(offset.0 as u64), die.tag());
    entry.has_children = die.has_children();

    if let Some(value) = die.attr_value(gimli::DW_AT_name)? {
        let raw = dwarf.attr_string(unit, value)?;
        entry.name = Some(String::from_utf8_lossy(raw.slice()).into_owned());
    }

    entry.type_ref = match die.attr_value(gimli::DW_AT_type)? {
        Some(AttributeValue::UnitRef(target)) => target.to_debug_info_offset(&unit.header),
        Some(AttributeValue::DebugInfoRef(target)) => Some(target),
        _ => None,
    }
    .map(|target| TypeReference(EntryLocation(target.0 as u64)));

    if die.tag() == gimli::DW_TAG_member {
        entry.member_offset = member_offset(unit, die)?;
    }

    Ok(entry)
}

/// Read `DW_AT_data_member_location` as a constant, or a lone
/// `DW_OP_plus_uconst` / `DW_OP_constu` expression
fn member_offset<'a>(
    unit: &Unit<Reader<'a>>,
    die: &DebuggingInformationEntry<'_, '_, Reader<'a>>,
) -> Result<Option<u64>> {
    let value = match die.attr_value(gimli::DW_AT_data_member_location)? {
        Some(value) => value,
        None => return Ok(None),
    };

    if let Some(offset) = value.udata_value() {
        return Ok(Some(offset));
    }

    if let AttributeValue::Exprloc(expression) = value {
        let mut operations = expression.operations(unit.encoding());
        match (operations.next()?, operations.next()?) {
            (Some(gimli::Operation::PlusConstant { value }), None)
            | (Some(gimli::Operation::UnsignedConstant { value }), None) => {
                return Ok(Some(value))
            }
            _ => {}
        }
    }

    debug!(
        "Unsupported data member location on entry at {:?}",
        die.offset()
    );
    Ok(None)
}
