//! ZIP container for part sets
//!
//! A spreadsheet package is a ZIP archive whose entries are the parts.
//! These functions only move bytes; they know nothing about part contents.

use std::io::{Read, Seek, Write};

use crate::error::XlsxResult;
use crate::parts::{PartMap, PartSet, CONTENT_TYPES_PART};

/// Read every file entry of an archive into a part set
///
/// Entry names are stored without a leading `/`. Directory entries are
/// skipped.
pub fn read_parts<R: Read + Seek>(reader: R) -> XlsxResult<PartSet> {
    let mut archive = zip::ZipArchive::new(reader)?;
    let mut parts = PartSet::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().trim_start_matches('/').to_string();
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;

        log::trace!("read part {} ({} bytes)", name, bytes.len());
        parts.insert(name, bytes);
    }

    Ok(parts)
}

/// Write a part map as a ZIP archive
///
/// `[Content_Types].xml` goes first when present; the rest follow in path
/// order.
pub fn write_parts<W: Write + Seek>(parts: &PartMap, writer: W) -> XlsxResult<()> {
    let mut zip = zip::ZipWriter::new(writer);
    let options = zip::write::SimpleFileOptions::default();

    let content_types = parts.get_key_value(CONTENT_TYPES_PART);
    let rest = parts
        .iter()
        .filter(|(name, _)| name.as_str() != CONTENT_TYPES_PART);

    for (name, xml) in content_types.into_iter().chain(rest) {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(xml.as_bytes())?;
    }

    zip.finish()?;
    log::debug!("wrote {} parts", parts.len());
    Ok(())
}
