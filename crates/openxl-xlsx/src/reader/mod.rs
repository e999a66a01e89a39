//! XLSX reader (part unmarshaller)

use std::fs;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};

use crate::container;
use crate::error::{XlsxError, XlsxResult};
use crate::parts::{
    rel_type, resolve_target, PartSet, CONTENT_TYPES_PART, SHARED_STRINGS_PART, WORKBOOK_DIR,
    WORKBOOK_PART, WORKBOOK_RELS_PART,
};
use crate::relationships::Relationships;
use crate::xml::{attr, prefixed_attr, text, PartReader};
use openxl_core::{CellAddress, CellKind, CellValue, File, Sheet};

/// Decode Excel's `_xHHHH_` escape sequences in strings.
///
/// Excel uses this format to encode special characters in XML:
/// - `_x000d_` = CR (carriage return)
/// - `_x000a_` = LF (line feed)
/// - `_x0009_` = Tab
/// - `_x005f_` = Underscore (escaped underscore)
fn decode_excel_escapes(s: &str) -> String {
    if !s.contains("_x") {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(pos) = rest.find("_x") {
        result.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        let bytes = candidate.as_bytes();

        let decoded = if bytes.len() >= 7
            && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
            && bytes[6] == b'_'
        {
            u32::from_str_radix(&candidate[2..6], 16)
                .ok()
                .and_then(char::from_u32)
        } else {
            None
        };

        match decoded {
            Some(c) => {
                result.push(c);
                rest = &candidate[7..];
            }
            None => {
                result.push_str("_x");
                rest = &candidate[2..];
            }
        }
    }

    result.push_str(rest);
    result
}

/// A `<c>` element being assembled
struct PendingCell {
    row: usize,
    col: usize,
    cell_type: Option<String>,
    value: Option<String>,
    inline: Option<String>,
}

/// XLSX file reader
pub struct XlsxReader;

impl XlsxReader {
    /// Read a document from a file path
    pub fn read_file<P: AsRef<Path>>(path: P) -> XlsxResult<File> {
        let file = fs::File::open(path)?;
        Self::read(BufReader::new(file))
    }

    /// Read a document from an XLSX archive
    pub fn read<R: Read + Seek>(reader: R) -> XlsxResult<File> {
        let parts = container::read_parts(reader)?;

        // Verify this is an XLSX file
        if !parts.contains_key(CONTENT_TYPES_PART) {
            return Err(XlsxError::InvalidFormat(format!(
                "Missing {}",
                CONTENT_TYPES_PART
            )));
        }

        Self::unmarshal_parts(&parts)
    }

    /// Reconstruct a document from its raw parts
    ///
    /// Needs the workbook manifest, the workbook relationships, every
    /// worksheet the manifest names and the shared-strings part when the
    /// relationships declare one. Sheets keep manifest order. Nothing partial is
    /// returned on error.
    pub fn unmarshal_parts(parts: &PartSet) -> XlsxResult<File> {
        let workbook_xml = Self::part(parts, WORKBOOK_PART)?;
        let sheet_info = Self::read_workbook_xml(workbook_xml)?;

        let rels_xml = Self::part(parts, WORKBOOK_RELS_PART)?;
        let rels = Relationships::parse(WORKBOOK_RELS_PART, rels_xml)?;

        // A declared shared-strings part must exist; an undeclared one is
        // looked up at its conventional path and may be absent
        let shared_strings = match rels.find_by_type(rel_type::SHARED_STRINGS) {
            Some(rel) => {
                let path = resolve_target(WORKBOOK_DIR, &rel.target);
                Self::read_shared_strings(&path, Self::part(parts, &path)?)?
            }
            None => match parts.get(SHARED_STRINGS_PART) {
                Some(bytes) => Self::read_shared_strings(SHARED_STRINGS_PART, bytes)?,
                None => Vec::new(),
            },
        };

        let mut file = File::new();

        for (name, r_id) in sheet_info {
            let rel = rels
                .get(&r_id)
                .ok_or_else(|| XlsxError::UnresolvedRelationship(r_id.clone()))?;

            if rel.rel_type == rel_type::CHARTSHEET {
                log::warn!("skipping chart sheet '{}'", name);
                continue;
            }
            if rel.rel_type != rel_type::WORKSHEET {
                log::warn!(
                    "sheet '{}' links to unexpected relationship type {}",
                    name,
                    rel.rel_type
                );
            }

            let path = resolve_target(WORKBOOK_DIR, &rel.target);
            let bytes = Self::part(parts, &path)?;

            let mut sheet = Sheet::new(name);
            Self::read_worksheet(&path, bytes, &mut sheet, &shared_strings)?;
            file.add_existing_sheet(sheet)?;
        }

        // Rebuild the table in the order a marshal of this document assigns
        let mut table = openxl_core::SharedStringTable::new();
        for sheet in file.sheets() {
            for (_, _, cell) in sheet.occupied_cells() {
                if let CellValue::String(s) = cell.value() {
                    table.intern(s);
                }
            }
        }
        file.set_shared_strings(table);

        log::debug!(
            "unmarshalled {} sheets ({} shared strings in document)",
            file.sheet_count(),
            shared_strings.len()
        );

        Ok(file)
    }

    fn part<'a>(parts: &'a PartSet, path: &str) -> XlsxResult<&'a [u8]> {
        parts
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| XlsxError::MissingPart(path.to_string()))
    }

    /// Read the shared strings table, index = position in document order
    fn read_shared_strings(path: &str, bytes: &[u8]) -> XlsxResult<Vec<String>> {
        let mut reader = PartReader::new(path, bytes, "sst");

        let mut strings = Vec::new();
        let mut current_string = String::new();
        let mut in_si = false;
        let mut in_t = false;
        let mut in_phonetic = false;

        loop {
            match reader.next()? {
                Event::Start(e) => match e.local_name().as_ref() {
                    b"si" => {
                        in_si = true;
                        current_string.clear();
                    }
                    b"rPh" => in_phonetic = true,
                    b"t" if in_si && !in_phonetic => in_t = true,
                    _ => {}
                },
                Event::Empty(e) if e.local_name().as_ref() == b"si" => {
                    strings.push(String::new());
                }
                Event::End(e) => match e.local_name().as_ref() {
                    b"si" => {
                        strings.push(decode_excel_escapes(&current_string));
                        current_string.clear();
                        in_si = false;
                    }
                    b"rPh" => in_phonetic = false,
                    b"t" => in_t = false,
                    _ => {}
                },
                Event::Text(e) if in_t => current_string.push_str(&text(&e)?),
                Event::CData(e) if in_t => {
                    current_string.push_str(&String::from_utf8_lossy(&e));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        log::trace!("{}: {} shared strings", path, strings.len());
        Ok(strings)
    }

    /// Read workbook.xml to get sheet names and rIds, in manifest order
    fn read_workbook_xml(bytes: &[u8]) -> XlsxResult<Vec<(String, String)>> {
        let mut reader = PartReader::new(WORKBOOK_PART, bytes, "workbook").trim_text();

        let mut sheets = Vec::new();
        let mut saw_sheets = false;

        loop {
            match reader.next()? {
                Event::Start(e) | Event::Empty(e) => match e.local_name().as_ref() {
                    b"sheets" => saw_sheets = true,
                    b"sheet" => {
                        let name = attr(&e, b"name")?
                            .ok_or_else(|| reader.error("<sheet> without name"))?;
                        let r_id = prefixed_attr(&e, b"id")?.ok_or_else(|| {
                            reader.error(format!("sheet '{}' without relationship id", name))
                        })?;
                        sheets.push((name, r_id));
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_sheets {
            return Err(reader.error("missing <sheets>"));
        }

        Ok(sheets)
    }

    /// Read one worksheet part into `sheet`
    fn read_worksheet(
        path: &str,
        bytes: &[u8],
        sheet: &mut Sheet,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let mut reader = PartReader::new(path, bytes, "worksheet");

        let mut saw_sheet_data = false;
        let mut in_sheet_data = false;
        let mut current_row: Option<usize> = None;
        let mut next_row = 0usize;
        let mut next_col = 0usize;

        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;
        let mut in_inline_str = false;
        let mut in_inline_text = false;
        let mut in_phonetic = false;

        loop {
            let event = reader.next()?;
            let (e, is_empty) = match &event {
                Event::Start(e) => (Some(e), false),
                Event::Empty(e) => (Some(e), true),
                _ => (None, false),
            };

            if let Some(e) = e {
                match e.local_name().as_ref() {
                    b"sheetData" => {
                        saw_sheet_data = true;
                        in_sheet_data = !is_empty;
                    }
                    b"row" if in_sheet_data => {
                        let index = match attr(e, b"r")? {
                            Some(r) => Self::parse_row_number(&reader, &r)?,
                            None => next_row,
                        };
                        sheet.row_mut_padded(index);
                        next_row = index + 1;
                        next_col = 0;
                        current_row = if is_empty { None } else { Some(index) };
                    }
                    b"c" if in_sheet_data => {
                        let row = current_row
                            .ok_or_else(|| reader.error("<c> outside of a <row>"))?;
                        let pending = Self::start_cell(&reader, e, row, next_col)?;
                        next_col = pending.col + 1;

                        if is_empty {
                            Self::place_cell(sheet, pending, shared_strings)?;
                        } else {
                            cell = Some(pending);
                        }
                    }
                    b"v" if cell.is_some() && !is_empty => in_value = true,
                    b"is" if cell.is_some() && !is_empty => in_inline_str = true,
                    b"rPh" if in_inline_str && !is_empty => in_phonetic = true,
                    b"t" if in_inline_str && !in_phonetic && !is_empty => in_inline_text = true,
                    _ => {}
                }
                continue;
            }

            match event {
                Event::End(e) => match e.local_name().as_ref() {
                    b"sheetData" => in_sheet_data = false,
                    b"row" => current_row = None,
                    b"c" => {
                        if let Some(pending) = cell.take() {
                            Self::place_cell(sheet, pending, shared_strings)?;
                        }
                    }
                    b"v" => in_value = false,
                    b"is" => in_inline_str = false,
                    b"rPh" => in_phonetic = false,
                    b"t" => in_inline_text = false,
                    _ => {}
                },
                Event::Text(e) if in_value || in_inline_text => {
                    if let Some(pending) = cell.as_mut() {
                        let content = text(&e)?;
                        let slot = if in_value {
                            &mut pending.value
                        } else {
                            &mut pending.inline
                        };
                        slot.get_or_insert_with(String::new).push_str(&content);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_sheet_data {
            return Err(reader.error("missing <sheetData>"));
        }

        log::trace!("{}: {} rows", path, sheet.row_count());
        Ok(())
    }

    fn parse_row_number(reader: &PartReader<'_>, r: &str) -> XlsxResult<usize> {
        match r.trim().parse::<u32>() {
            Ok(n) if (1..=openxl_core::MAX_ROWS).contains(&n) => Ok(n as usize - 1),
            _ => Err(reader.error(format!("invalid row number '{}'", r))),
        }
    }

    fn start_cell(
        reader: &PartReader<'_>,
        e: &BytesStart<'_>,
        row: usize,
        implicit_col: usize,
    ) -> XlsxResult<PendingCell> {
        let col = match attr(e, b"r")? {
            Some(cell_ref) => {
                let addr = CellAddress::parse(&cell_ref)?;
                if addr.row as usize != row {
                    return Err(reader.error(format!(
                        "cell {} inside row {}",
                        cell_ref,
                        row + 1
                    )));
                }
                addr.col as usize
            }
            None => implicit_col,
        };

        Ok(PendingCell {
            row,
            col,
            cell_type: attr(e, b"t")?,
            value: None,
            inline: None,
        })
    }

    /// Resolve a finished cell's value and store it at its position
    fn place_cell(
        sheet: &mut Sheet,
        pending: PendingCell,
        shared_strings: &[String],
    ) -> XlsxResult<()> {
        let value = Self::cell_value(&pending, shared_strings)?;
        sheet
            .row_mut_padded(pending.row)
            .cell_mut_padded(pending.col)
            .set(value);
        Ok(())
    }

    fn cell_value(pending: &PendingCell, shared_strings: &[String]) -> XlsxResult<CellValue> {
        let cell_type = pending.cell_type.as_deref();

        if cell_type == Some("inlineStr") {
            let text = pending.inline.as_deref().or(pending.value.as_deref());
            return Ok(text
                .map(|t| CellValue::String(decode_excel_escapes(t)))
                .unwrap_or_default());
        }

        let Some(value) = pending.value.as_deref() else {
            return Ok(CellValue::Empty);
        };

        let cell_value = match cell_type {
            // Shared string
            Some("s") => {
                let index: usize =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| openxl_core::Error::InvalidLiteral {
                            kind: "shared string index",
                            literal: value.to_string(),
                        })?;
                let s = shared_strings
                    .get(index)
                    .ok_or(XlsxError::SharedStringIndex {
                        index,
                        len: shared_strings.len(),
                    })?;
                CellValue::String(s.clone())
            }

            // Boolean
            Some("b") => CellValue::parse_literal(CellKind::Boolean, value)?,

            // Formula string result
            Some("str") => CellValue::String(decode_excel_escapes(value)),

            // Error values are kept as their literal text
            Some("e") => CellValue::String(value.to_string()),

            // Number (explicit type)
            Some("n") => CellValue::parse_literal(CellKind::Number, value)?,

            // No type marker: classify by literal form
            None => CellValue::parse_literal(CellKind::Number, value)
                .or_else(|_| CellValue::parse_literal(CellKind::Boolean, value))?,

            Some(other) => {
                log::warn!("unknown cell type '{}', keeping the literal as text", other);
                CellValue::String(value.to_string())
            }
        };

        Ok(cell_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pending(cell_type: Option<&str>, value: &str) -> PendingCell {
        PendingCell {
            row: 0,
            col: 0,
            cell_type: cell_type.map(str::to_string),
            value: Some(value.to_string()),
            inline: None,
        }
    }

    #[test]
    fn test_decode_excel_escapes() {
        assert_eq!(decode_excel_escapes("Hello_x000D_World"), "Hello\rWorld");
        assert_eq!(decode_excel_escapes("a_x005F_x000D_b"), "a_x000D_b");
        assert_eq!(decode_excel_escapes("_x"), "_x");
        assert_eq!(decode_excel_escapes("_xZZZZ_"), "_xZZZZ_");
        assert_eq!(decode_excel_escapes("no escapes"), "no escapes");
    }

    #[test]
    fn test_cell_value_classification() {
        let sst = vec!["Foo".to_string()];

        assert_eq!(
            XlsxReader::cell_value(&pending(Some("s"), "0"), &sst).unwrap(),
            CellValue::string("Foo")
        );
        assert_eq!(
            XlsxReader::cell_value(&pending(Some("b"), "0"), &sst).unwrap(),
            CellValue::Boolean(false)
        );
        assert_eq!(
            XlsxReader::cell_value(&pending(None, "12.5"), &sst).unwrap(),
            CellValue::Number(12.5)
        );
        assert_eq!(
            XlsxReader::cell_value(&pending(None, "TRUE"), &sst).unwrap(),
            CellValue::Boolean(true)
        );
        assert_eq!(
            XlsxReader::cell_value(&pending(Some("e"), "#N/A"), &sst).unwrap(),
            CellValue::string("#N/A")
        );
    }

    #[test]
    fn test_shared_string_index_out_of_range() {
        let sst = vec!["Foo".to_string()];
        let err = XlsxReader::cell_value(&pending(Some("s"), "1"), &sst).unwrap_err();
        assert!(matches!(
            err,
            XlsxError::SharedStringIndex { index: 1, len: 1 }
        ));
    }

    #[test]
    fn test_unparsable_literals() {
        let sst = Vec::new();
        let cases = [
            (Some("n"), "abc"),
            (Some("n"), "inf"),
            (Some("b"), "2"),
            (Some("s"), "x"),
            (None, "abc"),
            (None, "NaN"),
            (None, "1e400"),
        ];
        for (t, v) in cases {
            let err = XlsxReader::cell_value(&pending(t, v), &sst).unwrap_err();
            assert!(
                matches!(err, XlsxError::Core(ref core) if core.is_format_error()),
                "{t:?}/{v}: {err}"
            );
        }
    }

    #[test]
    fn test_read_shared_strings_rich_text() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="3" uniqueCount="3">
  <si><t>Plain</t></si>
  <si><r><t>Rich </t></r><r><rPr><b/></rPr><t>text</t></r><rPh sb="0" eb="1"><t>yomi</t></rPh></si>
  <si><t xml:space="preserve">  spaced  </t></si>
  <si/>
</sst>"#;
        let strings = XlsxReader::read_shared_strings("sst", xml.as_bytes()).unwrap();
        assert_eq!(strings, vec!["Plain", "Rich text", "  spaced  ", ""]);
    }

    #[test]
    fn test_read_workbook_xml_order() {
        let xml = r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"
  xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <sheets>
    <sheet name="Second" sheetId="2" r:id="rId2"/>
    <sheet name="First" sheetId="1" r:id="rId1"/>
  </sheets>
</workbook>"#;
        let sheets = XlsxReader::read_workbook_xml(xml.as_bytes()).unwrap();
        assert_eq!(
            sheets,
            vec![
                ("Second".to_string(), "rId2".to_string()),
                ("First".to_string(), "rId1".to_string())
            ]
        );
    }

    #[test]
    fn test_read_workbook_requires_sheets() {
        let err = XlsxReader::read_workbook_xml(b"<workbook/>").unwrap_err();
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_read_worksheet_pads_gaps() {
        let xml = r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
  <sheetData>
    <row r="2"><c r="C2"><v>3</v></c></row>
    <row><c><v>1</v></c><c t="inlineStr"><is><t>inline</t></is></c></row>
  </sheetData>
</worksheet>"#;
        let mut sheet = Sheet::new("S");
        XlsxReader::read_worksheet("ws", xml.as_bytes(), &mut sheet, &[]).unwrap();

        assert_eq!(sheet.row_count(), 3);
        assert!(sheet.row(0).unwrap().is_empty());
        assert_eq!(sheet.row(1).unwrap().len(), 3);
        assert_eq!(sheet.get_value("C2").unwrap(), CellValue::Number(3.0));
        assert_eq!(sheet.get_value("A3").unwrap(), CellValue::Number(1.0));
        assert_eq!(sheet.get_value("B3").unwrap(), CellValue::string("inline"));
    }

    #[test]
    fn test_read_worksheet_rejects_bad_address() {
        let xml = r#"<worksheet><sheetData><row r="1"><c r="1A"><v>1</v></c></row></sheetData></worksheet>"#;
        let mut sheet = Sheet::new("S");
        let err = XlsxReader::read_worksheet("ws", xml.as_bytes(), &mut sheet, &[]).unwrap_err();
        assert!(matches!(err, XlsxError::Core(ref core) if core.is_format_error()));
    }

    #[test]
    fn test_read_worksheet_requires_sheet_data() {
        let xml = r#"<worksheet><dimension ref="A1"/></worksheet>"#;
        let mut sheet = Sheet::new("S");
        let err = XlsxReader::read_worksheet("ws", xml.as_bytes(), &mut sheet, &[]).unwrap_err();
        assert!(err.is_parse_error());
    }
}
