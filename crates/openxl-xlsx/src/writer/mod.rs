//! XLSX writer (part marshaller)

use std::collections::HashSet;
use std::fs;
use std::io::{Seek, Write};
use std::path::Path;

use crate::container;
use crate::error::{XlsxError, XlsxResult};
use crate::parts::{
    content_type, rel_type, worksheet_part, worksheet_target, PartMap, CONTENT_TYPES_NS,
    CONTENT_TYPES_PART, OFFICE_RELATIONSHIPS_NS, ROOT_RELS_PART, SHARED_STRINGS_PART,
    SPREADSHEETML_NS, WORKBOOK_PART, WORKBOOK_RELS_PART,
};
use crate::relationships::Relationships;
use crate::xml::{escape_xml, XML_DECLARATION};
use openxl_core::{CellAddress, CellValue, File, SharedStringTable, Sheet, MAX_COLS, MAX_ROWS};

/// Everything one traversal of a File produces
struct Marshalled {
    /// Worksheet XML, in sheet order
    worksheets: Vec<String>,
    /// Strings interned during the traversal
    shared_strings: SharedStringTable,
    /// Workbook relationships, one worksheet link per sheet
    relationships: Relationships,
}

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a document to a file path
    pub fn write_file<P: AsRef<Path>>(file: &mut File, path: P) -> XlsxResult<()> {
        // Marshal before creating the output file
        let parts = Self::package_parts(file)?;
        let out = fs::File::create(path)?;
        container::write_parts(&parts, out)
    }

    /// Write a document as an XLSX archive to a writer
    pub fn write<W: Write + Seek>(file: &mut File, writer: W) -> XlsxResult<()> {
        let parts = Self::package_parts(file)?;
        container::write_parts(&parts, writer)
    }

    /// Marshal a document into its worksheet, shared-strings and workbook
    /// relationships parts
    ///
    /// Sheets are numbered in insertion order and get relationship ids
    /// `rId1..rIdN` in the same order. The document's shared-string table is
    /// replaced with the one built by this pass; on error the document is
    /// left untouched and no parts are returned.
    pub fn marshal_parts(file: &mut File) -> XlsxResult<PartMap> {
        let marshalled = Self::marshal(file)?;
        let parts = Self::core_parts(&marshalled);

        log::debug!(
            "marshalled {} sheets into {} parts ({} unique strings)",
            file.sheet_count(),
            parts.len(),
            marshalled.shared_strings.unique_count()
        );

        file.set_shared_strings(marshalled.shared_strings);
        Ok(parts)
    }

    /// Marshal a document into a complete package part set
    ///
    /// Adds the workbook manifest, content types and root relationships to
    /// the core parts, and links the shared-strings part from the workbook.
    pub fn package_parts(file: &mut File) -> XlsxResult<PartMap> {
        let mut marshalled = Self::marshal(file)?;

        let sheet_ids: Vec<String> = marshalled
            .relationships
            .iter()
            .map(|r| r.id.clone())
            .collect();
        marshalled
            .relationships
            .add(rel_type::SHARED_STRINGS, "sharedStrings.xml");

        let mut parts = Self::core_parts(&marshalled);
        parts.insert(
            WORKBOOK_PART.to_string(),
            Self::workbook_xml(file, &sheet_ids),
        );
        parts.insert(
            CONTENT_TYPES_PART.to_string(),
            Self::content_types_xml(file.sheet_count()),
        );
        parts.insert(ROOT_RELS_PART.to_string(), Self::root_rels_xml());

        log::debug!("packaged {} parts", parts.len());

        file.set_shared_strings(marshalled.shared_strings);
        Ok(parts)
    }

    /// Single pass over sheets, rows and cells in order
    fn marshal(file: &File) -> XlsxResult<Marshalled> {
        let mut seen = HashSet::new();
        for sheet in file.sheets() {
            if !seen.insert(sheet.name().to_lowercase()) {
                return Err(XlsxError::Marshal(format!(
                    "duplicate sheet name '{}'",
                    sheet.name()
                )));
            }
        }

        let mut shared_strings = SharedStringTable::new();
        let mut relationships = Relationships::new();
        let mut worksheets = Vec::with_capacity(file.sheet_count());

        for (i, sheet) in file.sheets().enumerate() {
            worksheets.push(Self::worksheet_xml(sheet, &mut shared_strings)?);
            relationships.add(rel_type::WORKSHEET, &worksheet_target(i + 1));
            log::trace!("marshalled sheet {} '{}'", i + 1, sheet.name());
        }

        Ok(Marshalled {
            worksheets,
            shared_strings,
            relationships,
        })
    }

    fn core_parts(marshalled: &Marshalled) -> PartMap {
        let mut parts = PartMap::new();

        for (i, xml) in marshalled.worksheets.iter().enumerate() {
            parts.insert(worksheet_part(i + 1), xml.clone());
        }
        parts.insert(
            SHARED_STRINGS_PART.to_string(),
            Self::shared_strings_xml(&marshalled.shared_strings),
        );
        parts.insert(
            WORKBOOK_RELS_PART.to_string(),
            marshalled.relationships.to_xml(),
        );

        parts
    }

    fn worksheet_xml(sheet: &Sheet, shared_strings: &mut SharedStringTable) -> XlsxResult<String> {
        let mut sheet_data = String::new();

        for (r, row) in sheet.rows().iter().enumerate() {
            if row.is_blank() {
                continue;
            }
            if r >= MAX_ROWS as usize {
                return Err(XlsxError::Marshal(format!(
                    "sheet '{}' has a row past the last worksheet row",
                    sheet.name()
                )));
            }

            sheet_data.push_str(&format!("\n        <row r=\"{}\">", r + 1));

            for (c, cell) in row.occupied() {
                if c >= MAX_COLS as usize {
                    return Err(XlsxError::Marshal(format!(
                        "sheet '{}' row {} has a cell past the last worksheet column",
                        sheet.name(),
                        r + 1
                    )));
                }

                let cell_ref = CellAddress::new(r as u32, c as u16).to_a1_string();

                match cell.value() {
                    CellValue::String(s) => {
                        let index = shared_strings.intern(s);
                        sheet_data.push_str(&format!(
                            "\n            <c r=\"{}\" t=\"s\"><v>{}</v></c>",
                            cell_ref, index
                        ));
                    }
                    CellValue::Number(n) => {
                        if !n.is_finite() {
                            return Err(XlsxError::Marshal(format!(
                                "cell {}!{} holds {}, which has no numeric literal form",
                                sheet.name(),
                                cell_ref,
                                n
                            )));
                        }
                        sheet_data.push_str(&format!(
                            "\n            <c r=\"{}\"><v>{}</v></c>",
                            cell_ref, n
                        ));
                    }
                    CellValue::Boolean(b) => {
                        sheet_data.push_str(&format!(
                            "\n            <c r=\"{}\" t=\"b\"><v>{}</v></c>",
                            cell_ref,
                            if *b { 1 } else { 0 }
                        ));
                    }
                    CellValue::Empty => {}
                }
            }

            sheet_data.push_str("\n        </row>");
        }

        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!("\n<worksheet xmlns=\"{}\">", SPREADSHEETML_NS));
        content.push_str(&format!(
            "\n    <dimension ref=\"{}\"/>",
            sheet.dimension()
        ));
        if sheet_data.is_empty() {
            content.push_str("\n    <sheetData/>");
        } else {
            content.push_str("\n    <sheetData>");
            content.push_str(&sheet_data);
            content.push_str("\n    </sheetData>");
        }
        content.push_str("\n</worksheet>");

        Ok(content)
    }

    fn shared_strings_xml(shared_strings: &SharedStringTable) -> String {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<sst xmlns=\"{}\" count=\"{}\" uniqueCount=\"{}\">",
            SPREADSHEETML_NS,
            shared_strings.count(),
            shared_strings.unique_count()
        ));

        for (_, s) in shared_strings.iter() {
            let space = if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
                " xml:space=\"preserve\""
            } else {
                ""
            };
            content.push_str(&format!(
                "\n    <si><t{}>{}</t></si>",
                space,
                escape_xml(&encode_excel_escapes(s))
            ));
        }

        content.push_str("\n</sst>");
        content
    }

    fn workbook_xml(file: &File, sheet_ids: &[String]) -> String {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<workbook xmlns=\"{}\" xmlns:r=\"{}\">\n    <sheets>",
            SPREADSHEETML_NS, OFFICE_RELATIONSHIPS_NS
        ));

        for (i, (sheet, id)) in file.sheets().zip(sheet_ids).enumerate() {
            content.push_str(&format!(
                "\n        <sheet name=\"{}\" sheetId=\"{}\" r:id=\"{}\"/>",
                escape_xml(sheet.name()),
                i + 1,
                id
            ));
        }

        content.push_str("\n    </sheets>\n</workbook>");
        content
    }

    fn content_types_xml(sheet_count: usize) -> String {
        let mut content = String::from(XML_DECLARATION);
        content.push_str(&format!(
            "\n<Types xmlns=\"{}\">\n    <Default Extension=\"rels\" ContentType=\"{}\"/>\n    <Default Extension=\"xml\" ContentType=\"{}\"/>",
            CONTENT_TYPES_NS,
            content_type::RELATIONSHIPS,
            content_type::XML
        ));

        let mut overrides = vec![(format!("/{}", WORKBOOK_PART), content_type::WORKBOOK)];
        for i in 0..sheet_count {
            overrides.push((format!("/{}", worksheet_part(i + 1)), content_type::WORKSHEET));
        }
        overrides.push((
            format!("/{}", SHARED_STRINGS_PART),
            content_type::SHARED_STRINGS,
        ));

        for (part, ct) in overrides {
            content.push_str(&format!(
                "\n    <Override PartName=\"{}\" ContentType=\"{}\"/>",
                part, ct
            ));
        }

        content.push_str("\n</Types>");
        content
    }

    fn root_rels_xml() -> String {
        let mut rels = Relationships::new();
        rels.add(rel_type::OFFICE_DOCUMENT, WORKBOOK_PART);
        rels.to_xml()
    }
}

/// Encode characters XML cannot carry, plus literal `_xHHHH_` runs, in
/// Excel's `_xHHHH_` form.
fn encode_excel_escapes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());

    for (i, c) in s.char_indices() {
        match c {
            '_' if looks_like_escape(&s[i..]) => result.push_str("_x005F_"),
            '\t' | '\n' => result.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {
                result.push_str(&format!("_x{:04X}_", c as u32))
            }
            c => result.push(c),
        }
    }

    result
}

fn looks_like_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() >= 7
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sheet_with(values: &[(&str, CellValue)]) -> Sheet {
        let mut sheet = Sheet::new("S");
        for (addr, value) in values {
            sheet.set_cell_value(addr, value.clone()).unwrap();
        }
        sheet
    }

    #[test]
    fn test_worksheet_xml_layout() {
        let sheet = sheet_with(&[
            ("A1", CellValue::string("x")),
            ("C1", CellValue::Number(2.5)),
            ("B3", CellValue::Boolean(true)),
        ]);
        let mut table = SharedStringTable::new();

        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
    <dimension ref="A1:C3"/>
    <sheetData>
        <row r="1">
            <c r="A1" t="s"><v>0</v></c>
            <c r="C1"><v>2.5</v></c>
        </row>
        <row r="3">
            <c r="B3" t="b"><v>1</v></c>
        </row>
    </sheetData>
</worksheet>"#;
        assert_eq!(XlsxWriter::worksheet_xml(&sheet, &mut table).unwrap(), expected);
        assert_eq!(table.unique_count(), 1);
    }

    #[test]
    fn test_empty_worksheet_xml() {
        let mut table = SharedStringTable::new();
        let xml = XlsxWriter::worksheet_xml(&Sheet::new("Empty"), &mut table).unwrap();
        assert!(xml.contains(r#"<dimension ref="A1:A1"/>"#));
        assert!(xml.contains("<sheetData/>"));
    }

    #[test]
    fn test_non_finite_number_is_rejected() {
        let sheet = sheet_with(&[("B2", CellValue::Number(f64::NAN))]);
        let mut table = SharedStringTable::new();
        let err = XlsxWriter::worksheet_xml(&sheet, &mut table).unwrap_err();
        assert!(matches!(err, XlsxError::Marshal(_)));
    }

    #[test]
    fn test_shared_strings_xml() {
        let mut table = SharedStringTable::new();
        table.intern("A cell!");
        table.intern(" padded ");
        table.intern("A cell!");
        table.intern("<&>");

        let expected = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="4" uniqueCount="3">
    <si><t>A cell!</t></si>
    <si><t xml:space="preserve"> padded </t></si>
    <si><t>&lt;&amp;&gt;</t></si>
</sst>"#;
        assert_eq!(XlsxWriter::shared_strings_xml(&table), expected);
    }

    #[test]
    fn test_encode_excel_escapes() {
        assert_eq!(encode_excel_escapes("plain_text"), "plain_text");
        assert_eq!(encode_excel_escapes("a_x000D_b"), "a_x005F_x000D_b");
        assert_eq!(encode_excel_escapes("line\r\nbreak"), "line_x000D_\nbreak");
        assert_eq!(encode_excel_escapes("bell\u{7}"), "bell_x0007_");
        assert_eq!(encode_excel_escapes("x\u{FFFE}y\u{FFFF}"), "x_xFFFE_y_xFFFF_");
    }

    #[test]
    fn test_workbook_xml_escapes_names() {
        let mut file = File::new();
        file.add_sheet("Q&A").unwrap();
        let xml = XlsxWriter::workbook_xml(&file, &["rId1".to_string()]);
        assert!(xml.contains(r#"<sheet name="Q&amp;A" sheetId="1" r:id="rId1"/>"#));
    }
}
