//! End-to-end tests for XLSX roundtrip (create -> save -> read -> verify)

use openxl::prelude::*;
use pretty_assertions::assert_eq;
use std::io::Cursor;

fn roundtrip(file: &mut File) -> File {
    let mut buf = Vec::new();
    XlsxWriter::write(file, Cursor::new(&mut buf)).unwrap();
    XlsxReader::read(Cursor::new(&buf)).unwrap()
}

/// Test basic roundtrip with numeric values
#[test]
fn test_roundtrip_numbers() {
    let mut file = File::new();
    let sheet = file.add_sheet("Numbers").unwrap();

    sheet.set_cell_value("A1", 42.0).unwrap();
    sheet.set_cell_value("B1", 3.14159).unwrap();
    sheet.set_cell_value("C1", -100.5).unwrap();
    sheet.set_cell_value("A2", 0.0).unwrap();
    sheet.set_cell_value("B2", 1e10).unwrap();
    sheet.set_cell_value("C2", 0.1 + 0.2).unwrap();

    let file2 = roundtrip(&mut file);
    let sheet2 = file2.sheet(0).unwrap();

    assert_eq!(sheet2.get_value("A1").unwrap().as_number(), Some(42.0));
    assert_eq!(sheet2.get_value("B1").unwrap().as_number(), Some(3.14159));
    assert_eq!(sheet2.get_value("C1").unwrap().as_number(), Some(-100.5));
    assert_eq!(sheet2.get_value("A2").unwrap().as_number(), Some(0.0));
    assert_eq!(sheet2.get_value("B2").unwrap().as_number(), Some(1e10));
    // Shortest round-trip formatting keeps every bit
    assert_eq!(sheet2.get_value("C2").unwrap().as_number(), Some(0.1 + 0.2));
}

/// Test basic roundtrip with string values
#[test]
fn test_roundtrip_strings() {
    let mut file = File::new();
    let sheet = file.add_sheet("Strings").unwrap();

    sheet.set_cell_value("A1", "Hello, World!").unwrap();
    sheet.set_cell_value("B1", "").unwrap();
    sheet.set_cell_value("C1", "Special: <>&\"'").unwrap();
    sheet.set_cell_value("A2", "Multi\nLine").unwrap();
    sheet.set_cell_value("B2", "Unicode: \u{1F600}").unwrap();
    sheet.set_cell_value("C2", "  padded  ").unwrap();
    sheet.set_cell_value("A3", "Looks like _x000D_ an escape").unwrap();
    sheet.set_cell_value("B3", "Carriage\r\nreturn").unwrap();

    let file2 = roundtrip(&mut file);
    let sheet2 = file2.sheet(0).unwrap();

    for addr in ["A1", "B1", "C1", "A2", "B2", "C2", "A3", "B3"] {
        assert_eq!(
            sheet2.get_value(addr).unwrap(),
            file.sheet(0).unwrap().get_value(addr).unwrap(),
            "cell {addr}"
        );
    }
}

/// Test roundtrip with boolean values
#[test]
fn test_roundtrip_booleans() {
    let mut file = File::new();
    let sheet = file.add_sheet("Booleans").unwrap();

    sheet.set_cell_value("A1", true).unwrap();
    sheet.set_cell_value("A2", false).unwrap();

    let file2 = roundtrip(&mut file);
    let sheet2 = file2.sheet(0).unwrap();

    assert_eq!(sheet2.get_value("A1").unwrap(), CellValue::Boolean(true));
    assert_eq!(sheet2.get_value("A2").unwrap(), CellValue::Boolean(false));
}

/// Gaps inside a row and between rows come back as empty positions
#[test]
fn test_roundtrip_sparse_layout() {
    let mut file = File::new();
    let sheet = file.add_sheet("Sparse").unwrap();

    sheet.set_cell_value("B2", "x").unwrap();
    sheet.set_cell_value("E2", 5.0).unwrap();
    sheet.set_cell_value("A4", true).unwrap();

    let file2 = roundtrip(&mut file);
    let sheet2 = file2.sheet(0).unwrap();

    assert_eq!(sheet2.row_count(), 4);
    assert!(sheet2.row(0).unwrap().is_blank());
    assert_eq!(sheet2.row(1).unwrap().len(), 5);
    assert!(sheet2.cell(1, 0).unwrap().is_empty());
    assert_eq!(sheet2.get_value("E2").unwrap(), CellValue::Number(5.0));
    assert_eq!(sheet2.dimension(), CellRange::parse("A2:E4").unwrap());
}

/// Sheet names and order survive; structure matches cell for cell
#[test]
fn test_roundtrip_multiple_sheets() {
    let mut file = File::new();
    for (i, name) in ["Zeta", "Alpha", "Q&A <2>"].iter().enumerate() {
        let sheet = file.add_sheet(name).unwrap();
        let row = sheet.add_row();
        row.push(*name);
        row.push(i as f64);
        row.push(i % 2 == 0);
    }

    let file2 = roundtrip(&mut file);

    assert_eq!(file2.sheet_names(), vec!["Zeta", "Alpha", "Q&A <2>"]);
    for (a, b) in file.sheets().zip(file2.sheets()) {
        assert_eq!(a.rows(), b.rows());
    }
}

/// Reading rebuilds the shared-string table the writer produced
#[test]
fn test_roundtrip_shared_strings() {
    let mut file = File::new();
    let sheet = file.add_sheet("S").unwrap();
    sheet.set_cell_value("A1", "dup").unwrap();
    sheet.set_cell_value("A2", "other").unwrap();
    sheet.set_cell_value("A3", "dup").unwrap();

    let file2 = roundtrip(&mut file);

    assert_eq!(file.shared_strings().strings(), vec!["dup", "other"]);
    assert_eq!(file2.shared_strings().strings(), file.shared_strings().strings());
    assert_eq!(file2.shared_strings().count(), 3);
}

#[test]
fn test_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.xlsx");

    let mut file = File::new();
    file.add_sheet("Data")
        .unwrap()
        .set_cell_value("A1", "saved")
        .unwrap();
    file.save(&path).unwrap();

    let file2 = File::open(&path).unwrap();
    assert_eq!(
        file2.sheet_by_name("data").unwrap().get_value("A1").unwrap(),
        CellValue::string("saved")
    );
}

#[test]
fn test_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();

    let mut file = File::new();
    let err = file.save(dir.path().join("test.csv")).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)));

    assert!(File::open(dir.path().join("test.ods")).is_err());
}

#[test]
fn test_read_rejects_archive_without_content_types() {
    let parts: openxl::PartMap = [(
        "xl/workbook.xml".to_string(),
        "<workbook><sheets/></workbook>".to_string(),
    )]
    .into_iter()
    .collect();

    let mut buf = Vec::new();
    openxl_xlsx::container::write_parts(&parts, Cursor::new(&mut buf)).unwrap();

    let err = XlsxReader::read(Cursor::new(&buf)).unwrap_err();
    assert!(matches!(err, XlsxError::InvalidFormat(_)));
}
