//! Property tests for marshal/unmarshal over generated sheets

use openxl::prelude::*;
use openxl::PartSet;
use proptest::prelude::*;

fn cell_value() -> impl Strategy<Value = CellValue> {
    prop_oneof![
        Just(CellValue::Empty),
        "[a-zA-Z0-9 <>&'\"_\n]{0,12}".prop_map(CellValue::String),
        any::<f64>()
            .prop_filter("finite", |n| n.is_finite())
            .prop_map(CellValue::Number),
        any::<bool>().prop_map(CellValue::Boolean),
    ]
}

fn grid() -> impl Strategy<Value = Vec<Vec<CellValue>>> {
    prop::collection::vec(prop::collection::vec(cell_value(), 0..6), 0..6)
}

fn build(grids: &[Vec<Vec<CellValue>>]) -> File {
    let mut file = File::new();
    for (i, rows) in grids.iter().enumerate() {
        let sheet = file.add_sheet(&format!("Sheet{}", i + 1)).unwrap();
        for cells in rows {
            let row = sheet.add_row();
            for value in cells {
                row.push(value.clone());
            }
        }
    }
    file
}

fn occupied(file: &File) -> Vec<(String, usize, usize, CellValue)> {
    file.sheets()
        .flat_map(|sheet| {
            sheet
                .occupied_cells()
                .map(move |(r, c, cell)| (sheet.name().to_string(), r, c, cell.value().clone()))
        })
        .collect()
}

proptest! {
    #[test]
    fn unmarshal_inverts_marshal(grids in prop::collection::vec(grid(), 1..4)) {
        let mut file = build(&grids);
        let parts: PartSet = XlsxWriter::package_parts(&mut file)
            .unwrap()
            .into_iter()
            .map(|(path, xml)| (path, xml.into_bytes()))
            .collect();

        let file2 = XlsxReader::unmarshal_parts(&parts).unwrap();

        prop_assert_eq!(file2.sheet_names(), file.sheet_names());
        prop_assert_eq!(occupied(&file2), occupied(&file));
        prop_assert_eq!(file2.shared_strings().strings(), file.shared_strings().strings());
        prop_assert_eq!(file2.shared_strings().count(), file.shared_strings().count());
    }

    #[test]
    fn interning_assigns_one_index_per_distinct_string(grids in prop::collection::vec(grid(), 1..4)) {
        let mut file = build(&grids);
        XlsxWriter::marshal_parts(&mut file).unwrap();

        let string_cells = occupied(&file)
            .iter()
            .filter(|(_, _, _, v)| v.as_string().is_some())
            .count();
        let table = file.shared_strings();
        prop_assert_eq!(table.count(), string_cells);

        let mut distinct: Vec<&str> = table.strings().iter().map(String::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(distinct.len(), table.unique_count());

        for (index, s) in table.iter() {
            prop_assert_eq!(table.index_of(s), Some(index));
        }
    }
}
