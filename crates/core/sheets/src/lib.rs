//! Reader for spreadsheets of numbers and prices.
//!
//! Rows and columns are counted from the first used cell of the first
//! sheet. The first row is a header. Every following row contributes its
//! first two cells as a (number, price) pair, as long as neither cell is
//! empty.
use std::fmt::Display;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use callee_database::CellValue;
use callee_result::{create_error, Error, Result};

/// Column holding the number
const NUMBER_COLUMN: usize = 0;

/// Column holding the price
const PRICE_COLUMN: usize = 1;

fn spreadsheet_error(err: impl Display) -> Error {
    create_error!(SpreadsheetError {
        reason: err.to_string()
    })
}

/// Convert a calamine cell, empty cells are null
fn cell_value(data: Option<&Data>) -> Option<CellValue> {
    match data? {
        Data::Empty => None,
        Data::Int(value) => Some(CellValue::Number(*value as f64)),
        Data::Float(value) => Some(CellValue::Number(*value)),
        Data::Bool(value) => Some(CellValue::Number(if *value { 1.0 } else { 0.0 })),
        Data::DateTime(value) => Some(CellValue::Number(value.as_f64())),
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            Some(CellValue::Text(value.clone()))
        }
        Data::Error(value) => Some(CellValue::Text(value.to_string())),
    }
}

/// Read the (number, price) pairs of a workbook's first sheet
///
/// The format (xlsx, xlsm, xlsb, xls or ods) is detected from the content.
pub fn read_number_rows(bytes: Vec<u8>) -> Result<Vec<(CellValue, CellValue)>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(spreadsheet_error)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| spreadsheet_error("workbook has no sheets"))?
        .map_err(spreadsheet_error)?;

    // First used row is the header
    let rows: Vec<(CellValue, CellValue)> = range
        .rows()
        .skip(1)
        .filter_map(|row| {
            let number = cell_value(row.get(NUMBER_COLUMN))?;
            let price = cell_value(row.get(PRICE_COLUMN))?;
            Some((number, price))
        })
        .collect();

    tracing::debug!(
        "Read {} usable rows out of {} in the first sheet",
        rows.len(),
        range.height().saturating_sub(1)
    );

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use callee_database::CellValue;
    use callee_result::ErrorType;
    use umya_spreadsheet::Worksheet;

    use crate::read_number_rows;

    fn workbook(fill: impl FnOnce(&mut Worksheet)) -> Vec<u8> {
        offset_workbook(|sheet| {
            sheet.get_cell_mut((1, 1)).set_value("Number");
            sheet.get_cell_mut((2, 1)).set_value("Price");
            fill(sheet);
        })
    }

    #[test]
    fn skips_header_and_rows_missing_a_price() {
        let bytes = workbook(|sheet| {
            sheet.get_cell_mut((1, 2)).set_value_number(9820011111.0);
            sheet.get_cell_mut((2, 2)).set_value_number(150.0);
            sheet.get_cell_mut((1, 3)).set_value_number(9820022222.0);
            sheet.get_cell_mut((1, 4)).set_value_string("98200-33333");
            sheet.get_cell_mut((2, 4)).set_value_number(99.5);
        });

        let rows = read_number_rows(bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                (CellValue::Number(9820011111.0), CellValue::Number(150.0)),
                (
                    CellValue::Text("98200-33333".to_string()),
                    CellValue::Number(99.5)
                ),
            ]
        );
    }

    #[test]
    fn ignores_cells_after_the_price() {
        let bytes = workbook(|sheet| {
            sheet.get_cell_mut((1, 2)).set_value_string("A-1");
            sheet.get_cell_mut((2, 2)).set_value_string("12.25");
            sheet.get_cell_mut((3, 2)).set_value("note");
            sheet.get_cell_mut((3, 3)).set_value("orphan note");
        });

        let rows = read_number_rows(bytes).unwrap();
        assert_eq!(rows, vec![("A-1".into(), "12.25".into())]);
    }

    fn offset_workbook(fill: impl FnOnce(&mut Worksheet)) -> Vec<u8> {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").expect("default sheet");
        fill(sheet);

        let mut buf = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buf).expect("write xlsx");
        buf.into_inner()
    }

    #[test]
    fn header_below_blank_rows_is_skipped() {
        let bytes = offset_workbook(|sheet| {
            sheet.get_cell_mut((1, 2)).set_value("Number");
            sheet.get_cell_mut((2, 2)).set_value("Price");
            sheet.get_cell_mut((1, 3)).set_value_string("111");
            sheet.get_cell_mut((2, 3)).set_value_number(5.0);
            sheet.get_cell_mut((1, 4)).set_value_string("222");
            sheet.get_cell_mut((2, 4)).set_value_number(6.0);
        });

        let rows = read_number_rows(bytes).unwrap();
        assert_eq!(
            rows,
            vec![
                ("111".into(), CellValue::Number(5.0)),
                ("222".into(), CellValue::Number(6.0)),
            ]
        );
    }

    #[test]
    fn columns_start_at_first_used_column() {
        let bytes = offset_workbook(|sheet| {
            sheet.get_cell_mut((2, 1)).set_value("Number");
            sheet.get_cell_mut((3, 1)).set_value("Price");
            sheet.get_cell_mut((2, 2)).set_value_string("A-1");
            sheet.get_cell_mut((3, 2)).set_value_number(7.5);
        });

        let rows = read_number_rows(bytes).unwrap();
        assert_eq!(rows, vec![("A-1".into(), CellValue::Number(7.5))]);
    }

    #[test]
    fn header_only_sheet_has_no_rows() {
        let rows = read_number_rows(workbook(|_| {})).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn rejects_files_that_are_not_spreadsheets() {
        let error = read_number_rows(b"city,number,price\n".to_vec()).unwrap_err();
        assert!(matches!(
            error.error_type,
            ErrorType::SpreadsheetError { .. }
        ));
    }
}
