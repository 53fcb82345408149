use converter_core::{ConversionRecord, ConverterError, Result};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

pub const SHEET_NAME: &str = "History";
pub const HEADER: [&str; 5] = ["Category", "From", "To", "Input", "Result"];

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// Header row followed by one row per record, in record field order.
pub fn sheet_rows(records: &[ConversionRecord]) -> Vec<Vec<CellValue>> {
    let header = HEADER
        .iter()
        .map(|title| CellValue::Text(title.to_string()))
        .collect();

    std::iter::once(header)
        .chain(records.iter().map(|record| {
            vec![
                CellValue::Text(record.category().name().to_string()),
                CellValue::Text(record.from().name().to_string()),
                CellValue::Text(record.to().name().to_string()),
                CellValue::Number(record.input()),
                CellValue::Number(record.result()),
            ]
        }))
        .collect()
}

/// Render the history as an `.xlsx` workbook held in memory.
pub fn export_spreadsheet(records: &[ConversionRecord]) -> Result<Vec<u8>> {
    render(records).map_err(|e| ConverterError::ExportError(format!("Failed to build spreadsheet: {}", e)))
}

fn render(records: &[ConversionRecord]) -> std::result::Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (row, cells) in sheet_rows(records).into_iter().enumerate() {
        let row = row as u32;
        for (col, cell) in cells.into_iter().enumerate() {
            let col = col as u16;
            match cell {
                CellValue::Text(text) if row == 0 => {
                    worksheet.write_string_with_format(row, col, text, &bold)?;
                }
                CellValue::Text(text) => {
                    worksheet.write_string(row, col, text)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row, col, value)?;
                }
            }
        }
    }

    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
    use converter_core::{Conversion, Currency, LengthUnit, TemperatureUnit, Unit};
    use std::io::Cursor;

    fn records() -> Vec<ConversionRecord> {
        vec![
            ConversionRecord::new(
                Conversion::new(
                    Unit::Temperature(TemperatureUnit::Celsius),
                    Unit::Temperature(TemperatureUnit::Fahrenheit),
                )
                .unwrap(),
                100.0,
                212.0,
            ),
            ConversionRecord::new(
                Conversion::new(Unit::Currency(Currency::Gbp), Unit::Currency(Currency::Eur)).unwrap(),
                20.0,
                23.41234,
            ),
        ]
    }

    #[test]
    fn test_rows_follow_history_order() {
        let rows = sheet_rows(&records());
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0],
            HEADER.iter().map(|h| CellValue::Text(h.to_string())).collect::<Vec<_>>()
        );
        assert_eq!(
            rows[1],
            vec![
                CellValue::Text("Temperature".into()),
                CellValue::Text("Celsius".into()),
                CellValue::Text("Fahrenheit".into()),
                CellValue::Number(100.0),
                CellValue::Number(212.0),
            ]
        );
        assert_eq!(rows[2][1], CellValue::Text("GBP".into()));
        assert_eq!(rows[2][4], CellValue::Number(23.4123));
    }

    fn read_back(bytes: Vec<u8>) -> (Vec<String>, Vec<Vec<Data>>) {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let names = workbook.sheet_names();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        (names, range.rows().map(|row| row.to_vec()).collect())
    }

    fn as_data(cell: &CellValue) -> Data {
        match cell {
            CellValue::Text(text) => Data::String(text.clone()),
            CellValue::Number(value) => Data::Float(*value),
        }
    }

    #[test]
    fn test_workbook_is_a_zip_container() {
        let bytes = export_spreadsheet(&records()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_workbook_holds_one_row_per_record() {
        let records = records();
        let (names, rows) = read_back(export_spreadsheet(&records).unwrap());

        assert_eq!(names, vec![SHEET_NAME.to_string()]);
        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(
            rows[0],
            HEADER.iter().map(|h| Data::String(h.to_string())).collect::<Vec<_>>()
        );
        assert_eq!(rows[1][0], Data::String("Temperature".into()));
        assert_eq!(rows[2][4], Data::Float(23.4123));
    }

    #[test]
    fn test_workbook_keeps_history_order() {
        let conversion = Conversion::new(
            Unit::Length(LengthUnit::Meters),
            Unit::Length(LengthUnit::Kilometers),
        )
        .unwrap();
        let records: Vec<_> = (1..=30)
            .map(|i| ConversionRecord::new(conversion, i as f64 * 100.0, i as f64 / 10.0))
            .collect();

        let (_, rows) = read_back(export_spreadsheet(&records).unwrap());

        let expected: Vec<Vec<Data>> = sheet_rows(&records)
            .iter()
            .map(|row| row.iter().map(as_data).collect())
            .collect();
        assert_eq!(rows, expected);
    }
}
