use super::utils::*;
use std::collections::HashSet;
use std::io::Cursor;
use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use polars::prelude::*;
use rayon::prelude::*;
use crate::error::AppError;

/// Inferred storage type for one workbook column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Date,
    Boolean,
    Text,
    Empty,
}

/// Reads the first sheet of a workbook into a frame. The first row is the
/// header; every later row is a record.
pub fn read_workbook(file_data: Bytes) -> Result<DataFrame, AppError> {
    let start = std::time::Instant::now();
    let cursor = Cursor::new(file_data);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| {
            tracing::warn!("Failed to open workbook: {}", e);
            AppError::FileProcessingError(format!("Failed to open workbook: {}", e))
        })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::FileProcessingError("No sheets found in workbook".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::FileProcessingError(format!("Failed to read worksheet {}: {}", sheet_name, e)))?;

    let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();
    if rows.is_empty() {
        return Err(AppError::FileProcessingError(format!("Sheet {} is empty", sheet_name)));
    }

    let mut existing_names = HashSet::new();
    let headers: Vec<String> = rows[0]
        .iter()
        .enumerate()
        .map(|(idx, cell)| unique_header(cell, idx, &mut existing_names))
        .collect();

    tracing::debug!("Creating dataframe for sheet {} with {} rows", sheet_name, rows.len() - 1);
    let df = create_dataframe(&rows[1..], &headers)?;
    tracing::info!(
        sheet = %sheet_name,
        rows = df.height(),
        cols = df.width(),
        "Workbook parsed in {:?}",
        start.elapsed()
    );
    Ok(df)
}

pub fn detect_column_type(values: &[Data]) -> ColumnKind {
    let (numeric_count, date_count, bool_count, filled) = values
        .par_iter()
        .filter(|v| !matches!(v, Data::Empty))
        .fold(
            || (0usize, 0usize, 0usize, 0usize),
            |(mut num, mut date, mut bool, mut filled), value| {
                filled += 1;
                match value {
                    Data::Float(_) | Data::Int(_) => num += 1,
                    Data::DateTime(_) => date += 1,
                    Data::DateTimeIso(s) | Data::String(s) if is_date_string(s) => date += 1,
                    Data::Bool(_) => bool += 1,
                    _ => {}
                }
                (num, date, bool, filled)
            },
        )
        .reduce(
            || (0, 0, 0, 0),
            |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2, a.3 + b.3),
        );

    match filled {
        0 => ColumnKind::Empty,
        n if numeric_count == n => ColumnKind::Numeric,
        n if date_count == n => ColumnKind::Date,
        n if bool_count == n => ColumnKind::Boolean,
        _ => ColumnKind::Text,
    }
}

fn create_dataframe(rows: &[Vec<Data>], headers: &[String]) -> Result<DataFrame, AppError> {
    if headers.is_empty() {
        return Err(AppError::FileProcessingError("Workbook has no header row".to_string()));
    }

    let columns = headers
        .par_iter()
        .enumerate()
        .map(|(col_idx, header)| {
            let values: Vec<Data> = rows
                .iter()
                .map(|row| row.get(col_idx).cloned().unwrap_or(Data::Empty))
                .collect();
            build_series(header, &values)
        })
        .collect::<Result<Vec<Series>, AppError>>()?;

    DataFrame::new(columns)
        .map_err(|e| AppError::FileProcessingError(format!("Failed to create DataFrame: {}", e)))
}

fn build_series(header: &str, values: &[Data]) -> Result<Series, AppError> {
    let series = match detect_column_type(values) {
        ColumnKind::Numeric => {
            let nums: Vec<Option<f64>> = values
                .iter()
                .map(|v| match v {
                    Data::Float(f) => Some(*f),
                    Data::Int(i) => Some(*i as f64),
                    _ => None,
                })
                .collect();
            Series::new(header, nums)
        }
        ColumnKind::Date => {
            let millis: Vec<Option<i64>> = values
                .iter()
                .map(|v| match v {
                    Data::DateTime(d) => excel_serial_to_millis(d.as_f64()),
                    Data::DateTimeIso(s) | Data::String(s) => parse_date_string(s),
                    _ => None,
                })
                .collect();
            Series::new(header, millis)
                .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        }
        ColumnKind::Boolean => {
            let flags: Vec<Option<bool>> = values
                .iter()
                .map(|v| match v {
                    Data::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Series::new(header, flags)
        }
        ColumnKind::Text | ColumnKind::Empty => {
            let strings: Vec<Option<String>> = values
                .iter()
                .map(|v| match v {
                    Data::Empty => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Series::new(header, strings)
        }
    };
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_only_when_every_filled_cell_is_numeric() {
        let values = vec![Data::Int(1), Data::Float(2.5), Data::Empty];
        assert_eq!(detect_column_type(&values), ColumnKind::Numeric);

        let mixed = vec![Data::Int(1), Data::String("n/a".into())];
        assert_eq!(detect_column_type(&mixed), ColumnKind::Text);
    }

    #[test]
    fn date_strings_and_blank_columns() {
        let dates = vec![Data::String("2024-01-01".into()), Data::String("2024-02-01".into())];
        assert_eq!(detect_column_type(&dates), ColumnKind::Date);
        assert_eq!(detect_column_type(&[Data::Empty, Data::Empty]), ColumnKind::Empty);
        assert_eq!(detect_column_type(&[Data::Bool(true)]), ColumnKind::Boolean);
    }

    #[test]
    fn builds_typed_columns_with_nulls_for_blank_cells() {
        let headers = vec!["SKU".to_string(), "Price".to_string()];
        let rows = vec![
            vec![Data::String("SKU0".into()), Data::Float(9.5)],
            vec![Data::String("SKU1".into()), Data::Empty],
            vec![Data::Empty, Data::Int(3)],
        ];
        let df = create_dataframe(&rows, &headers).unwrap();
        assert_eq!(df.shape(), (3, 2));
        assert_eq!(df.column("Price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("Price").unwrap().null_count(), 1);
        assert_eq!(df.column("SKU").unwrap().null_count(), 1);
    }

    #[test]
    fn short_rows_are_padded_with_nulls() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let rows = vec![vec![Data::Int(1)]];
        let df = create_dataframe(&rows, &headers).unwrap();
        assert_eq!(df.column("B").unwrap().null_count(), 1);
    }

    fn two_sheet_workbook() -> Bytes {
        let mut workbook = rust_xlsxwriter::Workbook::new();

        let inventory = workbook.add_worksheet();
        inventory.set_name("Inventory").unwrap();
        inventory.write_string(0, 0, "SKU").unwrap();
        inventory.write_string(0, 1, "Price").unwrap();
        inventory.write_string(0, 2, "In stock").unwrap();
        inventory.write_string(1, 0, "SKU0").unwrap();
        inventory.write_number(1, 1, 9.5).unwrap();
        inventory.write_boolean(1, 2, true).unwrap();
        inventory.write_string(2, 0, "SKU1").unwrap();
        inventory.write_number(2, 1, 3.0).unwrap();
        inventory.write_boolean(2, 2, false).unwrap();

        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "Comment").unwrap();
        for row in 1..6 {
            notes.write_string(row, 0, "ignored").unwrap();
        }

        Bytes::from(workbook.save_to_buffer().unwrap())
    }

    #[test]
    fn reads_first_sheet_with_header_row_and_typed_columns() {
        let df = read_workbook(two_sheet_workbook()).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert_eq!(df.get_column_names(), &["SKU", "Price", "In stock"]);
        assert_eq!(df.column("SKU").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Price").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("In stock").unwrap().dtype(), &DataType::Boolean);
        let prices: Vec<Option<f64>> = df.column("Price").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(prices, vec![Some(9.5), Some(3.0)]);
    }

    #[test]
    fn non_workbook_bytes_fail_to_open() {
        let err = read_workbook(Bytes::from_static(b"SKU,Price\nA,1\n")).unwrap_err();
        assert!(matches!(err, AppError::FileProcessingError(_)));
    }
}
