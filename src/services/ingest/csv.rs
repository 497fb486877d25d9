use std::io::Cursor;

use bytes::Bytes;
use polars::prelude::*;

use crate::error::AppError;

/// Parses comma-separated UTF-8 text with a header row. Column types are
/// inferred over the whole file.
pub fn read_csv(file_data: Bytes) -> Result<DataFrame, AppError> {
    let start = std::time::Instant::now();
    let cursor = Cursor::new(file_data);

    let df = CsvReader::new(cursor)
        .has_header(true)
        .infer_schema(None)
        .with_try_parse_dates(true)
        .finish()
        .map_err(|e| AppError::FileProcessingError(format!("Failed to parse CSV file: {}", e)))?;

    tracing::info!(rows = df.height(), cols = df.width(), "CSV parsed in {:?}", start.elapsed());
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_numeric_and_text_columns() {
        let data = Bytes::from_static(b"SKU,Revenue generated,Product type\nA,10.5,skincare\nB,3,haircare\n");
        let df = read_csv(data).unwrap();
        assert_eq!(df.shape(), (2, 3));
        assert!(df.column("Revenue generated").unwrap().dtype().is_numeric());
        assert_eq!(df.column("SKU").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn empty_cells_become_nulls() {
        let data = Bytes::from_static(b"SKU,Price\nA,\nB,2.0\n");
        let df = read_csv(data).unwrap();
        assert_eq!(df.column("Price").unwrap().null_count(), 1);
    }
}
