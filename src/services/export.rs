use polars::prelude::*;

use crate::error::AppError;

/// Comma-separated text with a header row and no index column. An empty
/// frame with no columns produces an empty body.
pub fn to_csv(df: &DataFrame) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    if df.width() == 0 {
        return Ok(buf);
    }

    let mut df = df.clone();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buf)
}
