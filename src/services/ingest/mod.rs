pub mod csv;
pub mod utils;
pub mod workbook;

use bytes::Bytes;
use polars::prelude::DataFrame;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    Csv,
    Workbook,
}

impl UploadFormat {
    /// Routing is by file name suffix only; anything that is not `.csv` is
    /// handed to the workbook reader.
    pub fn from_file_name(file_name: &str) -> Self {
        if file_name.ends_with(".csv") {
            UploadFormat::Csv
        } else {
            UploadFormat::Workbook
        }
    }
}

pub fn parse_upload(file_name: &str, file_data: Bytes) -> Result<DataFrame, AppError> {
    let format = UploadFormat::from_file_name(file_name);
    tracing::info!(file_name, ?format, size_kb = file_data.len() / 1024, "Parsing upload");
    match format {
        UploadFormat::Csv => csv::read_csv(file_data),
        UploadFormat::Workbook => workbook::read_workbook(file_data),
    }
}
