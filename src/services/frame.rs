use polars::prelude::*;
use serde_json::{json, Value};
use smallvec::SmallVec;

use crate::error::AppError;
use crate::models::{ColumnInfo, TableData, SAMPLE_SIZE};

/// Column values as floats; text that does not parse becomes null.
pub fn column_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, AppError> {
    let series = df.column(name)?.cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

pub fn column_strings(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, AppError> {
    series_strings(df.column(name)?)
}

fn series_strings(series: &Series) -> Result<Vec<Option<String>>, AppError> {
    let series = series.cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Pairs a label column with a numeric column, e.g. the output of a group-by.
/// Null labels are kept as an empty string so positions line up.
pub fn labels_and_values(
    df: &DataFrame,
    label_col: &str,
    value_col: &str,
) -> Result<(Vec<String>, Vec<f64>), AppError> {
    let labels = column_strings(df, label_col)?
        .into_iter()
        .map(Option::unwrap_or_default)
        .collect();
    let values = column_f64(df, value_col)?
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect();
    Ok((labels, values))
}

pub fn to_table(df: &DataFrame) -> TableData {
    let columns = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let rows = (0..df.height())
        .map(|row_idx| {
            df.get_columns()
                .iter()
                .map(|series| match series.get(row_idx) {
                    Ok(value) => any_value_to_json(value),
                    Err(e) => {
                        tracing::warn!("Error getting value at row {}: {}", row_idx, e);
                        Value::Null
                    }
                })
                .collect()
        })
        .collect();

    TableData { columns, rows }
}

pub fn head_table(df: &DataFrame, rows: usize) -> TableData {
    to_table(&df.head(Some(rows)))
}

fn any_value_to_json(value: AnyValue) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => json!(v),
        AnyValue::Int32(v) => json!(v),
        AnyValue::Int64(v) => json!(v),
        AnyValue::UInt32(v) => json!(v),
        AnyValue::UInt64(v) => json!(v),
        AnyValue::Float32(v) => json!(v),
        AnyValue::Float64(v) => json!(v),
        AnyValue::String(v) => json!(v),
        other => Value::String(other.to_string()),
    }
}

/// Per-column dtype, null and distinct counts plus a few sample values.
pub fn column_summary(df: &DataFrame) -> Result<Vec<ColumnInfo>, AppError> {
    df.get_columns()
        .iter()
        .map(|series| -> Result<ColumnInfo, AppError> {
            let null_count = series.null_count();
            let sample_values: SmallVec<[String; SAMPLE_SIZE]> = series_strings(series)?
                .into_iter()
                .flatten()
                .take(SAMPLE_SIZE)
                .collect();

            Ok(ColumnInfo {
                name: series.name().to_string(),
                data_type: series.dtype().to_string(),
                sample_values,
                non_null_count: series.len() - null_count,
                null_count,
                unique_count: series.drop_nulls().n_unique()?,
            })
        })
        .collect()
}

/// Two-column table of null counts per column.
pub fn missing_values(df: &DataFrame) -> TableData {
    TableData {
        columns: vec!["column".to_string(), "missing".to_string()],
        rows: df
            .get_columns()
            .iter()
            .map(|series| vec![json!(series.name()), json!(series.null_count())])
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "SKU" => &[Some("A"), Some("B"), None, Some("A")],
            "Price" => &[Some(1.5), None, Some(3.0), Some(1.5)],
            "Units" => &[1i64, 2, 3, 4]
        )
        .unwrap()
    }

    #[test]
    fn table_keeps_types_and_nulls() {
        let table = to_table(&sample());
        assert_eq!(table.columns, vec!["SKU", "Price", "Units"]);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0], vec![json!("A"), json!(1.5), json!(1)]);
        assert_eq!(table.rows[1][1], Value::Null);
        assert_eq!(table.rows[2][0], Value::Null);
    }

    #[test]
    fn head_table_limits_rows() {
        assert_eq!(head_table(&sample(), 2).rows.len(), 2);
        assert_eq!(head_table(&sample(), 20).rows.len(), 4);
    }

    #[test]
    fn summary_counts_nulls_and_distincts() {
        let summary = column_summary(&sample()).unwrap();
        let sku = &summary[0];
        assert_eq!(sku.name, "SKU");
        assert_eq!(sku.null_count, 1);
        assert_eq!(sku.non_null_count, 3);
        assert_eq!(sku.unique_count, 2);
        assert_eq!(sku.sample_values.as_slice(), &["A", "B", "A"]);
    }

    #[test]
    fn missing_values_table_lists_every_column() {
        let table = missing_values(&sample());
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1], vec![json!("Price"), json!(1)]);
    }

    #[test]
    fn labels_and_values_align() {
        let df = df!("k" => &["x", "y"], "v" => &[1i64, 2]).unwrap();
        let (labels, values) = labels_and_values(&df, "k", "v").unwrap();
        assert_eq!(labels, vec!["x", "y"]);
        assert_eq!(values, vec![1.0, 2.0]);
    }
}
