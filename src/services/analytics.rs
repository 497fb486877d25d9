use std::collections::HashMap;

use polars::prelude::*;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{BoxGroup, ScatterPoint};
use crate::services::frame::{column_f64, column_strings};
use crate::services::schema::*;

pub const COUNT: &str = "count";
pub const TOP_SKU_LIMIT: u32 = 10;

/// Relative slack on the top bin edge. Group sums and the grand total add the
/// same values in different orders and may differ in the last few bits.
const TOP_EDGE_TOLERANCE: f64 = 1e-9;

/// Headline numbers shared by the Dashboard and Showcase pages.
#[derive(Debug, Clone, PartialEq)]
pub struct Totals {
    pub records: usize,
    pub revenue: f64,
    pub products_sold: i64,
    pub unique_skus: usize,
}

pub fn totals(df: &DataFrame) -> Result<Totals, AppError> {
    Ok(Totals {
        records: df.height(),
        revenue: column_sum(df, REVENUE)?,
        products_sold: column_sum(df, PRODUCTS_SOLD)?.trunc() as i64,
        unique_skus: df.column(SKU)?.drop_nulls().n_unique()?,
    })
}

pub fn column_sum(df: &DataFrame, name: &str) -> Result<f64, AppError> {
    Ok(df
        .column(name)?
        .cast(&DataType::Float64)?
        .f64()?
        .sum()
        .unwrap_or(0.0))
}

fn stable_sort(descending: bool) -> SortOptions {
    SortOptions {
        descending,
        nulls_last: true,
        maintain_order: true,
        ..Default::default()
    }
}

/// Groups by `by` (null keys dropped), aggregates, and orders groups by key.
fn grouped(df: &DataFrame, by: &str, aggs: Vec<Expr>) -> LazyFrame {
    df.clone()
        .lazy()
        .filter(col(by).is_not_null())
        .group_by([col(by)])
        .agg(aggs)
        .sort(by, SortOptions::default())
}

pub fn grouped_sum(df: &DataFrame, by: &str, value: &str) -> Result<DataFrame, AppError> {
    Ok(grouped(df, by, vec![col(value).sum()]).collect()?)
}

/// Mean of `value` per `by` group, ordered by the mean.
pub fn grouped_mean_sorted(
    df: &DataFrame,
    by: &str,
    value: &str,
    descending: bool,
) -> Result<DataFrame, AppError> {
    Ok(grouped(df, by, vec![col(value).mean()])
        .sort(value, stable_sort(descending))
        .collect()?)
}

/// Occurrences of each non-null value, most frequent first; ties keep the
/// order in which values first appear.
pub fn value_counts(df: &DataFrame, column: &str) -> Result<DataFrame, AppError> {
    Ok(df
        .clone()
        .lazy()
        .filter(col(column).is_not_null())
        .group_by_stable([col(column)])
        .agg([col(column).count().alias(COUNT)])
        .sort(COUNT, stable_sort(true))
        .collect()?)
}

/// SKUs with the highest summed revenue, with their summed units sold.
pub fn top_skus(df: &DataFrame, limit: u32) -> Result<DataFrame, AppError> {
    Ok(grouped(df, SKU, vec![col(PRODUCTS_SOLD).sum(), col(REVENUE).sum()])
        .sort(REVENUE, stable_sort(true))
        .limit(limit)
        .collect()?)
}

/// Mean shipping time and cost per carrier.
pub fn shipping_stats(df: &DataFrame) -> Result<DataFrame, AppError> {
    Ok(grouped(
        df,
        SHIPPING_CARRIERS,
        vec![col(SHIPPING_TIMES).mean(), col(SHIPPING_COSTS).mean()],
    )
    .collect()?)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ValueSegment {
    Low,
    Medium,
    High,
}

impl ValueSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueSegment::Low => "Low",
            ValueSegment::Medium => "Medium",
            ValueSegment::High => "High",
        }
    }
}

/// Bin edges at 0, 33%, 66% and 100% of the grand total.
pub fn segment_bins(total: f64) -> [f64; 4] {
    [0.0, 0.33 * total, 0.66 * total, total]
}

/// Right-closed binning: (0, 33%] is Low, (33%, 66%] Medium, (66%, 100%]
/// High. Values outside (0, total] and non-positive totals get no segment.
pub fn classify(value: f64, bins: &[f64; 4]) -> Option<ValueSegment> {
    let top = bins[3] * (1.0 + TOP_EDGE_TOLERANCE);
    if !(bins[3] > 0.0) || !(value > bins[0]) || value > top {
        return None;
    }
    if value <= bins[1] {
        Some(ValueSegment::Low)
    } else if value <= bins[2] {
        Some(ValueSegment::Medium)
    } else {
        Some(ValueSegment::High)
    }
}

/// Revenue per customer segment with its value bucket.
pub fn customer_value(df: &DataFrame) -> Result<DataFrame, AppError> {
    let total = column_sum(df, REVENUE)?;
    let bins = segment_bins(total);

    let mut per_segment = grouped_sum(df, CUSTOMER_DEMOGRAPHICS, REVENUE)?;
    let labels: Vec<Option<&str>> = column_f64(&per_segment, REVENUE)?
        .into_iter()
        .map(|revenue| revenue.and_then(|r| classify(r, &bins)).map(|s| s.as_str()))
        .collect();
    per_segment.with_column(Series::new(VALUE_SEGMENT, labels))?;
    Ok(per_segment)
}

/// Rows with both coordinates present, tagged with the `hue` column.
pub fn scatter_points(df: &DataFrame, x: &str, y: &str, hue: &str) -> Result<Vec<ScatterPoint>, AppError> {
    let xs = column_f64(df, x)?;
    let ys = column_f64(df, y)?;
    let hues = column_strings(df, hue)?;

    Ok(xs
        .into_iter()
        .zip(ys)
        .zip(hues)
        .filter_map(|((x, y), hue)| Some(ScatterPoint { x: x?, y: y?, hue }))
        .collect())
}

/// Raw `value` observations for each of `keys`, in the order of `keys`.
pub fn box_groups(df: &DataFrame, key: &str, value: &str, keys: &[String]) -> Result<Vec<BoxGroup>, AppError> {
    let mut by_key: HashMap<&str, Vec<f64>> = keys.iter().map(|k| (k.as_str(), Vec::new())).collect();

    let key_values = column_strings(df, key)?;
    let values = column_f64(df, value)?;
    for (k, v) in key_values.iter().zip(values) {
        if let (Some(k), Some(v)) = (k, v) {
            if let Some(bucket) = by_key.get_mut(k.as_str()) {
                bucket.push(v);
            }
        }
    }

    Ok(keys
        .iter()
        .map(|k| BoxGroup {
            label: k.clone(),
            values: by_key.remove(k.as_str()).unwrap_or_default(),
        })
        .collect())
}
