use polars::prelude::*;
use serde::Deserialize;

use crate::error::AppError;
use crate::services::session_store::SessionStore;

/// The two Data Overview toggles.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CleaningOptions {
    #[serde(default)]
    pub drop_duplicates: bool,
    #[serde(default)]
    pub drop_missing: bool,
}

/// Removes exact duplicate rows, keeping the first occurrence in row order.
pub fn drop_duplicates(df: &DataFrame) -> Result<DataFrame, AppError> {
    if df.width() == 0 {
        return Ok(df.clone());
    }
    Ok(df.unique_stable(None, UniqueKeepStrategy::First, None)?)
}

/// Removes every row holding a null in any column.
pub fn drop_missing(df: &DataFrame) -> Result<DataFrame, AppError> {
    if df.width() == 0 {
        return Ok(df.clone());
    }
    Ok(df.drop_nulls::<String>(None)?)
}

/// Applies the enabled toggles to the store, duplicates first, and returns one
/// notice per applied step.
pub fn apply(store: &mut SessionStore, options: CleaningOptions) -> Result<Vec<String>, AppError> {
    let mut notices = Vec::new();

    if options.drop_duplicates {
        let (rows, cols) = store.mutate(drop_duplicates)?.shape();
        tracing::info!(rows, "Dropped duplicate rows");
        notices.push(format!("Duplicates dropped. New shape: ({}, {})", rows, cols));
    }
    if options.drop_missing {
        let (rows, cols) = store.mutate(drop_missing)?.shape();
        tracing::info!(rows, "Dropped rows with missing values");
        notices.push(format!("Rows with missing values dropped. New shape: ({}, {})", rows, cols));
    }

    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::session_store::Dataset;

    /// 100 rows where rows 88..100 repeat rows 0..12.
    fn with_twelve_duplicates() -> DataFrame {
        let skus: Vec<String> = (0..100).map(|i| format!("SKU{}", i % 88)).collect();
        let revenue: Vec<f64> = (0..100).map(|i| (i % 88) as f64 * 1.5).collect();
        df!("SKU" => skus, "Revenue generated" => revenue).unwrap()
    }

    #[test]
    fn drop_duplicates_removes_exact_repeats_once() {
        let mut store = SessionStore::new();
        store.replace(Dataset::new(with_twelve_duplicates()));

        let opts = CleaningOptions { drop_duplicates: true, drop_missing: false };
        apply(&mut store, opts).unwrap();
        assert_eq!(store.get().height(), 88);

        apply(&mut store, opts).unwrap();
        assert_eq!(store.get().height(), 88);
    }

    #[test]
    fn drop_duplicates_keeps_first_occurrence_order() {
        let df = df!("SKU" => &["B", "A", "B", "C"], "n" => &[1, 2, 1, 3]).unwrap();
        let out = drop_duplicates(&df).unwrap();
        let skus: Vec<Option<&str>> = out.column("SKU").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(skus, vec![Some("B"), Some("A"), Some("C")]);
    }

    #[test]
    fn drop_missing_leaves_no_nulls() {
        let df = df!(
            "SKU" => &[Some("A"), None, Some("C"), Some("D")],
            "Price" => &[Some(1.0), Some(2.0), None, Some(4.0)]
        )
        .unwrap();
        let out = drop_missing(&df).unwrap();
        assert_eq!(out.height(), 2);
        assert!(out.height() <= df.height());
        for series in out.get_columns() {
            assert_eq!(series.null_count(), 0);
        }
    }

    #[test]
    fn toggles_compose_and_report_shapes() {
        let df = df!(
            "SKU" => &[Some("A"), Some("A"), None],
            "Price" => &[Some(1.0), Some(1.0), Some(3.0)]
        )
        .unwrap();
        let mut store = SessionStore::new();
        store.replace(df.into());

        let notices = apply(&mut store, CleaningOptions { drop_duplicates: true, drop_missing: true }).unwrap();
        assert_eq!(store.get().height(), 1);
        assert_eq!(
            notices,
            vec![
                "Duplicates dropped. New shape: (2, 2)".to_string(),
                "Rows with missing values dropped. New shape: (1, 2)".to_string(),
            ]
        );
    }

    #[test]
    fn cleaning_everything_away_reads_as_empty() {
        let df = df!("SKU" => &[None::<&str>, None]).unwrap();
        let mut store = SessionStore::new();
        store.replace(df.into());
        apply(&mut store, CleaningOptions { drop_duplicates: false, drop_missing: true }).unwrap();
        assert!(store.get().is_empty());
    }

    #[test]
    fn no_toggles_no_change() {
        let mut store = SessionStore::new();
        store.replace(Dataset::new(with_twelve_duplicates()));
        let notices = apply(&mut store, CleaningOptions::default()).unwrap();
        assert!(notices.is_empty());
        assert_eq!(store.get().height(), 100);
    }
}
