use polars::prelude::DataFrame;

use crate::error::AppError;

pub const SKU: &str = "SKU";
pub const PRODUCT_TYPE: &str = "Product type";
pub const REVENUE: &str = "Revenue generated";
pub const PRODUCTS_SOLD: &str = "Number of products sold";
pub const PRICE: &str = "Price";
pub const SUPPLIER: &str = "Supplier name";
pub const LEAD_TIME: &str = "Lead time";
pub const MANUFACTURING_COSTS: &str = "Manufacturing costs";
pub const DEFECT_RATES: &str = "Defect rates";
pub const SHIPPING_CARRIERS: &str = "Shipping carriers";
pub const SHIPPING_TIMES: &str = "Shipping times";
pub const SHIPPING_COSTS: &str = "Shipping costs";
pub const TRANSPORT_MODES: &str = "Transportation modes";
pub const CUSTOMER_DEMOGRAPHICS: &str = "Customer demographics";

/// Column the customer page adds to the per-segment revenue table.
pub const VALUE_SEGMENT: &str = "Value Segment";

/// Fails with [`AppError::MissingColumns`] naming every absent column.
pub fn require_columns(df: &DataFrame, page: &str, required: &[&str]) -> Result<(), AppError> {
    let present = df.get_column_names();
    let missing: Vec<String> = required
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::MissingColumns {
            page: page.to_string(),
            columns: missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn reports_all_missing_columns_in_order() {
        let df = df!(SKU => &["A"]).unwrap();
        let err = require_columns(&df, "top-skus", &[SKU, REVENUE, PRICE]).unwrap_err();
        match err {
            AppError::MissingColumns { page, columns } => {
                assert_eq!(page, "top-skus");
                assert_eq!(columns, vec![REVENUE.to_string(), PRICE.to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn passes_when_all_present() {
        let df = df!(SKU => &["A"], REVENUE => &[1.0]).unwrap();
        assert!(require_columns(&df, "dashboard", &[SKU, REVENUE]).is_ok());
    }
}
