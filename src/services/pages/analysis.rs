use polars::prelude::DataFrame;

use crate::error::AppError;
use crate::models::{ChartSpec, Section};
use crate::services::analytics::{self, COUNT, TOP_SKU_LIMIT};
use crate::services::frame::{labels_and_values, to_table};
use crate::services::schema::*;

pub(super) fn top_skus(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let top = analytics::top_skus(df, TOP_SKU_LIMIT)?;
    let (skus, revenue) = labels_and_values(&top, SKU, REVENUE)?;
    let prices = analytics::box_groups(df, SKU, PRICE, &skus)?;

    Ok(vec![
        Section::table("Top SKUs", to_table(&top)),
        Section::chart(
            "Top 10 SKUs by Revenue",
            ChartSpec::Bar {
                x_label: SKU.to_string(),
                y_label: "Revenue Generated".to_string(),
                labels: skus,
                values: revenue,
            },
        ),
        Section::chart(
            "Price Distribution for Top SKUs",
            ChartSpec::Box {
                x_label: SKU.to_string(),
                y_label: PRICE.to_string(),
                groups: prices,
            },
        ),
    ])
}

pub(super) fn supplier(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let lead_times = analytics::grouped_mean_sorted(df, SUPPLIER, LEAD_TIME, false)?;
    let (suppliers, mean_lead) = labels_and_values(&lead_times, SUPPLIER, LEAD_TIME)?;
    let points = analytics::scatter_points(df, MANUFACTURING_COSTS, DEFECT_RATES, SUPPLIER)?;
    let defects = analytics::grouped_mean_sorted(df, SUPPLIER, DEFECT_RATES, true)?;

    Ok(vec![
        Section::chart(
            "Average Lead Time by Supplier",
            ChartSpec::Bar {
                x_label: SUPPLIER.to_string(),
                y_label: LEAD_TIME.to_string(),
                labels: suppliers,
                values: mean_lead,
            },
        ),
        Section::chart(
            "Manufacturing Costs vs Defect Rates",
            ChartSpec::Scatter {
                x_label: MANUFACTURING_COSTS.to_string(),
                y_label: DEFECT_RATES.to_string(),
                hue_label: SUPPLIER.to_string(),
                points,
            },
        ),
        Section::table("Defect Rates by Supplier", to_table(&defects)),
    ])
}

pub(super) fn shipping(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let stats = analytics::shipping_stats(df)?;
    let (carriers, times) = labels_and_values(&stats, SHIPPING_CARRIERS, SHIPPING_TIMES)?;
    let modes = analytics::value_counts(df, TRANSPORT_MODES)?;
    let (mode_labels, mode_counts) = labels_and_values(&modes, TRANSPORT_MODES, COUNT)?;

    Ok(vec![
        Section::table("Shipping Performance by Carrier", to_table(&stats)),
        Section::chart(
            "Average Shipping Time by Carrier",
            ChartSpec::Bar {
                x_label: "Carrier".to_string(),
                y_label: "Avg Shipping Time".to_string(),
                labels: carriers,
                values: times,
            },
        ),
        Section::chart(
            "Transportation Modes",
            ChartSpec::Bar {
                x_label: TRANSPORT_MODES.to_string(),
                y_label: COUNT.to_string(),
                labels: mode_labels,
                values: mode_counts,
            },
        ),
    ])
}

pub(super) fn customer(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let value = analytics::customer_value(df)?;
    let (segments, revenue) = labels_and_values(&value, CUSTOMER_DEMOGRAPHICS, REVENUE)?;

    Ok(vec![
        Section::chart(
            "Revenue by Customer Segment",
            ChartSpec::Bar {
                x_label: CUSTOMER_DEMOGRAPHICS.to_string(),
                y_label: REVENUE.to_string(),
                labels: segments,
                values: revenue,
            },
        ),
        Section::table("Customer Segment Value", to_table(&value)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TableData;
    use polars::prelude::*;
    use serde_json::json;

    fn find_table<'a>(sections: &'a [Section], title: &str) -> &'a TableData {
        sections
            .iter()
            .find_map(|s| match s {
                Section::Table { title: t, table } if t == title => Some(table),
                _ => None,
            })
            .expect("table present")
    }

    #[test]
    fn top_skus_page_limits_to_ten_and_boxes_their_prices() {
        let skus: Vec<String> = (0..15).map(|i| format!("SKU{:02}", i)).collect();
        let revenue: Vec<f64> = (0..15).map(|i| i as f64 * 10.0).collect();
        let sold: Vec<i64> = (0..15).collect();
        let price: Vec<f64> = (0..15).map(|i| i as f64 + 0.5).collect();
        let df = df!(SKU => skus, REVENUE => revenue, PRODUCTS_SOLD => sold, PRICE => price).unwrap();

        let sections = top_skus(&df).unwrap();
        let table = find_table(&sections, "Top SKUs");
        assert_eq!(table.rows.len(), 10);
        assert_eq!(table.columns, vec![SKU, PRODUCTS_SOLD, REVENUE]);
        assert_eq!(table.rows[0][0], json!("SKU14"));

        let groups = sections.iter().find_map(|s| match s {
            Section::Chart { chart: ChartSpec::Box { groups, .. }, .. } => Some(groups),
            _ => None,
        });
        let groups = groups.expect("box chart");
        assert_eq!(groups.len(), 10);
        assert_eq!(groups[0].label, "SKU14");
        assert_eq!(groups[0].values, vec![14.5]);
    }

    #[test]
    fn customer_page_tags_value_segments() {
        let df = df!(
            CUSTOMER_DEMOGRAPHICS => &["Female", "Male", "Female"],
            REVENUE => &[50.0, 20.0, 30.0]
        )
        .unwrap();
        let sections = customer(&df).unwrap();
        let table = find_table(&sections, "Customer Segment Value");
        assert_eq!(table.columns, vec![CUSTOMER_DEMOGRAPHICS, REVENUE, VALUE_SEGMENT]);
        assert_eq!(table.rows[0], vec![json!("Female"), json!(80.0), json!("High")]);
        assert_eq!(table.rows[1], vec![json!("Male"), json!(20.0), json!("Low")]);
    }

    #[test]
    fn shipping_page_counts_modes() {
        let df = df!(
            SHIPPING_CARRIERS => &["A", "B", "A"],
            SHIPPING_TIMES => &[1.0, 2.0, 3.0],
            SHIPPING_COSTS => &[10.0, 20.0, 30.0],
            TRANSPORT_MODES => &["Road", "Air", "Road"]
        )
        .unwrap();
        let sections = shipping(&df).unwrap();
        let modes = sections.iter().find_map(|s| match s {
            Section::Chart { title, chart: ChartSpec::Bar { labels, values, .. } } if title == "Transportation Modes" => {
                Some((labels.clone(), values.clone()))
            }
            _ => None,
        });
        assert_eq!(modes, Some((vec!["Road".to_string(), "Air".to_string()], vec![2.0, 1.0])));
    }
}
