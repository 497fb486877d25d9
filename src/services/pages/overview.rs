use polars::prelude::DataFrame;

use super::{format_currency, Page};
use crate::error::AppError;
use crate::models::{ChartSpec, Section};
use crate::services::analytics::{self, COUNT};
use crate::services::frame::{column_summary, head_table, labels_and_values, missing_values};
use crate::services::schema::*;

const TABLE_ROWS: usize = 20;

pub(super) fn dashboard(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let totals = analytics::totals(df)?;
    let mut sections = vec![Section::metric("Total Records", totals.records)];
    sections.extend(headline(df, &totals)?);
    sections.push(download(Page::Dashboard));
    Ok(sections)
}

pub(super) fn showcase(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let totals = analytics::totals(df)?;
    let mut sections = headline(df, &totals)?;
    sections.push(download(Page::Showcase));
    Ok(sections)
}

/// Metrics, revenue pie, carrier counts and a preview: everything the
/// Dashboard and Showcase pages have in common.
fn headline(df: &DataFrame, totals: &analytics::Totals) -> Result<Vec<Section>, AppError> {
    let by_type = analytics::grouped_sum(df, PRODUCT_TYPE, REVENUE)?;
    let (type_labels, type_revenue) = labels_and_values(&by_type, PRODUCT_TYPE, REVENUE)?;

    let carriers = analytics::value_counts(df, SHIPPING_CARRIERS)?;
    let (carrier_labels, carrier_counts) = labels_and_values(&carriers, SHIPPING_CARRIERS, COUNT)?;

    Ok(vec![
        Section::metric("Total Revenue", format_currency(totals.revenue)),
        Section::metric("Total Products Sold", totals.products_sold),
        Section::metric("Unique SKUs", totals.unique_skus),
        Section::chart(
            "Revenue by Product Type",
            ChartSpec::Pie { labels: type_labels, values: type_revenue },
        ),
        Section::chart(
            "Shipping Carriers",
            ChartSpec::Bar {
                x_label: SHIPPING_CARRIERS.to_string(),
                y_label: COUNT.to_string(),
                labels: carrier_labels,
                values: carrier_counts,
            },
        ),
        Section::table("Data Preview", head_table(df, TABLE_ROWS)),
    ])
}

pub(super) fn data_overview(df: &DataFrame) -> Result<Vec<Section>, AppError> {
    let (rows, cols) = df.shape();
    let columns = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(vec![
        Section::table("Data Preview", head_table(df, TABLE_ROWS)),
        Section::ColumnSummary { columns: column_summary(df)? },
        Section::metric("Shape", format!("({}, {})", rows, cols)),
        Section::notice(format!("Columns: {}", columns)),
        Section::table("Missing values per column", missing_values(df)),
        download(Page::DataOverview),
    ])
}

fn download(page: Page) -> Section {
    let label = match page {
        Page::DataOverview => "Download Cleaned File",
        _ => "Download CSV",
    };
    Section::Download {
        label: label.to_string(),
        file_name: page.download_file_name().unwrap_or_default().to_string(),
    }
}
