//! The fixed page menu and the dispatch from a page to its view.

mod analysis;
mod home;
mod overview;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;
use crate::models::{PageLink, PageView, Section};
use crate::services::schema::*;
use crate::services::session_store::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    Dashboard,
    DataOverview,
    TopSkus,
    SupplierAnalysis,
    ShippingAnalysis,
    CustomerAnalysis,
    Showcase,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Home,
        Page::Dashboard,
        Page::DataOverview,
        Page::TopSkus,
        Page::SupplierAnalysis,
        Page::ShippingAnalysis,
        Page::CustomerAnalysis,
        Page::Showcase,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Dashboard => "dashboard",
            Page::DataOverview => "data-overview",
            Page::TopSkus => "top-skus",
            Page::SupplierAnalysis => "supplier-analysis",
            Page::ShippingAnalysis => "shipping-analysis",
            Page::CustomerAnalysis => "customer-analysis",
            Page::Showcase => "showcase",
        }
    }

    /// Label shown in the navigation menu.
    pub fn label(&self) -> &'static str {
        match self {
            Page::Home => "Home",
            Page::Dashboard => "Dashboard",
            Page::DataOverview => "Data Overview",
            Page::TopSkus => "Top SKUs",
            Page::SupplierAnalysis => "Supplier Analysis",
            Page::ShippingAnalysis => "Shipping Analysis",
            Page::CustomerAnalysis => "Customer Analysis",
            Page::Showcase => "Showcase",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Home => "Supply Chain Dashboard Home",
            Page::Dashboard => "Dashboard Overview",
            Page::DataOverview => "Data Overview & Cleaning",
            Page::TopSkus => "Top 10 SKUs by Revenue and Products Sold",
            Page::SupplierAnalysis => "Supplier Performance Analysis",
            Page::ShippingAnalysis => "Shipping Performance",
            Page::CustomerAnalysis => "Customer Segment Analysis",
            Page::Showcase => "Full Analytics Showcase",
        }
    }

    fn placeholder_message(&self) -> &'static str {
        match self {
            Page::Home => "Upload a CSV or Excel file to get started.",
            Page::Dashboard => "Upload a dataset in Home to see dashboard metrics.",
            Page::DataOverview => "Upload a dataset in Home to explore and clean it.",
            Page::TopSkus => "Upload a dataset in Home to see SKU analysis.",
            Page::SupplierAnalysis => "Upload a dataset in Home to see supplier analysis.",
            Page::ShippingAnalysis => "Upload a dataset in Home to see shipping analysis.",
            Page::CustomerAnalysis => "Upload a dataset in Home to see customer analysis.",
            Page::Showcase => "Upload a dataset in Home to see showcase metrics.",
        }
    }

    /// Columns the page aggregates over.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Page::Home | Page::DataOverview => &[],
            Page::Dashboard | Page::Showcase => &[REVENUE, PRODUCTS_SOLD, SKU, PRODUCT_TYPE, SHIPPING_CARRIERS],
            Page::TopSkus => &[SKU, PRODUCTS_SOLD, REVENUE, PRICE],
            Page::SupplierAnalysis => &[SUPPLIER, LEAD_TIME, MANUFACTURING_COSTS, DEFECT_RATES],
            Page::ShippingAnalysis => &[SHIPPING_CARRIERS, SHIPPING_TIMES, SHIPPING_COSTS, TRANSPORT_MODES],
            Page::CustomerAnalysis => &[CUSTOMER_DEMOGRAPHICS, REVENUE],
        }
    }

    /// File name of the page's CSV export, for pages that offer one.
    pub fn download_file_name(&self) -> Option<&'static str> {
        match self {
            Page::Dashboard => Some("dashboard_data.csv"),
            Page::DataOverview => Some("cleaned_data.csv"),
            Page::Showcase => Some("full_data.csv"),
            _ => None,
        }
    }

    pub fn link(&self) -> PageLink {
        PageLink { id: *self, title: self.label() }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Page {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Page::ALL
            .into_iter()
            .find(|page| page.id() == s)
            .ok_or_else(|| AppError::UnknownPage(s.to_string()))
    }
}

pub fn render(page: Page, dataset: &Dataset) -> Result<PageView, AppError> {
    render_with_notices(page, dataset, Vec::new())
}

/// Renders `page` against `dataset`. `notices` carry the outcome of the
/// interaction that led here (upload, clear, cleaning) and are shown first.
pub fn render_with_notices(page: Page, dataset: &Dataset, notices: Vec<String>) -> Result<PageView, AppError> {
    if dataset.is_empty() && page != Page::Home {
        return Ok(PageView::placeholder(page, page.placeholder_message()));
    }

    let df = dataset.frame();
    require_columns(df, page.id(), page.required_columns())?;

    let mut sections: Vec<Section> = notices.into_iter().map(Section::notice).collect();
    sections.extend(match page {
        Page::Home => home::sections(dataset),
        Page::Dashboard => overview::dashboard(df)?,
        Page::DataOverview => overview::data_overview(df)?,
        Page::TopSkus => analysis::top_skus(df)?,
        Page::SupplierAnalysis => analysis::supplier(df)?,
        Page::ShippingAnalysis => analysis::shipping(df)?,
        Page::CustomerAnalysis => analysis::customer(df)?,
        Page::Showcase => overview::showcase(df)?,
    });
    Ok(PageView::loaded(page, sections))
}

/// `$1,234.50` with thousands separators, sign after the currency symbol.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("${}{}.{}", sign, grouped, frac_part)
}
