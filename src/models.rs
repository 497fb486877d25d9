use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;

use crate::services::pages::Page;

pub const SAMPLE_SIZE: usize = 3;

/// A rendered page, either the placeholder shown for an empty session or the
/// list of sections computed from the current dataset.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub page: Page,
    pub title: String,
    #[serde(flatten)]
    pub body: PageBody,
}

#[derive(Debug, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageBody {
    Placeholder { message: String },
    Loaded { sections: Vec<Section> },
}

impl PageView {
    pub fn placeholder(page: Page, message: impl Into<String>) -> Self {
        Self {
            page,
            title: page.title().to_string(),
            body: PageBody::Placeholder { message: message.into() },
        }
    }

    pub fn loaded(page: Page, sections: Vec<Section>) -> Self {
        Self {
            page,
            title: page.title().to_string(),
            body: PageBody::Loaded { sections },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.body, PageBody::Placeholder { .. })
    }

    pub fn sections(&self) -> &[Section] {
        match &self.body {
            PageBody::Placeholder { .. } => &[],
            PageBody::Loaded { sections } => sections,
        }
    }

    /// Value of the first metric with the given label.
    pub fn metric(&self, label: &str) -> Option<&str> {
        self.sections().iter().find_map(|section| match section {
            Section::Metric { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Section {
    Metric { label: String, value: String },
    Notice { text: String },
    Table { title: String, table: TableData },
    Chart { title: String, chart: ChartSpec },
    ColumnSummary { columns: Vec<ColumnInfo> },
    Download { label: String, file_name: String },
}

impl Section {
    pub fn metric(label: &str, value: impl ToString) -> Self {
        Section::Metric { label: label.to_string(), value: value.to_string() }
    }

    pub fn notice(text: impl Into<String>) -> Self {
        Section::Notice { text: text.into() }
    }

    pub fn table(title: &str, table: TableData) -> Self {
        Section::Table { title: title.to_string(), table }
    }

    pub fn chart(title: &str, chart: ChartSpec) -> Self {
        Section::Chart { title: title.to_string(), chart }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

/// Chart description handed to whichever client draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar {
        x_label: String,
        y_label: String,
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Pie {
        labels: Vec<String>,
        values: Vec<f64>,
    },
    Scatter {
        x_label: String,
        y_label: String,
        hue_label: String,
        points: Vec<ScatterPoint>,
    },
    Box {
        x_label: String,
        y_label: String,
        groups: Vec<BoxGroup>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub hue: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub label: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub sample_values: SmallVec<[String; SAMPLE_SIZE]>,
    pub non_null_count: usize,
    pub null_count: usize,
    pub unique_count: usize,
}

#[derive(Debug, Serialize)]
pub struct PageLink {
    pub id: Page,
    pub title: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
}
