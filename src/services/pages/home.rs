use super::Page;
use crate::models::Section;
use crate::services::frame::head_table;
use crate::services::session_store::Dataset;

const PREVIEW_ROWS: usize = 10;

/// Home is never a placeholder: it always reports the record count.
pub(super) fn sections(dataset: &Dataset) -> Vec<Section> {
    let mut sections = Vec::with_capacity(2);
    if dataset.is_empty() {
        sections.push(Section::notice(Page::Home.placeholder_message()));
    } else {
        sections.push(Section::table("Preview", head_table(dataset.frame(), PREVIEW_ROWS)));
    }
    sections.push(Section::metric("Number of records in dataset", dataset.height()));
    sections
}
