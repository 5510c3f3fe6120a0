pub mod json;
pub mod md;

use crate::analyze::duplicates::DuplicateDocument;
use crate::analyze::health::{ComponentDocument, HealthSummaryDocument};
use crate::analyze::release::ReleaseDocument;
use crate::analyze::sprint::SprintDocument;
use crate::analyze::triage::TriageDocument;
use crate::analyze::workload::WorkloadDocument;
use crate::error::LensError;
use serde::Serialize;

/// One insight document per operation, rendered as-is in JSON or as a
/// Markdown digest.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Document {
    Sprints(Vec<SprintDocument>),
    Duplicates(DuplicateDocument),
    Workload(WorkloadDocument),
    Release(ReleaseDocument),
    Component(ComponentDocument),
    HealthSummary(HealthSummaryDocument),
    Triage(TriageDocument),
}

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(document: &Document, format: OutputFormat) -> Result<String, LensError> {
    match format {
        OutputFormat::Json => json::to_json(document).map_err(LensError::Json),
        OutputFormat::Md => Ok(md::to_markdown(document)),
    }
}
