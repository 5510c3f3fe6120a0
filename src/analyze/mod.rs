pub mod duplicates;
pub mod health;
pub mod release;
pub mod similarity;
pub mod sprint;
pub mod triage;
pub mod workload;

use serde::Serialize;

/// Risk/activity severity, ordered so combining independent factors
/// by `max` yields the overall level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Integer percentage `round(100 * part / total)`, with an explicit
/// value for the empty case so degenerate input never divides by
/// zero.
pub fn percentage(part: usize, total: usize, when_empty: u32) -> u32 {
    if total == 0 {
        return when_empty;
    }
    (100.0 * part as f64 / total as f64).round() as u32
}

/// Health and readiness scores live in [0, 100] regardless of how
/// large the penalties grow.
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}
