use super::{clamp_score, percentage, Severity};
use crate::model::Issue;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// An open issue older than this counts as stale.
pub const STALE_AGE_DAYS: i64 = 60;
/// Window for the "recent activity" signal.
pub const RECENT_WINDOW_DAYS: i64 = 30;

const DEFECT_WEIGHT: f64 = 50.0;
const STALENESS_WEIGHT: f64 = 40.0;
const OPEN_WEIGHT: f64 = 30.0;
const ACTIVITY_BONUS: f64 = 5.0;

const HEALTHY_FLOOR: f64 = 80.0;
const CONCERN_FLOOR: f64 = 60.0;

#[derive(Debug, Clone, Serialize)]
pub struct ComponentDocument {
    pub component: String,
    pub total_issues: usize,
    pub open_issues: usize,
    pub recent_issues: usize,
    pub defect_ratio: f64,
    pub average_open_age_days: f64,
    pub stale_count: usize,
    pub completion_rate: u32,
    pub activity_level: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSummaryDocument {
    pub component_summary: ComponentSummary,
    pub component_details: ComponentDetails,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentSummary {
    pub total_components: usize,
    pub healthy: usize,
    pub concern: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentDetails {
    pub healthy: Vec<ComponentHealth>,
    pub concern: Vec<ComponentHealth>,
    pub critical: Vec<ComponentHealth>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub health_score: f64,
    pub total_issues: usize,
    pub open_issues: usize,
    pub bug_count: usize,
    pub recent_count: usize,
    pub stale_count: usize,
    pub average_age_days: f64,
}

/// Single-component mode: descriptive metrics for one component's
/// issue population.
pub fn analyze_component(
    name: &str,
    all: &[&Issue],
    open: &[&Issue],
    recent: &[&Issue],
    now: DateTime<Utc>,
) -> ComponentDocument {
    let total = all.len();
    let bugs = all.iter().filter(|issue| issue.is_bug()).count();
    let defect_ratio = if total == 0 {
        0.0
    } else {
        bugs as f64 / total as f64
    };
    let average_open_age_days = if open.is_empty() {
        0.0
    } else {
        let sum: i64 = open.iter().map(|issue| issue.age_days(now)).sum();
        (sum as f64 / open.len() as f64 * 10.0).round() / 10.0
    };
    let stale_count = open
        .iter()
        .filter(|issue| issue.age_days(now) > STALE_AGE_DAYS)
        .count();
    let activity_level = if recent.len() > 5 {
        Severity::High
    } else if recent.len() > 2 {
        Severity::Medium
    } else {
        Severity::Low
    };

    ComponentDocument {
        component: name.to_string(),
        total_issues: total,
        open_issues: open.len(),
        recent_issues: recent.len(),
        defect_ratio,
        average_open_age_days,
        stale_count,
        completion_rate: percentage(total - open.len().min(total), total, 100),
        activity_level,
    }
}

/// Multi-component mode: fans each issue out to every component it
/// carries (an issue on two components counts toward both), scores
/// each component, and buckets the results.
pub fn analyze_all(issues: &[&Issue], now: DateTime<Utc>) -> HealthSummaryDocument {
    #[derive(Default)]
    struct Accum {
        total: usize,
        open: usize,
        bugs: usize,
        recent: usize,
        stale: usize,
        open_stale_basis: usize,
        age_sum: i64,
    }

    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let mut per_component: BTreeMap<&str, Accum> = BTreeMap::new();
    for issue in issues {
        for component in &issue.components {
            let accum = per_component.entry(component.as_str()).or_default();
            accum.total += 1;
            accum.age_sum += issue.age_days(now);
            if issue.is_bug() {
                accum.bugs += 1;
            }
            if issue.created >= recent_cutoff {
                accum.recent += 1;
            }
            if issue.is_open() {
                accum.open += 1;
                accum.open_stale_basis += 1;
                if issue.age_days(now) > STALE_AGE_DAYS {
                    accum.stale += 1;
                }
            }
        }
    }

    let mut scored: Vec<ComponentHealth> = per_component
        .into_iter()
        .map(|(name, accum)| {
            let defect_ratio = accum.bugs as f64 / accum.total as f64;
            let staleness_ratio = if accum.open_stale_basis == 0 {
                0.0
            } else {
                accum.stale as f64 / accum.open_stale_basis as f64
            };
            let open_ratio = accum.open as f64 / accum.total as f64;
            let activity = if accum.recent > 0 { 1.0 } else { 0.0 };
            let health_score = clamp_score(
                100.0 - DEFECT_WEIGHT * defect_ratio
                    - STALENESS_WEIGHT * staleness_ratio
                    - OPEN_WEIGHT * open_ratio
                    + ACTIVITY_BONUS * activity,
            );
            ComponentHealth {
                name: name.to_string(),
                health_score,
                total_issues: accum.total,
                open_issues: accum.open,
                bug_count: accum.bugs,
                recent_count: accum.recent,
                stale_count: accum.stale,
                average_age_days: (accum.age_sum as f64 / accum.total as f64 * 10.0).round()
                    / 10.0,
            }
        })
        .collect();

    debug!(components = scored.len(), "component health computed");

    // Best first within healthy/concern; worst first within critical.
    scored.sort_by(|a, b| b.health_score.total_cmp(&a.health_score));
    let mut healthy = Vec::new();
    let mut concern = Vec::new();
    let mut critical = Vec::new();
    for component in scored {
        if component.health_score >= HEALTHY_FLOOR {
            healthy.push(component);
        } else if component.health_score >= CONCERN_FLOOR {
            concern.push(component);
        } else {
            critical.push(component);
        }
    }
    critical.reverse();

    HealthSummaryDocument {
        component_summary: ComponentSummary {
            total_components: healthy.len() + concern.len() + critical.len(),
            healthy: healthy.len(),
            concern: concern.len(),
            critical: critical.len(),
        },
        component_details: ComponentDetails {
            healthy,
            concern,
            critical,
        },
    }
}
