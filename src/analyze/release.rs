use super::{clamp_score, percentage, Severity};
use crate::model::{Assignee, Issue};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

const COMPLETION_PENALTY_WEIGHT: f64 = 0.6;
const CRITICAL_PENALTY: f64 = 10.0;
const BLOCKED_PENALTY: f64 = 8.0;
const UNASSIGNED_PENALTY_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, Serialize)]
pub struct ReleaseDocument {
    pub completion_metrics: CompletionMetrics,
    pub remaining_work: RemainingWork,
    pub risk_factors: Vec<RiskFactor>,
    pub critical_issues_details: Vec<CriticalIssue>,
    pub risk_assessment: RiskAssessment,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompletionMetrics {
    pub version: String,
    pub total_issues: usize,
    pub completed_issues: usize,
    pub open_issues: usize,
    pub completion_percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RemainingWork {
    pub open: usize,
    pub blocked: usize,
    pub critical: usize,
    pub unassigned: usize,
    pub unassigned_percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskFactor {
    pub factor: String,
    pub severity: Severity,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CriticalIssue {
    pub key: String,
    pub summary: String,
    pub priority: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskAssessment {
    pub overall_risk: Severity,
    pub readiness_score: f64,
}

/// Blocked signals are independent, not mutually exclusive: priority
/// Blocker, a "blocked" label, and a Blocked status are unioned by
/// issue key so no issue is counted twice.
pub fn blocked_issues<'a>(issues: &[&'a Issue]) -> Vec<&'a Issue> {
    let mut seen = BTreeSet::new();
    let mut blocked = Vec::new();
    for issue in issues {
        let is_blocked = issue.priority_contains("blocker")
            || issue.has_label("blocked")
            || issue.status.eq_ignore_ascii_case("blocked");
        if is_blocked && seen.insert(issue.key.as_str()) {
            blocked.push(*issue);
        }
    }
    blocked
}

pub fn analyze(version: &str, all: &[&Issue], open: &[&Issue]) -> ReleaseDocument {
    let total = all.len();
    let open_count = open.len();
    let completed = total - open_count.min(total);
    // An empty version is vacuously ready.
    let completion = percentage(completed, total, 100);

    let blocked = blocked_issues(all);
    let critical_open: Vec<&&Issue> = open
        .iter()
        .filter(|issue| {
            issue.priority_contains("critical") || issue.priority_contains("blocker")
        })
        .collect();
    let unassigned = open
        .iter()
        .filter(|issue| issue.assignee == Assignee::Unassigned)
        .count();
    let unassigned_pct = percentage(unassigned, open_count, 0);
    let testing_open = open
        .iter()
        .filter(|issue| issue.has_label("testing"))
        .count();

    let mut risk_factors = Vec::new();
    if completion < 50 {
        risk_factors.push(RiskFactor {
            factor: "completion".to_string(),
            severity: Severity::High,
            detail: format!("only {completion}% of tagged issues are complete"),
        });
    } else if completion <= 80 {
        risk_factors.push(RiskFactor {
            factor: "completion".to_string(),
            severity: Severity::Medium,
            detail: format!("{completion}% of tagged issues are complete"),
        });
    }
    if !critical_open.is_empty() {
        let severity = if critical_open.len() > 5 {
            Severity::High
        } else {
            Severity::Medium
        };
        risk_factors.push(RiskFactor {
            factor: "critical_issues".to_string(),
            severity,
            detail: format!("{} critical/blocker issue(s) still open", critical_open.len()),
        });
    }
    if !blocked.is_empty() {
        let severity = if blocked.len() > 3 {
            Severity::High
        } else {
            Severity::Medium
        };
        risk_factors.push(RiskFactor {
            factor: "blocked_issues".to_string(),
            severity,
            detail: format!("{} issue(s) are blocked", blocked.len()),
        });
    }
    if unassigned_pct > 30 {
        risk_factors.push(RiskFactor {
            factor: "unassigned_work".to_string(),
            severity: Severity::Medium,
            detail: format!("{unassigned_pct}% of remaining work is unassigned"),
        });
    }
    if testing_open > 0 {
        risk_factors.push(RiskFactor {
            factor: "quality_assurance".to_string(),
            severity: Severity::Medium,
            detail: format!("{testing_open} open issue(s) carry a testing label"),
        });
    }

    let overall_risk = risk_factors
        .iter()
        .map(|factor| factor.severity)
        .max()
        .unwrap_or(Severity::Low);

    let readiness_score = clamp_score(
        100.0
            - COMPLETION_PENALTY_WEIGHT * f64::from(100 - completion)
            - CRITICAL_PENALTY * critical_open.len() as f64
            - BLOCKED_PENALTY * blocked.len() as f64
            - UNASSIGNED_PENALTY_WEIGHT * f64::from(unassigned_pct),
    );

    let mut recommendations: Vec<String> = risk_factors
        .iter()
        .map(|factor| match factor.factor.as_str() {
            "completion" => "Burn down remaining scope before cutting the release".to_string(),
            "critical_issues" => "Resolve open critical/blocker issues first".to_string(),
            "blocked_issues" => "Unblock or descope blocked issues".to_string(),
            "unassigned_work" => "Assign owners to the remaining work".to_string(),
            _ => "Close out open testing-labeled issues".to_string(),
        })
        .collect();
    recommendations.push(match overall_risk {
        Severity::High => format!("Release {version} is at high risk; do not ship yet"),
        Severity::Medium => format!("Release {version} needs attention before shipping"),
        Severity::Low => format!("Release {version} is on track"),
    });

    debug!(version, total, open = open_count, score = readiness_score, "release readiness computed");

    ReleaseDocument {
        completion_metrics: CompletionMetrics {
            version: version.to_string(),
            total_issues: total,
            completed_issues: completed,
            open_issues: open_count,
            completion_percentage: completion,
        },
        remaining_work: RemainingWork {
            open: open_count,
            blocked: blocked.len(),
            critical: critical_open.len(),
            unassigned,
            unassigned_percentage: unassigned_pct,
        },
        critical_issues_details: critical_open
            .iter()
            .map(|issue| CriticalIssue {
                key: issue.key.clone(),
                summary: issue.summary.clone(),
                priority: issue.priority.clone(),
                status: issue.status.clone(),
            })
            .collect(),
        risk_factors,
        risk_assessment: RiskAssessment {
            overall_risk,
            readiness_score,
        },
        recommendations,
    }
}
