use super::duplicates::{self, DuplicateAction};
use super::Severity;
use crate::model::{Assignee, Issue, StatusClass};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

const INITIAL_STATUSES: &[&str] = &["to do", "todo", "open", "backlog", "new"];

#[derive(Debug, Clone, Serialize)]
pub struct TriageDocument {
    pub issue_overview: IssueOverview,
    pub duplicate_risk: DuplicateRisk,
    pub assignment_analysis: AssignmentAnalysis,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueOverview {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub priority: Option<String>,
    pub assignee: Assignee,
    pub issue_type: String,
    pub components: Vec<String>,
    pub age_days: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateRisk {
    pub level: Severity,
    pub action: DuplicateAction,
    pub potential_duplicates_found: usize,
    pub top_candidate: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentAnalysis {
    pub current_assignee: Assignee,
    pub current_assignee_expertise: Option<ExpertRecord>,
    pub recommended_expert: Option<ExpertRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExpertRecord {
    pub name: String,
    pub issues_handled: usize,
    pub completed: usize,
    pub completion_rate: f64,
}

/// Ranks historical assignees of a component by volume, then
/// completion rate, then name, so the ordering is deterministic.
pub fn rank_experts(history: &[&Issue]) -> Vec<ExpertRecord> {
    let mut per_assignee: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for issue in history {
        if let Assignee::Named(name) = &issue.assignee {
            let entry = per_assignee.entry(name).or_insert((0, 0));
            entry.0 += 1;
            if issue.status_class() == StatusClass::Done {
                entry.1 += 1;
            }
        }
    }

    let mut experts: Vec<ExpertRecord> = per_assignee
        .into_iter()
        .map(|(name, (handled, completed))| ExpertRecord {
            name: name.to_string(),
            issues_handled: handled,
            completed,
            completion_rate: ((completed as f64 / handled as f64) * 100.0).round() / 100.0,
        })
        .collect();
    experts.sort_by(|a, b| {
        b.issues_handled
            .cmp(&a.issues_handled)
            .then_with(|| b.completion_rate.total_cmp(&a.completion_rate))
            .then_with(|| a.name.cmp(&b.name))
    });
    experts
}

/// The one composing operation: duplicate detection plus component
/// expertise, combined with deterministic next steps.
pub fn analyze(
    issue: &Issue,
    candidates: &[&Issue],
    component_history: &[&Issue],
    now: DateTime<Utc>,
) -> TriageDocument {
    let duplicate_document = duplicates::analyze(issue, candidates);
    let action = duplicate_document.recommendations.action;
    let duplicate_risk = DuplicateRisk {
        level: if action == DuplicateAction::ReviewForDuplicates {
            Severity::High
        } else {
            Severity::Low
        },
        action,
        potential_duplicates_found: duplicate_document
            .duplicate_analysis
            .potential_duplicates_found,
        top_candidate: duplicate_document.recommendations.top_candidate.clone(),
    };

    let experts = if issue.components.is_empty() {
        Vec::new()
    } else {
        rank_experts(component_history)
    };
    let current_assignee_expertise = issue
        .assignee
        .name()
        .and_then(|name| experts.iter().find(|expert| expert.name == name).cloned());
    let recommended_expert = experts.first().cloned();

    let mut next_steps = Vec::new();
    if action == DuplicateAction::ReviewForDuplicates {
        let candidate = duplicate_risk
            .top_candidate
            .as_deref()
            .unwrap_or("the top match");
        next_steps.push(format!(
            "Review potential duplicate {candidate} before investing further work"
        ));
    }
    if issue.assignee == Assignee::Unassigned {
        match &recommended_expert {
            Some(expert) => next_steps.push(format!(
                "Assign an owner; {} has the most history on this component",
                expert.name
            )),
            None => next_steps.push("Assign an owner to the issue".to_string()),
        }
    }
    let status_lower = issue.status.to_lowercase();
    if INITIAL_STATUSES.contains(&status_lower.as_str()) {
        next_steps.push(format!(
            "Move the issue out of its initial status ({})",
            issue.status
        ));
    }
    next_steps.push("Keep status, components, and labels current as work proceeds".to_string());

    debug!(key = %issue.key, steps = next_steps.len(), "triage composed");

    TriageDocument {
        issue_overview: IssueOverview {
            key: issue.key.clone(),
            summary: issue.summary.clone(),
            status: issue.status.clone(),
            priority: issue.priority.clone(),
            assignee: issue.assignee.clone(),
            issue_type: issue.issue_type.clone(),
            components: issue.components.iter().cloned().collect(),
            age_days: issue.age_days(now),
        },
        duplicate_risk,
        assignment_analysis: AssignmentAnalysis {
            current_assignee: issue.assignee.clone(),
            current_assignee_expertise,
            recommended_expert,
        },
        next_steps,
    }
}
