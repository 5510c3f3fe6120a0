use super::percentage;
use crate::error::{LensError, Result};
use crate::model::{classify_status, Assignee, Sprint, SprintState, StatusClass};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct SprintDocument {
    pub sprint_info: SprintInfo,
    pub issue_analysis: IssueAnalysis,
    pub progress_metrics: ProgressMetrics,
}

#[derive(Debug, Clone, Serialize)]
pub struct SprintInfo {
    pub id: u64,
    pub name: String,
    pub state: SprintState,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssueAnalysis {
    pub total_issues: usize,
    pub by_status: BTreeMap<String, usize>,
    pub by_assignee: BTreeMap<String, usize>,
    pub unassigned_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressMetrics {
    pub completion_percentage: u32,
    pub velocity_indicators: VelocityIndicators,
}

#[derive(Debug, Clone, Serialize)]
pub struct VelocityIndicators {
    pub done_issues: usize,
    pub in_progress_issues: usize,
    pub todo_issues: usize,
}

/// Selection policy: an explicit name filter returns exactly that
/// sprint; otherwise the active sprints; otherwise the first sprint
/// overall. The fallback keeps boards without an active sprint from
/// silently returning nothing.
pub fn select<'a>(sprints: &'a [Sprint], name_filter: Option<&str>) -> Result<Vec<&'a Sprint>> {
    if let Some(name) = name_filter {
        let found = sprints
            .iter()
            .find(|sprint| sprint.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| LensError::UnknownSprint(name.to_string()))?;
        return Ok(vec![found]);
    }

    let active: Vec<&Sprint> = sprints
        .iter()
        .filter(|sprint| sprint.state == SprintState::Active)
        .collect();
    if !active.is_empty() {
        return Ok(active);
    }
    sprints
        .first()
        .map(|first| vec![first])
        .ok_or(LensError::NoSprints)
}

pub fn analyze(sprints: &[Sprint], name_filter: Option<&str>) -> Result<Vec<SprintDocument>> {
    let selected = select(sprints, name_filter)?;
    debug!(selected = selected.len(), "sprints selected for analysis");
    Ok(selected.into_iter().map(analyze_sprint).collect())
}

fn analyze_sprint(sprint: &Sprint) -> SprintDocument {
    let mut by_status = BTreeMap::new();
    let mut by_assignee: BTreeMap<String, usize> = BTreeMap::new();
    let mut unassigned_count = 0;
    let mut done = 0;
    let mut in_progress = 0;
    let mut todo = 0;
    let mut total = 0;

    for column in &sprint.columns {
        // boards can repeat a column name; accumulate, never overwrite
        *by_status.entry(column.name.clone()).or_insert(0) += column.issues.len();
        total += column.issues.len();
        match classify_status(&column.name) {
            StatusClass::Done => done += column.issues.len(),
            StatusClass::InProgress => in_progress += column.issues.len(),
            StatusClass::Todo => todo += column.issues.len(),
        }
        for issue in &column.issues {
            match &issue.assignee {
                Assignee::Named(name) => *by_assignee.entry(name.clone()).or_insert(0) += 1,
                Assignee::Unassigned => unassigned_count += 1,
            }
        }
    }

    SprintDocument {
        sprint_info: SprintInfo {
            id: sprint.id,
            name: sprint.name.clone(),
            state: sprint.state,
            start_date: sprint.start_date.clone(),
            end_date: sprint.end_date.clone(),
        },
        issue_analysis: IssueAnalysis {
            total_issues: total,
            by_status,
            by_assignee,
            unassigned_count,
        },
        progress_metrics: ProgressMetrics {
            completion_percentage: percentage(done, total, 0),
            velocity_indicators: VelocityIndicators {
                done_issues: done,
                in_progress_issues: in_progress,
                todo_issues: todo,
            },
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Issue, SprintColumn};
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn issue(key: &str, assignee: Assignee) -> Issue {
        Issue {
            key: key.to_string(),
            summary: format!("issue {key}"),
            description: None,
            status: "Open".to_string(),
            priority: None,
            assignee,
            reporter: None,
            created: Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
            updated: None,
            resolved: None,
            issue_type: "Task".to_string(),
            components: BTreeSet::new(),
            labels: BTreeSet::new(),
            fix_versions: BTreeSet::new(),
        }
    }

    fn sprint(name: &str, state: SprintState, columns: Vec<SprintColumn>) -> Sprint {
        Sprint {
            id: 7,
            name: name.to_string(),
            state,
            start_date: Some("2026-02-01".to_string()),
            end_date: Some("2026-02-14".to_string()),
            columns,
        }
    }

    fn column(name: &str, issues: Vec<Issue>) -> SprintColumn {
        SprintColumn {
            name: name.to_string(),
            issues,
        }
    }

    #[test]
    fn five_issue_board_scenario() {
        let s = sprint(
            "Sprint 12",
            SprintState::Active,
            vec![
                column(
                    "To Do",
                    vec![
                        issue("PROJ-1", Assignee::Unassigned),
                        issue("PROJ-2", Assignee::Unassigned),
                    ],
                ),
                column("In Progress", vec![issue("PROJ-3", Assignee::Unassigned)]),
                column(
                    "Done",
                    vec![
                        issue("PROJ-4", Assignee::Unassigned),
                        issue("PROJ-5", Assignee::Unassigned),
                    ],
                ),
            ],
        );

        let documents = analyze(&[s], None).expect("analysis should succeed");
        let doc = &documents[0];
        assert_eq!(doc.issue_analysis.total_issues, 5);
        assert_eq!(doc.issue_analysis.unassigned_count, 5);
        assert!(doc.issue_analysis.by_assignee.is_empty());
        assert_eq!(doc.progress_metrics.velocity_indicators.done_issues, 2);
        assert_eq!(doc.progress_metrics.velocity_indicators.in_progress_issues, 1);
        assert_eq!(doc.progress_metrics.velocity_indicators.todo_issues, 2);
        assert_eq!(doc.progress_metrics.completion_percentage, 40);
    }

    #[test]
    fn empty_sprint_completes_at_zero_percent() {
        let s = sprint("Sprint 1", SprintState::Active, vec![]);
        let documents = analyze(&[s], None).expect("analysis should succeed");
        assert_eq!(documents[0].progress_metrics.completion_percentage, 0);
        assert_eq!(documents[0].issue_analysis.total_issues, 0);
    }

    #[test]
    fn selection_prefers_active_then_falls_back_to_first() {
        let closed = sprint("Old", SprintState::Closed, vec![]);
        let active = sprint("Current", SprintState::Active, vec![]);
        let future = sprint("Next", SprintState::Future, vec![]);

        let with_active = [closed.clone(), active, future.clone()];
        let selected = select(&with_active, None).expect("selection should succeed");
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "Current");

        let without_active = [closed, future];
        let selected = select(&without_active, None).expect("fallback should succeed");
        assert_eq!(selected[0].name, "Old");
    }

    #[test]
    fn named_filter_must_match() {
        let s = sprint("Sprint 12", SprintState::Closed, vec![]);
        let selected = select(std::slice::from_ref(&s), Some("sprint 12"))
            .expect("case-insensitive match should succeed");
        assert_eq!(selected[0].name, "Sprint 12");

        let err = select(std::slice::from_ref(&s), Some("Sprint 13"))
            .expect_err("unknown sprint should fail");
        assert!(matches!(err, LensError::UnknownSprint(_)));
    }

    #[test]
    fn no_sprints_is_an_explicit_error() {
        let err = analyze(&[], None).expect_err("empty board should fail");
        assert!(matches!(err, LensError::NoSprints));
    }

    #[test]
    fn repeated_column_names_accumulate_counts() {
        let s = sprint(
            "Sprint 3",
            SprintState::Active,
            vec![
                column("In Progress", vec![issue("PROJ-1", Assignee::Unassigned)]),
                column(
                    "In Progress",
                    vec![
                        issue("PROJ-2", Assignee::Unassigned),
                        issue("PROJ-3", Assignee::Unassigned),
                    ],
                ),
            ],
        );
        let documents = analyze(&[s], None).expect("analysis should succeed");
        let doc = &documents[0];
        assert_eq!(doc.issue_analysis.by_status.get("In Progress"), Some(&3));
        assert_eq!(doc.issue_analysis.total_issues, 3);
        assert_eq!(doc.progress_metrics.velocity_indicators.in_progress_issues, 3);
    }

    #[test]
    fn mixed_column_names_classify_by_keyword() {
        let s = sprint(
            "Sprint 2",
            SprintState::Active,
            vec![
                column("Backlog", vec![issue("PROJ-1", Assignee::Unassigned)]),
                column("Code Review", vec![issue("PROJ-2", Assignee::Unassigned)]),
                column("Testing", vec![issue("PROJ-3", Assignee::Unassigned)]),
                column(
                    "Closed",
                    vec![issue("PROJ-4", Assignee::Named("Ana".to_string()))],
                ),
            ],
        );
        let documents = analyze(&[s], None).expect("analysis should succeed");
        let doc = &documents[0];
        assert_eq!(doc.progress_metrics.velocity_indicators.todo_issues, 1);
        assert_eq!(doc.progress_metrics.velocity_indicators.in_progress_issues, 2);
        assert_eq!(doc.progress_metrics.velocity_indicators.done_issues, 1);
        assert_eq!(doc.issue_analysis.by_assignee.get("Ana"), Some(&1));
        assert_eq!(doc.issue_analysis.unassigned_count, 3);
        assert_eq!(doc.progress_metrics.completion_percentage, 25);
    }
}
