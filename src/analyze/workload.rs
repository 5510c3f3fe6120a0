use crate::model::{Assignee, Issue, StatusClass};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// An open issue older than this is counted as overdue.
pub const OVERDUE_AGE_DAYS: i64 = 60;
const RECENT_SAMPLE_LEN: usize = 5;
const OVERLOAD_FACTOR: f64 = 1.5;
const UNDERUSE_FACTOR: f64 = 0.5;

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadDocument {
    pub users: Vec<UserWorkload>,
    pub summary: WorkloadSummary,
    pub capacity_insights: CapacityInsights,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWorkload {
    pub name: String,
    pub total_assigned: usize,
    pub done: usize,
    pub in_progress: usize,
    pub open: usize,
    pub high_priority: usize,
    pub critical_priority: usize,
    pub overdue: usize,
    pub average_age_days: f64,
    pub recent_activity: Vec<ActivitySample>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ActivitySample {
    pub key: String,
    pub summary: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadSummary {
    pub total_users: usize,
    pub total_issues: usize,
    pub unassigned_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CapacityInsights {
    pub average_load: f64,
    pub max_load: usize,
    pub min_load: usize,
    pub variance: usize,
    pub balance: BalanceLevel,
    pub overloaded_users: Vec<String>,
    pub underutilized_users: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BalanceLevel {
    #[serde(rename = "WELL_BALANCED")]
    WellBalanced,
    #[serde(rename = "MODERATE_IMBALANCE")]
    ModerateImbalance,
    #[serde(rename = "SIGNIFICANT_IMBALANCE")]
    SignificantImbalance,
}

/// Variance here is the spread `max − min` of per-user load, not the
/// statistical moment.
pub fn balance_level(variance: usize) -> BalanceLevel {
    if variance <= 5 {
        BalanceLevel::WellBalanced
    } else if variance <= 15 {
        BalanceLevel::ModerateImbalance
    } else {
        BalanceLevel::SignificantImbalance
    }
}

/// `in_progress` is the provider-supplied subset of issues currently
/// being worked (status containing "progress" or "review"); per-user
/// in-progress counts come from membership in it, not from
/// reclassifying statuses here.
pub fn analyze(issues: &[&Issue], in_progress: &[&Issue], now: DateTime<Utc>) -> WorkloadDocument {
    let in_progress_keys: HashSet<&str> = in_progress
        .iter()
        .map(|issue| issue.key.as_str())
        .collect();
    let mut per_user: BTreeMap<&str, Vec<&Issue>> = BTreeMap::new();
    let mut unassigned_count = 0;
    for issue in issues {
        match &issue.assignee {
            Assignee::Named(name) => per_user.entry(name).or_default().push(issue),
            Assignee::Unassigned => unassigned_count += 1,
        }
    }

    let mut users: Vec<UserWorkload> = per_user
        .iter()
        .map(|(name, assigned)| user_workload(name, assigned, &in_progress_keys, now))
        .collect();
    users.sort_by(|a, b| {
        b.total_assigned
            .cmp(&a.total_assigned)
            .then_with(|| a.name.cmp(&b.name))
    });

    let loads: Vec<usize> = users.iter().map(|user| user.total_assigned).collect();
    let max_load = loads.iter().copied().max().unwrap_or(0);
    let min_load = loads.iter().copied().min().unwrap_or(0);
    let variance = max_load - min_load;
    let average_load = if loads.is_empty() {
        0.0
    } else {
        loads.iter().sum::<usize>() as f64 / loads.len() as f64
    };

    let overloaded_users: Vec<String> = users
        .iter()
        .filter(|user| user.total_assigned as f64 > OVERLOAD_FACTOR * average_load)
        .map(|user| user.name.clone())
        .collect();
    let underutilized_users: Vec<String> = users
        .iter()
        .filter(|user| {
            user.total_assigned > 0 && (user.total_assigned as f64) < UNDERUSE_FACTOR * average_load
        })
        .map(|user| user.name.clone())
        .collect();

    let recommendations = recommendations(&users, &overloaded_users, &underutilized_users);

    debug!(users = users.len(), unassigned = unassigned_count, "workload computed");

    WorkloadDocument {
        summary: WorkloadSummary {
            total_users: users.len(),
            total_issues: issues.len(),
            unassigned_count,
        },
        capacity_insights: CapacityInsights {
            average_load,
            max_load,
            min_load,
            variance,
            balance: balance_level(variance),
            overloaded_users,
            underutilized_users,
        },
        recommendations,
        users,
    }
}

fn user_workload(
    name: &str,
    assigned: &[&Issue],
    in_progress_keys: &HashSet<&str>,
    now: DateTime<Utc>,
) -> UserWorkload {
    let mut done = 0;
    let mut in_progress = 0;
    let mut open = 0;
    let mut high_priority = 0;
    let mut critical_priority = 0;
    let mut overdue = 0;
    let mut age_sum = 0_i64;

    for issue in assigned {
        let class = issue.status_class();
        if class == StatusClass::Done {
            done += 1;
        } else if in_progress_keys.contains(issue.key.as_str()) {
            in_progress += 1;
        } else {
            open += 1;
        }
        if issue.priority_contains("high") {
            high_priority += 1;
        }
        if issue.priority_contains("critical") || issue.priority_contains("blocker") {
            critical_priority += 1;
        }
        let age = issue.age_days(now);
        if age > OVERDUE_AGE_DAYS && class != StatusClass::Done {
            overdue += 1;
        }
        age_sum += age;
    }

    let average_age_days = if assigned.is_empty() {
        0.0
    } else {
        (age_sum as f64 / assigned.len() as f64 * 10.0).round() / 10.0
    };

    let mut by_activity: Vec<&&Issue> = assigned.iter().collect();
    by_activity.sort_by_key(|issue| std::cmp::Reverse(issue.updated.unwrap_or(issue.created)));
    let recent_activity = by_activity
        .into_iter()
        .take(RECENT_SAMPLE_LEN)
        .map(|issue| ActivitySample {
            key: issue.key.clone(),
            summary: issue.summary.clone(),
            status: issue.status.clone(),
        })
        .collect();

    UserWorkload {
        name: name.to_string(),
        total_assigned: assigned.len(),
        done,
        in_progress,
        open,
        high_priority,
        critical_priority,
        overdue,
        average_age_days,
        recent_activity,
    }
}

fn recommendations(
    users: &[UserWorkload],
    overloaded: &[String],
    underutilized: &[String],
) -> Vec<String> {
    let mut out = Vec::new();
    if !overloaded.is_empty() && !underutilized.is_empty() {
        out.push(format!(
            "Redistribute work from {} to {}",
            overloaded.join(", "),
            underutilized.join(", ")
        ));
    }
    for user in users {
        if user.overdue > 0 {
            out.push(format!(
                "{} has {} overdue issue(s); review aging work",
                user.name, user.overdue
            ));
        }
    }
    for user in users {
        let urgent = user.critical_priority + user.high_priority;
        if user.total_assigned > 0 && urgent as f64 > 0.5 * user.total_assigned as f64 {
            out.push(format!(
                "{} carries a high share of critical/high priority work ({} of {})",
                user.name, urgent, user.total_assigned
            ));
        }
    }
    if out.is_empty() {
        out.push("Workload is balanced; keep monitoring".to_string());
    }
    out
}
