use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Assignment is a modeled case, not a string discovered ad hoc: an
/// absent, empty, or literal "Unassigned" assignee all land here as
/// `Unassigned` and are counted in their own bucket downstream.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Assignee {
    Named(String),
    #[default]
    Unassigned,
}

impl Assignee {
    pub fn from_raw(raw: Option<String>) -> Self {
        match raw {
            Some(name) if !name.trim().is_empty() && name != "Unassigned" => Assignee::Named(name),
            _ => Assignee::Unassigned,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Assignee::Named(name) => Some(name),
            Assignee::Unassigned => None,
        }
    }
}

impl fmt::Display for Assignee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assignee::Named(name) => f.write_str(name),
            Assignee::Unassigned => f.write_str("Unassigned"),
        }
    }
}

impl<'de> Deserialize<'de> for Assignee {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Assignee::from_raw(raw))
    }
}

impl Serialize for Assignee {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignee: Assignee,
    #[serde(default)]
    pub reporter: Option<String>,
    pub created: DateTime<Utc>,
    #[serde(default)]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved: Option<DateTime<Utc>>,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
    #[serde(default)]
    pub components: BTreeSet<String>,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    #[serde(default)]
    pub fix_versions: BTreeSet<String>,
}

fn default_issue_type() -> String {
    "Task".to_string()
}

impl Issue {
    /// Project token of the key, e.g. "PROJ" for "PROJ-42".
    pub fn project(&self) -> &str {
        self.key.split('-').next().unwrap_or(&self.key)
    }

    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created).num_days()
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.eq_ignore_ascii_case(label))
    }

    pub fn priority_contains(&self, needle: &str) -> bool {
        self.priority
            .as_deref()
            .map(|p| p.to_lowercase().contains(needle))
            .unwrap_or(false)
    }

    pub fn is_bug(&self) -> bool {
        self.issue_type.eq_ignore_ascii_case("bug")
    }

    pub fn status_class(&self) -> StatusClass {
        classify_status(&self.status)
    }

    pub fn is_open(&self) -> bool {
        self.status_class() != StatusClass::Done
            && !self.status.to_lowercase().contains("resolve")
    }
}

/// Velocity bucket for a status or column name, derived by
/// case-insensitive substring match rather than a fixed enum of
/// workflow names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusClass {
    Done,
    InProgress,
    Todo,
}

pub fn classify_status(name: &str) -> StatusClass {
    let lower = name.to_lowercase();
    if ["done", "closed", "complete"].iter().any(|k| lower.contains(k)) {
        StatusClass::Done
    } else if ["progress", "review", "testing"].iter().any(|k| lower.contains(k)) {
        StatusClass::InProgress
    } else {
        StatusClass::Todo
    }
}

/// Validates the `PROJECTKEY-NUMBER` key format: an uppercase
/// alphanumeric project token starting with a letter, a dash, then the
/// issue number.
pub fn valid_issue_key(key: &str) -> bool {
    let Some((project, number)) = key.split_once('-') else {
        return false;
    };
    let project_ok = project
        .chars()
        .next()
        .map(|c| c.is_ascii_uppercase())
        .unwrap_or(false)
        && project.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
    let number_ok = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    project_ok && number_ok
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SprintState {
    Active,
    Closed,
    Future,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintColumn {
    pub name: String,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sprint {
    pub id: u64,
    pub name: String,
    pub state: SprintState,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub columns: Vec<SprintColumn>,
}

/// Boards are a scoping label only; no analysis reads past the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub name: String,
    #[serde(default)]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignee_normalizes_absent_and_literal_unassigned() {
        assert_eq!(Assignee::from_raw(None), Assignee::Unassigned);
        assert_eq!(Assignee::from_raw(Some("".to_string())), Assignee::Unassigned);
        assert_eq!(
            Assignee::from_raw(Some("Unassigned".to_string())),
            Assignee::Unassigned
        );
        assert_eq!(
            Assignee::from_raw(Some("Maya Patel".to_string())),
            Assignee::Named("Maya Patel".to_string())
        );
    }

    #[test]
    fn issue_key_format_is_enforced() {
        assert!(valid_issue_key("PROJ-1"));
        assert!(valid_issue_key("AB2C-1043"));
        assert!(!valid_issue_key("PROJ"));
        assert!(!valid_issue_key("proj-1"));
        assert!(!valid_issue_key("PROJ-"));
        assert!(!valid_issue_key("PROJ-12a"));
        assert!(!valid_issue_key("2PROJ-12"));
    }

    #[test]
    fn status_classification_matches_on_substrings() {
        assert_eq!(classify_status("Done"), StatusClass::Done);
        assert_eq!(classify_status("Closed as Complete"), StatusClass::Done);
        assert_eq!(classify_status("In Progress"), StatusClass::InProgress);
        assert_eq!(classify_status("Code Review"), StatusClass::InProgress);
        assert_eq!(classify_status("User Testing"), StatusClass::InProgress);
        assert_eq!(classify_status("To Do"), StatusClass::Todo);
        assert_eq!(classify_status("Backlog"), StatusClass::Todo);
    }

    #[test]
    fn sprint_state_accepts_unknown_values() {
        let state: SprintState = serde_json::from_str("\"active\"").expect("state should parse");
        assert_eq!(state, SprintState::Active);
        let state: SprintState = serde_json::from_str("\"weird\"").expect("state should parse");
        assert_eq!(state, SprintState::Unknown);
    }
}
