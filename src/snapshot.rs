use crate::error::{LensError, Result};
use crate::model::{valid_issue_key, Board, Issue, Sprint};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// One already-fetched, normalized snapshot of tracker data. The
/// loader stands in for the external data provider: it deserializes,
/// validates, and scopes — it never queries a tracker.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
    #[serde(default)]
    pub boards: Vec<Board>,
}

pub fn load(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(LensError::SnapshotNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .map_err(|e| LensError::SnapshotParse(format!("{}: {}", path.display(), e)))?;
    validate(&snapshot)?;
    debug!(
        project = snapshot.project.as_deref().unwrap_or("-"),
        issues = snapshot.issues.len(),
        sprints = snapshot.sprints.len(),
        boards = snapshot.boards.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Fail fast on model violations rather than compute over partial
/// data: bad key formats and duplicate keys are hard errors.
fn validate(snapshot: &Snapshot) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, issue) in snapshot.issues.iter().enumerate() {
        if issue.key.is_empty() {
            return Err(LensError::MalformedIssue {
                index,
                reason: "missing issue key".to_string(),
            });
        }
        if !valid_issue_key(&issue.key) {
            return Err(LensError::MalformedIssue {
                index,
                reason: format!("key {:?} is not PROJECTKEY-NUMBER", issue.key),
            });
        }
        if !seen.insert(issue.key.as_str()) {
            return Err(LensError::DuplicateKey(issue.key.clone()));
        }
    }
    Ok(())
}

impl Snapshot {
    pub fn issue(&self, key: &str) -> Result<&Issue> {
        self.issues
            .iter()
            .find(|issue| issue.key == key)
            .ok_or_else(|| LensError::UnknownIssue(key.to_string()))
    }

    pub fn open_issues(&self) -> Vec<&Issue> {
        self.issues.iter().filter(|issue| issue.is_open()).collect()
    }

    pub fn in_progress_issues(&self) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| {
                let lower = issue.status.to_lowercase();
                lower.contains("progress") || lower.contains("review")
            })
            .collect()
    }

    pub fn recent_issues(&self, now: DateTime<Utc>, window_days: i64) -> Vec<&Issue> {
        let cutoff = now - Duration::days(window_days);
        self.issues
            .iter()
            .filter(|issue| issue.created >= cutoff)
            .collect()
    }

    /// Version membership mirrors a tracker's fixVersion field:
    /// either an explicit `fix_versions` entry or a `fix-<version>`
    /// label.
    pub fn version_issues(&self, version: &str) -> Vec<&Issue> {
        let label = format!("fix-{version}");
        self.issues
            .iter()
            .filter(|issue| issue.fix_versions.contains(version) || issue.has_label(&label))
            .collect()
    }

    pub fn component_issues(&self, component: &str) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| {
                issue
                    .components
                    .iter()
                    .any(|c| c.eq_ignore_ascii_case(component))
            })
            .collect()
    }

    /// Same-project candidate pool for duplicate detection: key
    /// prefix match, target excluded.
    pub fn duplicate_candidates(&self, target: &Issue) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.key != target.key && issue.project() == target.project())
            .collect()
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignee;
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    fn issue(key: &str, status: &str, created: DateTime<Utc>) -> Issue {
        Issue {
            key: key.to_string(),
            summary: format!("issue {key}"),
            description: None,
            status: status.to_string(),
            priority: None,
            assignee: Assignee::Unassigned,
            reporter: None,
            created,
            updated: None,
            resolved: None,
            issue_type: "Task".to_string(),
            components: BTreeSet::new(),
            labels: BTreeSet::new(),
            fix_versions: BTreeSet::new(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load(&dir.path().join("missing.json")).expect_err("load should fail");
        assert!(matches!(err, LensError::SnapshotNotFound(_)));
    }

    #[test]
    fn load_rejects_malformed_issue_key() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("snap.json");
        fs::write(
            &path,
            r#"{"issues":[{"key":"bad key","summary":"s","status":"Open","created":"2026-01-01T00:00:00Z"}]}"#,
        )
        .expect("snapshot should write");
        let err = load(&path).expect_err("load should fail");
        assert!(matches!(err, LensError::MalformedIssue { index: 0, .. }));
    }

    #[test]
    fn load_rejects_duplicate_keys() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("snap.json");
        fs::write(
            &path,
            r#"{"issues":[
                {"key":"PROJ-1","summary":"a","status":"Open","created":"2026-01-01T00:00:00Z"},
                {"key":"PROJ-1","summary":"b","status":"Open","created":"2026-01-01T00:00:00Z"}
            ]}"#,
        )
        .expect("snapshot should write");
        let err = load(&path).expect_err("load should fail");
        assert!(matches!(err, LensError::DuplicateKey(key) if key == "PROJ-1"));
    }

    #[test]
    fn scope_helpers_partition_issues() {
        let created_old = now() - Duration::days(90);
        let created_new = now() - Duration::days(3);
        let mut tagged = issue("PROJ-3", "Open", created_new);
        tagged.fix_versions.insert("2.0".to_string());
        let snapshot = Snapshot {
            project: Some("PROJ".to_string()),
            issues: vec![
                issue("PROJ-1", "Done", created_old),
                issue("PROJ-2", "In Progress", created_old),
                tagged,
                issue("OTHER-1", "Open", created_new),
            ],
            sprints: vec![],
            boards: vec![],
        };

        assert_eq!(snapshot.open_issues().len(), 3);
        assert_eq!(snapshot.in_progress_issues().len(), 1);
        assert_eq!(snapshot.recent_issues(now(), 30).len(), 2);
        assert_eq!(snapshot.version_issues("2.0").len(), 1);
        let target = snapshot.issue("PROJ-1").expect("issue should exist");
        let candidates = snapshot.duplicate_candidates(target);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.project() == "PROJ"));
    }
}
