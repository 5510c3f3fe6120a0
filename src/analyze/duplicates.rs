use super::similarity::{extract_keywords, similarity};
use crate::model::Issue;
use serde::Serialize;
use tracing::debug;

/// A candidate scoring above this is a likely duplicate.
pub const HIGH_BAND: f64 = 0.7;
/// Lower bound (exclusive) of the medium-similarity band.
pub const MEDIUM_BAND: f64 = 0.4;
const SIGNATURE_LEN: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateDocument {
    pub analyzed_issue: AnalyzedIssue,
    pub duplicate_analysis: DuplicateAnalysis,
    pub recommendations: DuplicateRecommendation,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedIssue {
    pub key: String,
    pub summary: String,
    pub search_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateAnalysis {
    pub potential_duplicates_found: usize,
    pub high_similarity_matches: usize,
    pub medium_similarity_matches: usize,
    pub all_matches: Vec<DuplicateMatch>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateMatch {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub similarity_score: f64,
    pub common_components: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DuplicateAction {
    #[serde(rename = "REVIEW_FOR_DUPLICATES")]
    ReviewForDuplicates,
    #[serde(rename = "PROCEED_WITH_ISSUE")]
    ProceedWithIssue,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub enum Confidence {
    High,
    Medium,
}

#[derive(Debug, Clone, Serialize)]
pub struct DuplicateRecommendation {
    pub action: DuplicateAction,
    pub confidence: Confidence,
    pub top_candidate: Option<String>,
}

/// Ranks the candidate pool against the target by summary similarity.
/// Candidates sharing no keywords are excluded from the match list;
/// an empty pool yields `PROCEED_WITH_ISSUE`.
pub fn analyze(target: &Issue, candidates: &[&Issue]) -> DuplicateDocument {
    let search_keywords: Vec<String> = extract_keywords(&target.summary)
        .into_iter()
        .take(SIGNATURE_LEN)
        .collect();

    let mut matches: Vec<DuplicateMatch> = candidates
        .iter()
        .filter_map(|candidate| {
            let score = similarity(&target.summary, &candidate.summary);
            if score == 0.0 {
                return None;
            }
            let common_components: Vec<String> = target
                .components
                .intersection(&candidate.components)
                .cloned()
                .collect();
            Some(DuplicateMatch {
                key: candidate.key.clone(),
                summary: candidate.summary.clone(),
                status: candidate.status.clone(),
                similarity_score: score,
                common_components,
            })
        })
        .collect();

    // Stable sort: equal scores keep candidate order.
    matches.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));

    let high = matches
        .iter()
        .filter(|m| m.similarity_score > HIGH_BAND)
        .count();
    let medium = matches
        .iter()
        .filter(|m| m.similarity_score > MEDIUM_BAND && m.similarity_score <= HIGH_BAND)
        .count();

    let top = matches.first();
    let recommendations = match top {
        Some(best) if best.similarity_score > HIGH_BAND => DuplicateRecommendation {
            action: DuplicateAction::ReviewForDuplicates,
            confidence: Confidence::Medium,
            top_candidate: Some(best.key.clone()),
        },
        _ => DuplicateRecommendation {
            action: DuplicateAction::ProceedWithIssue,
            confidence: Confidence::High,
            top_candidate: top.map(|m| m.key.clone()),
        },
    };

    debug!(
        target = %target.key,
        candidates = candidates.len(),
        matches = matches.len(),
        "duplicate analysis complete"
    );

    DuplicateDocument {
        analyzed_issue: AnalyzedIssue {
            key: target.key.clone(),
            summary: target.summary.clone(),
            search_keywords,
        },
        duplicate_analysis: DuplicateAnalysis {
            potential_duplicates_found: matches.len(),
            high_similarity_matches: high,
            medium_similarity_matches: medium,
            all_matches: matches,
        },
        recommendations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Assignee;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeSet;

    fn issue(key: &str, summary: &str) -> Issue {
        Issue {
            key: key.to_string(),
            summary: summary.to_string(),
            description: None,
            status: "Open".to_string(),
            priority: None,
            assignee: Assignee::Unassigned,
            reporter: None,
            created: Utc.with_ymd_and_hms(2026, 1, 10, 0, 0, 0).unwrap(),
            updated: None,
            resolved: None,
            issue_type: "Bug".to_string(),
            components: BTreeSet::new(),
            labels: BTreeSet::new(),
            fix_versions: BTreeSet::new(),
        }
    }

    #[test]
    fn empty_pool_recommends_proceeding() {
        let target = issue("PROJ-1", "Login fails after timeout");
        let document = analyze(&target, &[]);
        assert_eq!(document.duplicate_analysis.potential_duplicates_found, 0);
        assert_eq!(
            document.recommendations.action,
            DuplicateAction::ProceedWithIssue
        );
        assert!(document.recommendations.top_candidate.is_none());
    }

    #[test]
    fn near_duplicate_triggers_review() {
        let target = issue("PROJ-1", "Login fails after timeout");
        let near = issue("PROJ-2", "Login fails after session timeout");
        let unrelated = issue("PROJ-3", "Export button missing");
        let document = analyze(&target, &[&unrelated, &near]);

        assert_eq!(
            document.recommendations.action,
            DuplicateAction::ReviewForDuplicates
        );
        assert_eq!(
            document.recommendations.top_candidate.as_deref(),
            Some("PROJ-2")
        );
        assert_eq!(document.duplicate_analysis.high_similarity_matches, 1);
        // zero-score candidate is excluded, never an error
        assert_eq!(document.duplicate_analysis.potential_duplicates_found, 1);
    }

    #[test]
    fn ranking_is_stable_across_runs() {
        let target = issue("PROJ-1", "Search index rebuild slow on large projects");
        let pool = vec![
            issue("PROJ-2", "Search index rebuild very slow"),
            issue("PROJ-3", "Index rebuild slow on large projects"),
            issue("PROJ-4", "Search slow"),
        ];
        let refs: Vec<&Issue> = pool.iter().collect();

        let first = analyze(&target, &refs);
        let second = analyze(&target, &refs);
        let order = |doc: &DuplicateDocument| {
            doc.duplicate_analysis
                .all_matches
                .iter()
                .map(|m| m.key.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(order(&first), order(&second));
    }

    #[test]
    fn common_components_are_recorded_as_evidence() {
        let mut target = issue("PROJ-1", "Attachment upload fails on retry");
        target.components.insert("uploader".to_string());
        target.components.insert("storage".to_string());
        let mut near = issue("PROJ-2", "Attachment upload fails intermittently on retry");
        near.components.insert("uploader".to_string());

        let document = analyze(&target, &[&near]);
        let top = &document.duplicate_analysis.all_matches[0];
        assert_eq!(top.common_components, vec!["uploader".to_string()]);
    }

    #[test]
    fn signature_is_first_three_keywords() {
        let target = issue("PROJ-1", "Login page fails after gateway timeout today");
        let document = analyze(&target, &[]);
        assert_eq!(
            document.analyzed_issue.search_keywords,
            vec!["login", "page", "fails"]
        );
    }
}
