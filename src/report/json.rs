use super::Document;

pub fn to_json(document: &Document) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(document)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::sprint::{
        IssueAnalysis, ProgressMetrics, SprintDocument, SprintInfo, VelocityIndicators,
    };
    use crate::model::SprintState;
    use std::collections::BTreeMap;

    #[test]
    fn sprint_document_serializes_with_stable_field_names() {
        let document = Document::Sprints(vec![SprintDocument {
            sprint_info: SprintInfo {
                id: 7,
                name: "Sprint 12".to_string(),
                state: SprintState::Active,
                start_date: None,
                end_date: None,
            },
            issue_analysis: IssueAnalysis {
                total_issues: 5,
                by_status: BTreeMap::from([("Done".to_string(), 2)]),
                by_assignee: BTreeMap::new(),
                unassigned_count: 5,
            },
            progress_metrics: ProgressMetrics {
                completion_percentage: 40,
                velocity_indicators: VelocityIndicators {
                    done_issues: 2,
                    in_progress_issues: 1,
                    todo_issues: 2,
                },
            },
        }]);

        let rendered = to_json(&document).expect("json should serialize");
        assert!(rendered.contains("\"completion_percentage\": 40"));
        assert!(rendered.contains("\"unassigned_count\": 5"));
        assert!(rendered.contains("\"velocity_indicators\""));
        assert!(rendered.contains("\"state\": \"active\""));
    }
}
