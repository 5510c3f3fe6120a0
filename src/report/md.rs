use super::Document;

pub fn to_markdown(document: &Document) -> String {
    match document {
        Document::Sprints(sprints) => {
            let mut output = String::new();
            for doc in sprints {
                output.push_str(&format!(
                    "# Sprint: {} ({:?})\n\n",
                    doc.sprint_info.name, doc.sprint_info.state
                ));
                output.push_str(&format!(
                    "Issues: {} total, {} unassigned\n",
                    doc.issue_analysis.total_issues, doc.issue_analysis.unassigned_count
                ));
                output.push_str(&format!(
                    "Progress: {}% complete (done {}, in progress {}, to do {})\n\n",
                    doc.progress_metrics.completion_percentage,
                    doc.progress_metrics.velocity_indicators.done_issues,
                    doc.progress_metrics.velocity_indicators.in_progress_issues,
                    doc.progress_metrics.velocity_indicators.todo_issues
                ));
                output.push_str("## By status\n\n");
                for (status, count) in &doc.issue_analysis.by_status {
                    output.push_str(&format!("- {status}: {count}\n"));
                }
                output.push('\n');
            }
            output
        }
        Document::Duplicates(doc) => {
            let mut output = format!(
                "# Duplicate analysis: {}\n\n{}\n\n",
                doc.analyzed_issue.key, doc.analyzed_issue.summary
            );
            output.push_str(&format!(
                "Matches: {} ({} high, {} medium)\n\n",
                doc.duplicate_analysis.potential_duplicates_found,
                doc.duplicate_analysis.high_similarity_matches,
                doc.duplicate_analysis.medium_similarity_matches
            ));
            for candidate in &doc.duplicate_analysis.all_matches {
                output.push_str(&format!(
                    "- {} ({:.2}): {}\n",
                    candidate.key, candidate.similarity_score, candidate.summary
                ));
            }
            output.push_str(&format!(
                "\nAction: {:?} (confidence {:?})\n",
                doc.recommendations.action, doc.recommendations.confidence
            ));
            output
        }
        Document::Workload(doc) => {
            let mut output = String::from("# Workload\n\n");
            output.push_str(&format!(
                "{} user(s), {} issue(s), {} unassigned; balance {:?} (spread {})\n\n",
                doc.summary.total_users,
                doc.summary.total_issues,
                doc.summary.unassigned_count,
                doc.capacity_insights.balance,
                doc.capacity_insights.variance
            ));
            for user in &doc.users {
                output.push_str(&format!(
                    "- {}: {} assigned ({} done, {} in progress, {} open), {} overdue\n",
                    user.name, user.total_assigned, user.done, user.in_progress, user.open,
                    user.overdue
                ));
            }
            output.push_str("\n## Recommendations\n\n");
            for recommendation in &doc.recommendations {
                output.push_str(&format!("- {recommendation}\n"));
            }
            output
        }
        Document::Release(doc) => {
            let mut output = format!(
                "# Release readiness: {}\n\n",
                doc.completion_metrics.version
            );
            output.push_str(&format!(
                "Completion: {}% ({} of {} issues)\n",
                doc.completion_metrics.completion_percentage,
                doc.completion_metrics.completed_issues,
                doc.completion_metrics.total_issues
            ));
            output.push_str(&format!(
                "Readiness score: {:.1} (overall risk {:?})\n\n",
                doc.risk_assessment.readiness_score, doc.risk_assessment.overall_risk
            ));
            if !doc.risk_factors.is_empty() {
                output.push_str("## Risk factors\n\n");
                for factor in &doc.risk_factors {
                    output.push_str(&format!(
                        "- [{:?}] {}: {}\n",
                        factor.severity, factor.factor, factor.detail
                    ));
                }
                output.push('\n');
            }
            output.push_str("## Recommendations\n\n");
            for recommendation in &doc.recommendations {
                output.push_str(&format!("- {recommendation}\n"));
            }
            output
        }
        Document::Component(doc) => {
            format!(
                "# Component health: {}\n\n\
                 Issues: {} total, {} open, {} recent\n\
                 Defect ratio: {:.2}\n\
                 Average open age: {:.1} days ({} stale)\n\
                 Completion rate: {}%\n\
                 Activity: {:?}\n",
                doc.component,
                doc.total_issues,
                doc.open_issues,
                doc.recent_issues,
                doc.defect_ratio,
                doc.average_open_age_days,
                doc.stale_count,
                doc.completion_rate,
                doc.activity_level
            )
        }
        Document::HealthSummary(doc) => {
            let mut output = String::from("# Component health summary\n\n");
            output.push_str(&format!(
                "{} component(s): {} healthy, {} concern, {} critical\n\n",
                doc.component_summary.total_components,
                doc.component_summary.healthy,
                doc.component_summary.concern,
                doc.component_summary.critical
            ));
            for (bucket, components) in [
                ("Healthy", &doc.component_details.healthy),
                ("Concern", &doc.component_details.concern),
                ("Critical", &doc.component_details.critical),
            ] {
                if components.is_empty() {
                    continue;
                }
                output.push_str(&format!("## {bucket}\n\n"));
                for component in components {
                    output.push_str(&format!(
                        "- {} ({:.0}): {} issues, {} open, {} bugs\n",
                        component.name,
                        component.health_score,
                        component.total_issues,
                        component.open_issues,
                        component.bug_count
                    ));
                }
                output.push('\n');
            }
            output
        }
        Document::Triage(doc) => {
            let mut output = format!(
                "# Triage: {}\n\n{} ({}, {} days old, assignee {})\n\n",
                doc.issue_overview.key,
                doc.issue_overview.summary,
                doc.issue_overview.status,
                doc.issue_overview.age_days,
                doc.issue_overview.assignee
            );
            output.push_str(&format!(
                "Duplicate risk: {:?} ({} potential match(es))\n",
                doc.duplicate_risk.level, doc.duplicate_risk.potential_duplicates_found
            ));
            if let Some(expert) = &doc.assignment_analysis.recommended_expert {
                output.push_str(&format!(
                    "Recommended expert: {} ({} issues, {:.0}% completed)\n",
                    expert.name,
                    expert.issues_handled,
                    expert.completion_rate * 100.0
                ));
            }
            output.push_str("\n## Next steps\n\n");
            for (position, step) in doc.next_steps.iter().enumerate() {
                output.push_str(&format!("{}. {step}\n", position + 1));
            }
            output
        }
    }
}
