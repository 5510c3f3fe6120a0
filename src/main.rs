mod analyze;
mod cli;
mod config;
mod error;
mod model;
mod report;
mod snapshot;

use crate::analyze::duplicates::DuplicateAction;
use crate::analyze::workload::BalanceLevel;
use crate::analyze::Severity;
use crate::error::Result;
use crate::model::Issue;
use crate::report::{Document, OutputFormat};
use chrono::Utc;
use clap::Parser;
use tracing::info;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const WARNINGS: i32 = 1;
    pub const RUNTIME_FAILURE: i32 = 3;
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn output_format(format: cli::ReportFormat) -> OutputFormat {
    match format {
        cli::ReportFormat::Json => OutputFormat::Json,
        cli::ReportFormat::Md => OutputFormat::Md,
    }
}

fn run(command: cli::Commands) -> Result<i32> {
    let now = Utc::now();
    match command {
        cli::Commands::Sprint(cmd) => {
            let snap = snapshot::load(&cmd.snapshot)?;
            load_lens_config(&cmd.snapshot)?;
            let documents = analyze::sprint::analyze(&snap.sprints, cmd.sprint.as_deref())?;
            emit(&Document::Sprints(documents), cmd.format)?;
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Duplicates(cmd) => {
            let snap = snapshot::load(&cmd.snapshot)?;
            let lens_config = load_lens_config(&cmd.snapshot)?;
            let target = snap.issue(&cmd.key)?;
            let project = cmd
                .project
                .clone()
                .or(lens_config.map(|cfg| cfg.project.key))
                .unwrap_or_else(|| target.project().to_string());
            let candidates: Vec<&Issue> = snap
                .issues
                .iter()
                .filter(|issue| issue.key != target.key && issue.project() == project)
                .collect();
            let document = analyze::duplicates::analyze(target, &candidates);
            let review = document.recommendations.action == DuplicateAction::ReviewForDuplicates;
            emit(&Document::Duplicates(document), cmd.format)?;
            Ok(if review {
                exit_code::WARNINGS
            } else {
                exit_code::SUCCESS
            })
        }
        cli::Commands::Workload(cmd) => {
            let snap = snapshot::load(&cmd.snapshot)?;
            load_lens_config(&cmd.snapshot)?;
            let issues: Vec<&Issue> = snap.issues.iter().collect();
            let in_progress = snap.in_progress_issues();
            let document = analyze::workload::analyze(&issues, &in_progress, now);
            let imbalanced =
                document.capacity_insights.balance == BalanceLevel::SignificantImbalance;
            emit(&Document::Workload(document), cmd.format)?;
            Ok(if imbalanced {
                exit_code::WARNINGS
            } else {
                exit_code::SUCCESS
            })
        }
        cli::Commands::Release(cmd) => {
            let snap = snapshot::load(&cmd.snapshot)?;
            load_lens_config(&cmd.snapshot)?;
            let all = snap.version_issues(&cmd.version);
            let open: Vec<&Issue> = all.iter().copied().filter(|issue| issue.is_open()).collect();
            let document = analyze::release::analyze(&cmd.version, &all, &open);
            let high_risk = document.risk_assessment.overall_risk == Severity::High;
            emit(&Document::Release(document), cmd.format)?;
            Ok(if high_risk {
                exit_code::WARNINGS
            } else {
                exit_code::SUCCESS
            })
        }
        cli::Commands::Health(cmd) => {
            let snap = snapshot::load(&cmd.snapshot)?;
            load_lens_config(&cmd.snapshot)?;
            match cmd.component.as_deref() {
                Some(component) => {
                    let all = snap.component_issues(component);
                    let open: Vec<&Issue> =
                        all.iter().copied().filter(|issue| issue.is_open()).collect();
                    let recent_cutoff =
                        now - chrono::Duration::days(analyze::health::RECENT_WINDOW_DAYS);
                    let recent: Vec<&Issue> = all
                        .iter()
                        .copied()
                        .filter(|issue| issue.created >= recent_cutoff)
                        .collect();
                    let document =
                        analyze::health::analyze_component(component, &all, &open, &recent, now);
                    emit(&Document::Component(document), cmd.format)?;
                    Ok(exit_code::SUCCESS)
                }
                None => {
                    let issues: Vec<&Issue> = snap.issues.iter().collect();
                    let document = analyze::health::analyze_all(&issues, now);
                    let has_critical = document.component_summary.critical > 0;
                    emit(&Document::HealthSummary(document), cmd.format)?;
                    Ok(if has_critical {
                        exit_code::WARNINGS
                    } else {
                        exit_code::SUCCESS
                    })
                }
            }
        }
        cli::Commands::Triage(cmd) => {
            let snap = snapshot::load(&cmd.snapshot)?;
            load_lens_config(&cmd.snapshot)?;
            let target = snap.issue(&cmd.key)?;
            let candidates = snap.duplicate_candidates(target);
            let history: Vec<&Issue> = snap
                .issues
                .iter()
                .filter(|issue| {
                    issue.key != target.key && !issue.components.is_disjoint(&target.components)
                })
                .collect();
            let document = analyze::triage::analyze(target, &candidates, &history, now);
            let high_risk = document.duplicate_risk.level == Severity::High;
            emit(&Document::Triage(document), cmd.format)?;
            Ok(if high_risk {
                exit_code::WARNINGS
            } else {
                exit_code::SUCCESS
            })
        }
    }
}

/// Config lives beside the snapshot file. Absence is a warning, not
/// an error; analysis runs without it.
fn load_lens_config(snapshot_path: &std::path::Path) -> Result<Option<config::LensConfig>> {
    let root = snapshot_path.parent().unwrap_or(std::path::Path::new("."));
    let loaded = config::load_config(root)?;
    match &loaded {
        Some(cfg) => info!(
            project = %cfg.project.key,
            name = cfg.project.name.as_deref().unwrap_or("-"),
            "configuration loaded"
        ),
        None => eprintln!("warning: no jiralens.toml found next to {}", snapshot_path.display()),
    }
    Ok(loaded)
}

fn emit(document: &Document, format: cli::ReportFormat) -> Result<()> {
    let rendered = report::render(document, output_format(format))?;
    println!("{rendered}");
    Ok(())
}

fn main() {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let operation = cli.command.name();
    match run(cli.command) {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {operation}: {e}");
            std::process::exit(exit_code::RUNTIME_FAILURE);
        }
    }
}
