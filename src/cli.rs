use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "jiralens",
    version,
    about = "Issue-tracker analytics: sprint, duplicate, workload, release, and component insights"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Sprint(SprintCommand),
    Duplicates(DuplicatesCommand),
    Workload(WorkloadCommand),
    Release(ReleaseCommand),
    Health(HealthCommand),
    Triage(TriageCommand),
}

impl Commands {
    /// Operation name used when reporting a failure.
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Sprint(_) => "sprint",
            Commands::Duplicates(_) => "duplicates",
            Commands::Workload(_) => "workload",
            Commands::Release(_) => "release",
            Commands::Health(_) => "health",
            Commands::Triage(_) => "triage",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

#[derive(Args)]
pub struct SprintCommand {
    /// Normalized tracker snapshot (JSON)
    pub snapshot: PathBuf,
    /// Analyze exactly this sprint instead of the active one
    #[arg(long)]
    pub sprint: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct DuplicatesCommand {
    pub snapshot: PathBuf,
    /// Issue key to check, e.g. PROJ-123
    pub key: String,
    /// Candidate pool project key (defaults to the issue's project)
    #[arg(long)]
    pub project: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct WorkloadCommand {
    pub snapshot: PathBuf,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct ReleaseCommand {
    pub snapshot: PathBuf,
    /// Release version, e.g. 2.0
    pub version: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct HealthCommand {
    pub snapshot: PathBuf,
    /// Score one component; omit for the ranked multi-component summary
    #[arg(long)]
    pub component: Option<String>,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct TriageCommand {
    pub snapshot: PathBuf,
    /// Issue key to triage, e.g. PROJ-123
    pub key: String,
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ReportFormat,
}
