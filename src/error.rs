use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensError {
    #[error("snapshot file not found: {0}")]
    SnapshotNotFound(String),

    #[error("snapshot parse error: {0}")]
    SnapshotParse(String),

    #[error("malformed issue at index {index}: {reason}")]
    MalformedIssue { index: usize, reason: String },

    #[error("duplicate issue key in snapshot: {0}")]
    DuplicateKey(String),

    #[error("issue not found in snapshot: {0}")]
    UnknownIssue(String),

    #[error("sprint not found: {0}")]
    UnknownSprint(String),

    #[error("snapshot contains no sprints")]
    NoSprints,

    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LensError>;
