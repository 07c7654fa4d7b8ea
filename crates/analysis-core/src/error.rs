use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(String),

    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
