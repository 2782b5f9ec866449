use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("session totals mismatch: total {total}s but parts sum to {sum}s")]
    TotalsMismatch { total: u64, sum: u64 },
    #[error("exercise index {index} out of range (routine has {len} exercises)")]
    ExerciseIndexOutOfRange { index: usize, len: usize },
    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
