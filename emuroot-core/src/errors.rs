use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("directory initialization has to run at least once")]
    NotInitialized,
    #[error("directory initialization has to finish running first")]
    StillRunning,
    #[error("storage error: {0}")]
    Storage(&'static str),
    #[error("invalid input: {0}")]
    Invalid(&'static str),
}
