//! Error types for the quiz core.

use thiserror::Error;

/// Failures of the storage gateway itself.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A SQLite operation failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing store is unusable (poisoned lock, closed handle).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// All errors surfaced by the repositories and the quiz session.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Malformed or incomplete question/score input.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A session could not start: too few questions or no player name.
    #[error("Insufficient questions: {0}")]
    InsufficientQuestions(String),

    /// An answer was submitted without a chosen option.
    #[error("No option selected")]
    NoSelection,

    /// An answer was submitted after the last question.
    #[error("Session already completed")]
    SessionCompleted,

    /// A position does not address an element of the collection.
    #[error("Position {position} out of range for {len} records")]
    OutOfRange { position: usize, len: usize },

    /// Export was requested on an empty question list.
    #[error("Nothing to export: the question list is empty")]
    EmptyCollection,

    /// An import payload is not a JSON array.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// An element of an import payload does not have the question shape.
    #[error("Invalid record at index {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    /// A write to the storage gateway failed.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),

    /// A record could not be serialized for storage.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading player input or writing an export file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias that pins the error type to [`QuizError`].
pub type Result<T> = std::result::Result<T, QuizError>;

impl QuizError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            Self::InsufficientQuestions(_) => {
                "Add enough questions and a valid player name to play".to_string()
            }
            Self::NoSelection => "Select an answer first".to_string(),
            Self::SessionCompleted => "This quiz is already over".to_string(),
            Self::OutOfRange { position, .. } => format!("No entry at position {position}"),
            Self::EmptyCollection => "There are no questions to export".to_string(),
            Self::MalformedPayload(_) => "The file is not a list of questions".to_string(),
            Self::InvalidRecord { index, reason } => {
                format!("Question {} is invalid: {reason}", index + 1)
            }
            Self::StorageUnavailable(e) => format!("Failed to save: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
            Self::Io(e) => format!("File error: {e}"),
        }
    }
}
