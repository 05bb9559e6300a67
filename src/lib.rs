//! Core of a small quiz application: authored questions and recorded scores
//! kept in a key-value store, and shuffled quiz sessions played over them.
//!
//! Repositories own their collections and are injected with the [`Storage`]
//! they persist to. A [`QuizSession`] works on a snapshot of the question pool
//! and hands its final score to a [`ScoreRepository`].

pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod loggers;
pub mod models;
pub mod repositories;
pub mod storage;
pub mod subscribers;

pub use error::{QuizError, Result, StorageError};
pub use handlers::session_handler::{AnswerOutcome, QuizSession, SessionState, ShuffledView};
pub use models::{
    draft::QuestionDraft,
    question::{Question, QuestionKind},
    score::Score,
};
pub use repositories::{question_repository::QuestionRepository, score_repository::ScoreRepository};
pub use storage::{MemoryStorage, SqliteStorage, Storage};
