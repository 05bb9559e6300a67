pub mod question_repository;
pub mod score_repository;
