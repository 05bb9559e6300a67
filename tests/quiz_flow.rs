use std::sync::Arc;

use quiz_app_rust::{
    MemoryStorage, Question, QuestionKind, QuestionRepository, QuizError, QuizSession, Score,
    ScoreRepository, SessionState, SqliteStorage, Storage,
};
use rand::{rngs::StdRng, SeedableRng};

fn four_by_four() -> Vec<Question> {
    vec![
        Question::multiple_choice("2 + 2?", &["3", "4", "5", "22"], 1),
        Question::multiple_choice("Largest planet?", &["Mars", "Venus", "Jupiter", "Earth"], 2),
        Question::multiple_choice("Rust mascot?", &["Ferris", "Gopher", "Duke", "Tux"], 0),
        Question::multiple_choice("Boiling point of water?", &["50", "90", "120", "100"], 3),
    ]
}

#[tokio::test]
async fn test_alice_answers_everything_correctly() {
    let dir = tempfile::tempdir().unwrap();
    let storage: Arc<dyn Storage> =
        Arc::new(SqliteStorage::open(dir.path().join("quiz.sqlite")).unwrap());

    let mut questions = QuestionRepository::new(storage.clone());
    let mut scores = ScoreRepository::new(storage);
    for question in four_by_four() {
        questions.add(question).await.unwrap();
    }

    let pool = questions.list().await;
    let mut session =
        QuizSession::start_with_rng("Alice", 4, &pool, StdRng::seed_from_u64(2024)).unwrap();

    let mut asked = Vec::new();
    while !session.is_completed() {
        asked.push(session.current_question().text.clone());
        let correct = session.shuffled_view().correct_index;
        let outcome = session.submit_answer(Some(correct), &mut scores).await.unwrap();
        assert!(outcome.correct);
    }

    asked.sort();
    asked.dedup();
    assert_eq!(asked.len(), 4);

    let expected = Score::new("Alice", 4, 4).unwrap();
    assert_eq!(session.state(), &SessionState::Completed(expected.clone()));

    let stored = scores.list().await;
    assert_eq!(
        stored
            .iter()
            .filter(|s| s.identity_key() == expected.identity_key())
            .count(),
        1
    );
    assert_eq!(stored, vec![expected]);
}

#[tokio::test]
async fn test_replayed_identical_result_is_stored_once() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut scores = ScoreRepository::new(storage);
    let pool = four_by_four();

    for seed in [1, 2] {
        let mut session =
            QuizSession::start_with_rng("Alice", 4, &pool, StdRng::seed_from_u64(seed)).unwrap();
        while !session.is_completed() {
            let correct = session.shuffled_view().correct_index;
            session.submit_answer(Some(correct), &mut scores).await.unwrap();
        }
    }

    assert_eq!(scores.list().await.len(), 1);
}

#[tokio::test]
async fn test_true_false_out_of_domain_index_is_normalized() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut questions = QuestionRepository::new(storage);

    let question = Question {
        text: "The sun is a star".to_string(),
        kind: QuestionKind::TrueFalse,
        options: vec!["Vrai".to_string(), "Faux".to_string()],
        correct_index: 3,
    };
    let stored = questions.add(question).await.unwrap();
    assert_eq!(stored[0].correct_index, 1);
}

#[tokio::test]
async fn test_session_needs_enough_questions() {
    let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
    let mut questions = QuestionRepository::new(storage);
    questions
        .add(Question::true_false("Only question", 0))
        .await
        .unwrap();

    let pool = questions.list().await;
    assert!(matches!(
        QuizSession::start("Alice", 2, &pool),
        Err(QuizError::InsufficientQuestions(_))
    ));
}
