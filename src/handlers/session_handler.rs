//! One run-through of a quiz by a single player.
//!
//! A session is created by [`QuizSession::start`] already in progress: a failed
//! start creates nothing. Each answer either moves to the next question, with
//! freshly shuffled options, or records the final score and completes.

use log::{debug, info};
use rand::{rngs::ThreadRng, seq::SliceRandom, Rng};

use crate::{
    error::{QuizError, Result},
    models::{question::Question, score::Score},
    repositories::score_repository::ScoreRepository,
};

/// Options of the current question in presentation order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuffledView {
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    InProgress,
    Completed(Score),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Shuffled position of the right answer for the question just answered.
    pub correct_index: usize,
    /// Set once the last question has been answered.
    pub final_score: Option<Score>,
}

/// Shuffles a copy of the options and relocates the correct answer by value.
/// With duplicate option texts the first match wins.
pub fn shuffle_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Result<ShuffledView> {
    let correct_answer = question.correct_option().ok_or_else(|| {
        QuizError::Validation(format!(
            "Question \"{}\" has no option at index {}",
            question.text, question.correct_index
        ))
    })?;

    let mut options = question.options.clone();
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|option| option == correct_answer)
        .unwrap_or(0);

    Ok(ShuffledView {
        options,
        correct_index,
    })
}

pub struct QuizSession<R: Rng = ThreadRng> {
    player_name: String,
    selection: Vec<Question>,
    position: usize,
    score: u32,
    view: ShuffledView,
    state: SessionState,
    rng: R,
}

impl QuizSession<ThreadRng> {
    pub fn start(player_name: &str, requested_count: usize, pool: &[Question]) -> Result<Self> {
        Self::start_with_rng(player_name, requested_count, pool, rand::thread_rng())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn start_with_rng(
        player_name: &str,
        requested_count: usize,
        pool: &[Question],
        mut rng: R,
    ) -> Result<Self> {
        if player_name.trim().is_empty() {
            return Err(QuizError::InsufficientQuestions(
                "a player name is required".to_string(),
            ));
        }
        if requested_count < 1 {
            return Err(QuizError::InsufficientQuestions(
                "at least one question must be requested".to_string(),
            ));
        }
        if pool.len() < requested_count {
            return Err(QuizError::InsufficientQuestions(format!(
                "{} questions requested but only {} available",
                requested_count,
                pool.len()
            )));
        }

        let mut selection = pool.to_vec();
        selection.shuffle(&mut rng);
        selection.truncate(requested_count);
        if let Some(broken) = selection.iter().find(|q| q.correct_option().is_none()) {
            return Err(QuizError::Validation(format!(
                "Question \"{}\" has no option at index {}",
                broken.text, broken.correct_index
            )));
        }

        let view = shuffle_options(&selection[0], &mut rng)?;

        info!(
            "Quiz started for {} with {} of {} questions",
            player_name,
            requested_count,
            pool.len()
        );

        Ok(Self {
            player_name: player_name.to_string(),
            selection,
            position: 0,
            score: 0,
            view,
            state: SessionState::InProgress,
            rng,
        })
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, SessionState::Completed(_))
    }

    /// Zero-based index of the question being asked.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total(&self) -> usize {
        self.selection.len()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_question(&self) -> &Question {
        &self.selection[self.position]
    }

    pub fn shuffled_view(&self) -> &ShuffledView {
        &self.view
    }

    /// Scores the answer and moves on. After the last question the score is
    /// appended to `scores`; if that write fails the session is left on the
    /// last question so the answer can be submitted again.
    pub async fn submit_answer(
        &mut self,
        selected: Option<usize>,
        scores: &mut ScoreRepository,
    ) -> Result<AnswerOutcome> {
        if self.is_completed() {
            return Err(QuizError::SessionCompleted);
        }
        let selected = selected.ok_or(QuizError::NoSelection)?;
        if selected >= self.view.options.len() {
            return Err(QuizError::OutOfRange {
                position: selected,
                len: self.view.options.len(),
            });
        }

        let correct = selected == self.view.correct_index;
        let points = self.score + u32::from(correct);
        let correct_index = self.view.correct_index;
        debug!(
            "{} answered {} on question {} (correct: {})",
            self.player_name,
            selected,
            self.position + 1,
            correct
        );

        if self.position + 1 < self.selection.len() {
            let next_view = shuffle_options(&self.selection[self.position + 1], &mut self.rng)?;
            self.score = points;
            self.position += 1;
            self.view = next_view;
            return Ok(AnswerOutcome {
                correct,
                correct_index,
                final_score: None,
            });
        }

        let total = u32::try_from(self.selection.len())
            .map_err(|_| QuizError::Validation("too many questions in one session".to_string()))?;
        let final_score = Score::new(&self.player_name, points, total)?;
        scores.append(final_score.clone()).await?;

        info!("Quiz completed: {}", final_score);
        self.score = points;
        self.state = SessionState::Completed(final_score.clone());

        Ok(AnswerOutcome {
            correct,
            correct_index,
            final_score: Some(final_score),
        })
    }
}
