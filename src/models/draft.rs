//! The question being authored or edited before it is saved.

use crate::{
    error::{QuizError, Result},
    models::question::{true_false_options, Question, QuestionKind},
};

pub const DEFAULT_OPTION_COUNT: usize = 4;
pub const MIN_OPTION_COUNT: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionDraft {
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl Default for QuestionDraft {
    fn default() -> Self {
        Self {
            text: String::new(),
            kind: QuestionKind::MultipleChoice,
            options: vec![String::new(); DEFAULT_OPTION_COUNT],
            correct_index: 0,
        }
    }
}

impl From<&Question> for QuestionDraft {
    fn from(question: &Question) -> Self {
        Self {
            text: question.text.clone(),
            kind: question.kind,
            options: question.options.clone(),
            correct_index: question.correct_index,
        }
    }
}

impl QuestionDraft {
    /// Resizes the option list to `count` entries, keeping existing entries by
    /// position and padding with empty strings. A correct index that falls off
    /// the end resets to 0.
    pub fn resize_options(&mut self, count: usize) -> Result<()> {
        if count < MIN_OPTION_COUNT {
            return Err(QuizError::Validation(format!(
                "Enter a number of options greater than or equal to {MIN_OPTION_COUNT}"
            )));
        }

        self.options.resize(count, String::new());
        if self.correct_index >= count {
            self.correct_index = 0;
        }
        Ok(())
    }

    pub fn set_option(&mut self, position: usize, value: &str) -> Result<()> {
        let len = self.options.len();
        let option = self
            .options
            .get_mut(position)
            .ok_or(QuizError::OutOfRange { position, len })?;
        *option = value.to_string();
        Ok(())
    }

    pub fn select_correct(&mut self, position: usize) -> Result<()> {
        let len = self.visible_options().len();
        if position >= len {
            return Err(QuizError::OutOfRange { position, len });
        }
        self.correct_index = position;
        Ok(())
    }

    /// Options as presented to the author: true/false drafts always show the
    /// fixed pair, whatever was typed while the draft was multiple choice.
    pub fn visible_options(&self) -> Vec<String> {
        match self.kind {
            QuestionKind::TrueFalse => true_false_options(),
            QuestionKind::MultipleChoice => self.options.clone(),
        }
    }

    pub fn to_question(&self) -> Question {
        Question {
            text: self.text.clone(),
            kind: self.kind,
            options: self.options.clone(),
            correct_index: self.correct_index,
        }
        .normalized()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
