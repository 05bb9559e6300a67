use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

pub const TRUE_LABEL: &str = "Vrai";
pub const FALSE_LABEL: &str = "Faux";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum QuestionKind {
    #[serde(alias = "qcm")]
    MultipleChoice,
    #[serde(alias = "vraiFaux")]
    TrueFalse,
}

/// One authored question as stored under the `questions` key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(alias = "question")]
    pub text: String,
    #[serde(alias = "type")]
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_index: usize,
}

pub fn true_false_options() -> Vec<String> {
    vec![TRUE_LABEL.to_string(), FALSE_LABEL.to_string()]
}

impl Question {
    pub fn multiple_choice(text: &str, options: &[&str], correct_index: usize) -> Self {
        Self {
            text: text.to_string(),
            kind: QuestionKind::MultipleChoice,
            options: options.iter().map(|opt| opt.to_string()).collect(),
            correct_index,
        }
    }

    /// Builds a true/false question; `correct_index` is taken modulo 2.
    pub fn true_false(text: &str, correct_index: usize) -> Self {
        Self {
            text: text.to_string(),
            kind: QuestionKind::TrueFalse,
            options: true_false_options(),
            correct_index: correct_index % 2,
        }
    }

    /// Forces the fixed true/false options and folds the correct index into {0, 1}.
    /// Multiple-choice questions are returned untouched.
    pub fn normalized(mut self) -> Self {
        if self.kind == QuestionKind::TrueFalse {
            self.options = true_false_options();
            self.correct_index %= 2;
        }
        self
    }

    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct_index).map(String::as_str)
    }

    /// Checks the authoring rules shared by add and update.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(QuizError::Validation(
                "The question cannot be empty".to_string(),
            ));
        }

        if self.kind == QuestionKind::MultipleChoice {
            if self.options.len() < 2 {
                return Err(QuizError::Validation(
                    "A multiple-choice question needs at least 2 options".to_string(),
                ));
            }
            if self.options.iter().any(|opt| opt.trim().is_empty()) {
                return Err(QuizError::Validation(
                    "All options must be filled in".to_string(),
                ));
            }
        }

        if self.correct_index >= self.options.len() {
            return Err(QuizError::Validation(format!(
                "Correct answer {} does not match any of the {} options",
                self.correct_index,
                self.options.len()
            )));
        }

        Ok(())
    }
}
