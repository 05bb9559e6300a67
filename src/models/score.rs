use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{QuizError, Result};

/// The result of one finished session, as stored under the `scores` key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Score {
    pub name: String,
    pub points: u32,
    pub total: u32,
}

impl Score {
    pub fn new(name: &str, points: u32, total: u32) -> Result<Self> {
        if total == 0 {
            return Err(QuizError::Validation(
                "A score needs at least one question".to_string(),
            ));
        }
        if points > total {
            return Err(QuizError::Validation(format!(
                "Score {points} is greater than the {total} questions played"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            points,
            total,
        })
    }

    /// Records with the same key describe the same finished session.
    pub fn identity_key(&self) -> (&str, u32, u32) {
        (&self.name, self.points, self.total)
    }

    pub fn percentage(&self) -> u32 {
        // Deserialized records skip `new`.
        if self.total == 0 {
            return 0;
        }
        ((f64::from(self.points) / f64::from(self.total)) * 100.0).round() as u32
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} ({}%)",
            self.name,
            self.points,
            self.total,
            self.percentage()
        )
    }
}
