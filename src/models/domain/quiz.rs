use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of candidate answers every generated question carries.
pub const ANSWERS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Quiz {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct QuizQuestion {
    pub question: String,
    pub answers: Vec<QuizAnswer>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct QuizAnswer {
    pub answer: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityError {
    #[error("question {question} has empty text")]
    EmptyQuestion { question: usize },

    #[error("question {question} has {found} answers, expected 4")]
    AnswerCount { question: usize, found: usize },

    #[error("question {question} has {found} correct answers, expected exactly one")]
    CorrectAnswerCount { question: usize, found: usize },
}

impl Quiz {
    /// Checks every question for non-empty text, four answers and a single correct one.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        for (index, question) in self.questions.iter().enumerate() {
            question.validate(index)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuizQuestion {
    fn validate(&self, index: usize) -> Result<(), IntegrityError> {
        if self.question.trim().is_empty() {
            return Err(IntegrityError::EmptyQuestion { question: index });
        }

        if self.answers.len() != ANSWERS_PER_QUESTION {
            return Err(IntegrityError::AnswerCount {
                question: index,
                found: self.answers.len(),
            });
        }

        let correct = self.answers.iter().filter(|a| a.correct).count();
        if correct != 1 {
            return Err(IntegrityError::CorrectAnswerCount {
                question: index,
                found: correct,
            });
        }

        Ok(())
    }

    pub fn correct_answer(&self) -> Option<&QuizAnswer> {
        self.answers.iter().find(|a| a.correct)
    }
}

impl QuizAnswer {
    pub fn new(answer: impl Into<String>, correct: bool) -> Self {
        Self {
            answer: answer.into(),
            correct,
        }
    }
}
