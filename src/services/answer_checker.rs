use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Quiz, QuizQuestion},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerVerdict {
    Correct,
    Wrong,
    Unanswered,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionVerdict {
    pub question: String,
    pub selected: Option<String>,
    pub verdict: AnswerVerdict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub verdicts: Vec<QuestionVerdict>,
    pub correct: usize,
    pub total: usize,
}

pub struct AnswerChecker;

impl AnswerChecker {
    /// Checks one optional selection per question, in quiz order.
    /// Questions past the end of `selections` count as unanswered.
    pub fn check(quiz: &Quiz, selections: &[Option<String>]) -> AppResult<QuizResult> {
        if selections.len() > quiz.len() {
            return Err(AppError::ValidationError(format!(
                "received {} answers for a quiz with {} questions",
                selections.len(),
                quiz.len()
            )));
        }

        let verdicts: Vec<QuestionVerdict> = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let selected = selections.get(index).cloned().flatten();
                QuestionVerdict {
                    question: question.question.clone(),
                    verdict: Self::check_question(question, selected.as_deref()),
                    selected,
                }
            })
            .collect();

        let correct = verdicts
            .iter()
            .filter(|v| v.verdict == AnswerVerdict::Correct)
            .count();

        Ok(QuizResult {
            total: verdicts.len(),
            correct,
            verdicts,
        })
    }

    fn check_question(question: &QuizQuestion, selected: Option<&str>) -> AnswerVerdict {
        match selected {
            None => AnswerVerdict::Unanswered,
            Some(text) => {
                let is_correct = question
                    .answers
                    .iter()
                    .any(|answer| answer.correct && answer.answer == text);
                if is_correct {
                    AnswerVerdict::Correct
                } else {
                    AnswerVerdict::Wrong
                }
            }
        }
    }
}
