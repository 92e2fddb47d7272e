use serde::{Deserialize, Serialize};

use crate::models::domain::{Quiz, QuizQuestion};

/// Quiz as shown to the player: answer texts in order, correctness withheld.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizDto {
    pub questions: Vec<QuizQuestionDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestionDto {
    pub question: String,
    pub answers: Vec<String>,
}

impl From<&QuizQuestion> for QuizQuestionDto {
    fn from(question: &QuizQuestion) -> Self {
        QuizQuestionDto {
            question: question.question.clone(),
            answers: question.answers.iter().map(|a| a.answer.clone()).collect(),
        }
    }
}

impl From<&Quiz> for QuizDto {
    fn from(quiz: &Quiz) -> Self {
        QuizDto {
            questions: quiz.questions.iter().map(QuizQuestionDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::QuizAnswer;

    #[test]
    fn quiz_dto_hides_correctness_and_keeps_order() {
        let quiz = Quiz {
            questions: vec![QuizQuestion {
                question: "When was Avatar released?".to_string(),
                answers: vec![
                    QuizAnswer::new("2007", false),
                    QuizAnswer::new("2001", false),
                    QuizAnswer::new("2009", true),
                    QuizAnswer::new("1998", false),
                ],
            }],
        };

        let dto = QuizDto::from(&quiz);
        assert_eq!(dto.questions[0].answers, vec!["2007", "2001", "2009", "1998"]);

        let json = serde_json::to_value(&dto).expect("dto should serialize");
        assert!(!json.to_string().contains("correct"));
    }
}
