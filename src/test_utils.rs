#[cfg(test)]
pub mod fixtures {
    use crate::models::domain::{Quiz, QuizAnswer, QuizQuestion};

    /// Step-one output in the `(o)` marker format.
    pub fn sample_draft() -> &'static str {
        "Question: What is the color of the ocean?\n\
         Answers: Red|Yellow|Green|Blue(o)\n\
         \n\
         Question: What is the capital of Georgia?\n\
         Answers: Baku|Tbilisi(o)|Manila|Beirut"
    }

    /// Step-two output for [`sample_draft`], fenced the way models usually reply.
    pub fn sample_formatted_output() -> &'static str {
        r#"```json
{ "questions": [
    {
        "question": "What is the color of the ocean?",
        "answers": [
            { "answer": "Red", "correct": false },
            { "answer": "Yellow", "correct": false },
            { "answer": "Green", "correct": false },
            { "answer": "Blue", "correct": true }
        ]
    },
    {
        "question": "What is the capital of Georgia?",
        "answers": [
            { "answer": "Baku", "correct": false },
            { "answer": "Tbilisi", "correct": true },
            { "answer": "Manila", "correct": false },
            { "answer": "Beirut", "correct": false }
        ]
    }
] }
```"#
    }

    /// The quiz [`sample_formatted_output`] decodes to.
    pub fn sample_quiz() -> Quiz {
        Quiz {
            questions: vec![
                QuizQuestion {
                    question: "What is the color of the ocean?".to_string(),
                    answers: vec![
                        QuizAnswer::new("Red", false),
                        QuizAnswer::new("Yellow", false),
                        QuizAnswer::new("Green", false),
                        QuizAnswer::new("Blue", true),
                    ],
                },
                QuizQuestion {
                    question: "What is the capital of Georgia?".to_string(),
                    answers: vec![
                        QuizAnswer::new("Baku", false),
                        QuizAnswer::new("Tbilisi", true),
                        QuizAnswer::new("Manila", false),
                        QuizAnswer::new("Beirut", false),
                    ],
                },
            ],
        }
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use crate::services::output_parser::{ParseStrategy, QuizOutputParser};

    #[test]
    fn formatted_output_parses_to_sample_quiz_with_both_strategies() {
        for strategy in [ParseStrategy::Legacy, ParseStrategy::Fenced] {
            let quiz = QuizOutputParser::new(strategy)
                .parse(sample_formatted_output())
                .expect("fixture should parse");
            assert_eq!(quiz, sample_quiz());
        }
    }

    #[test]
    fn sample_quiz_is_valid() {
        assert!(sample_quiz().validate().is_ok());
    }

    #[test]
    fn draft_marks_one_answer_per_question() {
        for line in sample_draft().lines().filter(|l| l.starts_with("Answers:")) {
            assert_eq!(line.matches("(o)").count(), 1);
        }
    }
}
