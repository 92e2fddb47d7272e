use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::domain::Quiz;

const FENCE: &str = "```";

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)```")
        .expect("FENCED_BLOCK is a valid regex pattern")
});

static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([\]}])").expect("TRAILING_COMMA is a valid regex pattern"));

#[derive(Debug, Error)]
pub enum OutputParseError {
    #[error("model returned no output")]
    Empty,

    #[error("model output is not a valid quiz document: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStrategy {
    /// Strips every fence token and every `json` substring, then fixes `, ]` and `, }`.
    Legacy,
    /// Extracts the fenced block (or outermost object) and leaves its content intact.
    Fenced,
}

impl FromStr for ParseStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "legacy" => Ok(ParseStrategy::Legacy),
            "fenced" => Ok(ParseStrategy::Fenced),
            other => Err(format!("unknown parse strategy '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QuizOutputParser {
    strategy: ParseStrategy,
}

impl QuizOutputParser {
    pub fn new(strategy: ParseStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    pub fn parse(&self, raw: &str) -> Result<Quiz, OutputParseError> {
        if raw.trim().is_empty() {
            return Err(OutputParseError::Empty);
        }

        let cleaned = match self.strategy {
            ParseStrategy::Legacy => clean_legacy(raw),
            ParseStrategy::Fenced => clean_fenced(raw),
        };

        Ok(serde_json::from_str(&cleaned)?)
    }
}

/// Literal substring surgery: drops fence tokens, drops every `json`, then collapses
/// a comma followed by exactly one space before `]` or `}`.
pub fn clean_legacy(raw: &str) -> String {
    raw.replace(FENCE, "")
        .replace("json", "")
        .replace(", ]", "]")
        .replace(", }", "}")
}

pub fn clean_fenced(raw: &str) -> String {
    let body = extract_json_body(raw);
    TRAILING_COMMA.replace_all(body, "$1").into_owned()
}

fn extract_json_body(raw: &str) -> &str {
    if let Some(block) = FENCED_BLOCK.captures(raw).and_then(|c| c.get(1)) {
        return block.as_str().trim();
    }

    match (raw.find('{'), raw.rfind('}')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> QuizOutputParser {
        QuizOutputParser::new(ParseStrategy::Legacy)
    }

    fn fenced() -> QuizOutputParser {
        QuizOutputParser::new(ParseStrategy::Fenced)
    }

    #[test]
    fn fenced_empty_quiz_parses_with_both_strategies() {
        let raw = "```json\n{ \"questions\": [] }\n```";

        assert_eq!(legacy().parse(raw).expect("legacy parses").len(), 0);
        assert_eq!(fenced().parse(raw).expect("fenced parses").len(), 0);
    }

    #[test]
    fn legacy_collapses_comma_followed_by_single_space() {
        let raw = r#"{"questions": [{"question": "Q", "answers": [{"answer":"A","correct":false}, ]}]}"#;

        let quiz = legacy().parse(raw).expect("single-space trailing comma is tolerated");
        assert_eq!(quiz.questions[0].answers.len(), 1);
        assert!(!quiz.questions[0].answers[0].correct);
    }

    #[test]
    fn legacy_rejects_comma_without_following_space() {
        let raw = r#"{"questions": [{"question": "Q", "answers": [{"answer":"A","correct":false},]}]}"#;

        assert!(matches!(legacy().parse(raw), Err(OutputParseError::Decode(_))));
    }

    #[test]
    fn legacy_rejects_comma_followed_by_newline() {
        let raw = "{\"questions\": [{\"question\": \"Q\", \"answers\": [{\"answer\":\"A\",\"correct\":false},\n]}]}";

        assert!(legacy().parse(raw).is_err());
    }

    #[test]
    fn legacy_closing_brace_comma_is_collapsed() {
        let raw = r#"{"questions": [{"question": "Q", "answers": [{"answer":"A","correct":true, }]}]}"#;

        let quiz = legacy().parse(raw).expect("`, }` is collapsed");
        assert!(quiz.questions[0].answers[0].correct);
    }

    #[test]
    fn fenced_tolerates_any_whitespace_before_closing_bracket() {
        let raw = "{\"questions\": [{\"question\": \"Q\", \"answers\": [{\"answer\":\"A\",\"correct\":false},\n  ]},]}";

        let quiz = fenced().parse(raw).expect("fenced strips trailing commas");
        assert_eq!(quiz.len(), 1);
    }

    #[test]
    fn not_json_is_a_decode_error_not_an_empty_quiz() {
        assert!(matches!(legacy().parse("not json at all"), Err(OutputParseError::Decode(_))));
        assert!(matches!(fenced().parse("not json at all"), Err(OutputParseError::Decode(_))));
    }

    #[test]
    fn blank_output_is_empty_error() {
        assert!(matches!(legacy().parse("  \n"), Err(OutputParseError::Empty)));
    }

    #[test]
    fn legacy_corrupts_content_containing_json_but_fenced_does_not() {
        let raw = r#"```json
{"questions": [{"question": "What does jsonb store?", "answers": [
  {"answer": "Binary json", "correct": true},
  {"answer": "Images", "correct": false},
  {"answer": "Audio", "correct": false},
  {"answer": "Video", "correct": false}
]}]}
```"#;

        let legacy_quiz = legacy().parse(raw).expect("legacy still decodes");
        assert_eq!(legacy_quiz.questions[0].question, "What does b store?");

        let fenced_quiz = fenced().parse(raw).expect("fenced decodes");
        assert_eq!(fenced_quiz.questions[0].question, "What does jsonb store?");
        assert_eq!(fenced_quiz.questions[0].answers[0].answer, "Binary json");
    }

    #[test]
    fn fenced_takes_outermost_object_when_prose_surrounds_it() {
        let raw = "Here is your quiz: {\"questions\": []} Enjoy!";
        assert!(fenced().parse(raw).expect("object is extracted").is_empty());
    }

    #[test]
    fn fenced_accepts_unfenced_plain_json() {
        let raw = r#"{"questions": [{"question": "Q", "answers": [{"answer": "A", "correct": true}]}]}"#;
        assert_eq!(fenced().parse(raw).expect("plain json").len(), 1);
    }

    #[test]
    fn parse_strategy_from_str() {
        assert_eq!("Legacy".parse::<ParseStrategy>(), Ok(ParseStrategy::Legacy));
        assert_eq!(" fenced ".parse::<ParseStrategy>(), Ok(ParseStrategy::Fenced));
        assert!("regex".parse::<ParseStrategy>().is_err());
    }
}
