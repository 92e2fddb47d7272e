use std::sync::Arc;

use crate::{
    constants::prompts::{render, QUESTION_DRAFTING_PROMPT, QUIZ_FORMATTING_PROMPT},
    errors::{AppError, AppResult},
    models::domain::Quiz,
    services::{
        content_cache::{CacheKey, ContentCache},
        model_service::{ChatMessage, GenerationRequest, ResponseSchema, TextGenerator},
        output_parser::QuizOutputParser,
    },
};

const QUIZ_SCHEMA_NAME: &str = "quiz";

/// Drafts questions, reformats them as JSON, then parses and validates the result.
/// Completed quizzes are memoized by the digest of the source text.
pub struct QuizGenerationService {
    generator: Arc<dyn TextGenerator>,
    parser: QuizOutputParser,
    structured_output: bool,
    quizzes: ContentCache<Quiz>,
}

impl QuizGenerationService {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        parser: QuizOutputParser,
        structured_output: bool,
        cache_max_entries: usize,
    ) -> Self {
        Self {
            generator,
            parser,
            structured_output,
            quizzes: ContentCache::new("quiz", cache_max_entries),
        }
    }

    pub async fn generate_quiz(&self, source_text: &str) -> AppResult<Quiz> {
        if source_text.trim().is_empty() {
            return Err(AppError::SourceUnavailable(
                "source text is empty".to_string(),
            ));
        }

        let key = CacheKey::from_text(source_text);
        self.quizzes
            .get_or_try_insert_with(key, || self.run_pipeline(source_text))
            .await
    }

    async fn run_pipeline(&self, source_text: &str) -> AppResult<Quiz> {
        log::info!(
            "Drafting questions from {} characters of source text",
            source_text.chars().count()
        );
        let draft = self.draft_questions(source_text).await?;

        log::info!("Formatting {} characters of drafted questions", draft.len());
        let formatted = self.format_questions(&draft).await?;

        let quiz = self.parser.parse(&formatted).map_err(|e| {
            log::warn!("Discarding unparseable quiz output: {}", e);
            AppError::from(e)
        })?;

        quiz.validate().map_err(|e| {
            log::warn!("Discarding quiz that failed validation: {}", e);
            AppError::from(e)
        })?;

        log::info!("Generated quiz with {} questions", quiz.len());
        Ok(quiz)
    }

    async fn draft_questions(&self, source_text: &str) -> AppResult<String> {
        let prompt = render(QUESTION_DRAFTING_PROMPT, source_text);
        self.generator
            .generate(GenerationRequest::new(vec![ChatMessage::system(prompt)]))
            .await
    }

    async fn format_questions(&self, draft: &str) -> AppResult<String> {
        let prompt = render(QUIZ_FORMATTING_PROMPT, draft);
        let mut request = GenerationRequest::new(vec![ChatMessage::system(prompt)]);
        if self.structured_output {
            request = request.with_response_schema(quiz_response_schema());
        }
        self.generator.generate(request).await
    }
}

/// JSON schema of [`Quiz`] with every object closed to extra properties.
pub fn quiz_response_schema() -> ResponseSchema {
    let mut schema = serde_json::to_value(schemars::schema_for!(Quiz)).unwrap_or_default();
    if let Some(object) = schema.as_object_mut() {
        object.remove("$schema");
    }

    ResponseSchema {
        name: QUIZ_SCHEMA_NAME.to_string(),
        schema,
    }
}
