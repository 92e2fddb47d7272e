use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;

use crate::models::domain::quiz::IntegrityError;
use crate::services::output_parser::OutputParseError;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("No content to quiz on: {0}")]
    SourceUnavailable(String),

    #[error("Generation service error: {0}")]
    GenerationServiceError(String),

    #[error("Search service error: {0}")]
    SearchServiceError(String),

    #[error("Quiz generation failed: {0}")]
    MalformedQuizOutput(String),

    #[error("Quiz generation failed: {0}")]
    QuizIntegrity(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            AppError::GenerationServiceError(_) => "GENERATION_SERVICE_ERROR",
            AppError::SearchServiceError(_) => "SEARCH_SERVICE_ERROR",
            AppError::MalformedQuizOutput(_) => "MALFORMED_QUIZ_OUTPUT",
            AppError::QuizIntegrity(_) => "QUIZ_INTEGRITY",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    pub kind: &'static str,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::SourceUnavailable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::GenerationServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::SearchServiceError(_) => StatusCode::BAD_GATEWAY,
            AppError::MalformedQuizOutput(_) => StatusCode::BAD_GATEWAY,
            AppError::QuizIntegrity(_) => StatusCode::BAD_GATEWAY,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
            code: self.status_code().as_u16(),
            kind: self.error_code(),
        })
    }
}

impl From<OutputParseError> for AppError {
    fn from(err: OutputParseError) -> Self {
        AppError::MalformedQuizOutput(err.to_string())
    }
}

impl From<IntegrityError> for AppError {
    fn from(err: IntegrityError) -> Self {
        AppError::QuizIntegrity(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("I/O error: {}", err))
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::SourceUnavailable("empty".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::GenerationServiceError("timeout".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::MalformedQuizOutput("bad json".into()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Conflict("not started".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::SourceUnavailable("topic search returned no documents".into());
        assert_eq!(
            err.to_string(),
            "No content to quiz on: topic search returned no documents"
        );
    }

    #[test]
    fn test_parse_and_integrity_errors_stay_distinct() {
        let parse: AppError = OutputParseError::Empty.into();
        let integrity: AppError = IntegrityError::CorrectAnswerCount {
            question: 0,
            found: 2,
        }
        .into();

        assert_eq!(parse.error_code(), "MALFORMED_QUIZ_OUTPUT");
        assert_eq!(integrity.error_code(), "QUIZ_INTEGRITY");
    }
}
