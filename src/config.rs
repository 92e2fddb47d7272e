use std::{env, path::PathBuf, str::FromStr};

use secrecy::{ExposeSecret, SecretString};

use crate::{
    errors::{AppError, AppResult},
    repositories::session_repository::DEFAULT_MAX_SESSIONS,
    services::{model_service::TokenSinkKind, output_parser::ParseStrategy},
};

/// One year.
const MAX_SESSION_IDLE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct Config {
    pub openai_api_key: SecretString,
    pub openai_api_base: String,
    pub model: String,
    pub temperature: f32,
    pub streaming: bool,
    pub token_sink: TokenSinkKind,
    pub structured_output: bool,
    pub parse_strategy: ParseStrategy,
    pub wikipedia_api_url: String,
    pub wikipedia_top_k: usize,
    pub wikipedia_doc_chars_max: usize,
    pub file_cache_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cache_max_entries: usize,
    pub session_max_entries: usize,
    pub session_idle_ttl_secs: u64,
    pub web_server_host: String,
    pub web_server_port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            openai_api_key: SecretString::from(env::var("OPENAI_API_KEY").unwrap_or_default()),
            openai_api_base: env::var("OPENAI_API_BASE")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            model: env::var("QUIZ_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo-1106".to_string()),
            temperature: parse_env("QUIZ_TEMPERATURE", 0.1),
            streaming: parse_env("QUIZ_STREAMING", true),
            token_sink: parse_env("QUIZ_TOKEN_SINK", TokenSinkKind::Stdout),
            structured_output: parse_env("QUIZ_STRUCTURED_OUTPUT", true),
            parse_strategy: parse_env("QUIZ_PARSE_STRATEGY", ParseStrategy::Fenced),
            wikipedia_api_url: env::var("WIKIPEDIA_API_URL")
                .unwrap_or_else(|_| "https://en.wikipedia.org/w/api.php".to_string()),
            wikipedia_top_k: parse_env("WIKIPEDIA_TOP_K", 5),
            wikipedia_doc_chars_max: parse_env("WIKIPEDIA_DOC_CHARS_MAX", 4000),
            file_cache_dir: env::var("FILE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./.cache/quiz_files")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            cache_max_entries: parse_env("CACHE_MAX_ENTRIES", 128),
            session_max_entries: parse_env("SESSION_MAX_ENTRIES", DEFAULT_MAX_SESSIONS),
            session_idle_ttl_secs: parse_env("SESSION_IDLE_TTL_SECS", 3600),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "127.0.0.1".to_string()),
            web_server_port: parse_env("WEB_SERVER_PORT", 8080),
        }
    }

    /// Checks the settings the server cannot run without.
    pub fn validate(&self) -> AppResult<()> {
        if self.openai_api_key.expose_secret().trim().is_empty() {
            return Err(AppError::ValidationError(
                "OPENAI_API_KEY is not set".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(AppError::ValidationError(format!(
                "QUIZ_TEMPERATURE must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.wikipedia_top_k == 0 {
            return Err(AppError::ValidationError(
                "WIKIPEDIA_TOP_K must be at least 1".to_string(),
            ));
        }

        if self.cache_max_entries == 0 {
            return Err(AppError::ValidationError(
                "CACHE_MAX_ENTRIES must be at least 1".to_string(),
            ));
        }

        if self.session_max_entries == 0 {
            return Err(AppError::ValidationError(
                "SESSION_MAX_ENTRIES must be at least 1".to_string(),
            ));
        }

        if !(1..=MAX_SESSION_IDLE_TTL_SECS).contains(&self.session_idle_ttl_secs) {
            return Err(AppError::ValidationError(format!(
                "SESSION_IDLE_TTL_SECS must be between 1 and {}, got {}",
                MAX_SESSION_IDLE_TTL_SECS, self.session_idle_ttl_secs
            )));
        }

        Ok(())
    }

    pub fn session_idle_ttl(&self) -> chrono::Duration {
        let secs = self.session_idle_ttl_secs.min(MAX_SESSION_IDLE_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            openai_api_key: SecretString::from("sk-test".to_string()),
            openai_api_base: "http://localhost:9999/v1".to_string(),
            model: "gpt-3.5-turbo-1106".to_string(),
            temperature: 0.1,
            streaming: false,
            token_sink: TokenSinkKind::None,
            structured_output: false,
            parse_strategy: ParseStrategy::Legacy,
            wikipedia_api_url: "http://localhost:9999/w/api.php".to_string(),
            wikipedia_top_k: 5,
            wikipedia_doc_chars_max: 4000,
            file_cache_dir: env::temp_dir().join("quizgpt-test-files"),
            max_upload_bytes: 1024 * 1024,
            cache_max_entries: 16,
            session_max_entries: 64,
            session_idle_ttl_secs: 600,
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
        }
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
