#![allow(dead_code)]

use std::{
    path::Path,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use secrecy::SecretString;

use quizgpt_server::{
    app_state::{AppState, Collaborators},
    config::Config,
    errors::AppResult,
    repositories::InMemorySessionRepository,
    services::{
        document_extractor::{DocumentExtractor, FileDocumentExtractor},
        knowledge_search::{KnowledgeSearch, SearchDocument},
        model_service::{GenerationRequest, TextGenerator, TokenSinkKind},
        output_parser::ParseStrategy,
    },
};

pub const DRAFT: &str = "Question: What is the color of the ocean?\n\
Answers: Red|Yellow|Green|Blue(o)\n\
\n\
Question: What is the capital of Georgia?\n\
Answers: Baku|Tbilisi(o)|Manila|Beirut";

pub const FORMATTED: &str = r#"```json
{ "questions": [
    { "question": "What is the color of the ocean?",
      "answers": [
        { "answer": "Red", "correct": false },
        { "answer": "Yellow", "correct": false },
        { "answer": "Green", "correct": false },
        { "answer": "Blue", "correct": true }, ] },
    { "question": "What is the capital of Georgia?",
      "answers": [
        { "answer": "Baku", "correct": false },
        { "answer": "Tbilisi", "correct": true },
        { "answer": "Manila", "correct": false },
        { "answer": "Beirut", "correct": false } ] }
] }
```"#;

pub fn test_config(cache_dir: &Path) -> Config {
    Config {
        openai_api_key: SecretString::from("sk-test".to_string()),
        openai_api_base: "http://localhost:9999/v1".to_string(),
        model: "gpt-3.5-turbo-1106".to_string(),
        temperature: 0.1,
        streaming: false,
        token_sink: TokenSinkKind::None,
        structured_output: true,
        parse_strategy: ParseStrategy::Fenced,
        wikipedia_api_url: "http://localhost:9999/w/api.php".to_string(),
        wikipedia_top_k: 5,
        wikipedia_doc_chars_max: 4000,
        file_cache_dir: cache_dir.to_path_buf(),
        max_upload_bytes: 1024 * 1024,
        cache_max_entries: 16,
        session_max_entries: 64,
        session_idle_ttl_secs: 600,
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
    }
}

/// Returns fixed documents and records every query.
#[derive(Default)]
pub struct FakeSearch {
    documents: Vec<SearchDocument>,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl FakeSearch {
    pub fn with_documents(contents: &[&str]) -> Self {
        Self {
            documents: contents
                .iter()
                .enumerate()
                .map(|(i, content)| SearchDocument {
                    title: format!("Result {}", i + 1),
                    content: content.to_string(),
                })
                .collect(),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or_default()
    }
}

#[async_trait]
impl KnowledgeSearch for FakeSearch {
    async fn search(&self, topic: &str, limit: usize) -> AppResult<Vec<SearchDocument>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push((topic.to_string(), limit));
        }
        Ok(self.documents.iter().take(limit).cloned().collect())
    }
}

/// Wraps the real extractor and counts calls.
#[derive(Default)]
pub struct CountingExtractor {
    pub calls: AtomicUsize,
}

impl CountingExtractor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentExtractor for CountingExtractor {
    async fn extract(&self, path: &Path) -> AppResult<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        FileDocumentExtractor.extract(path).await
    }
}

/// Replies with `draft` to the drafting prompt and `formatted` to the formatting prompt.
pub struct ScriptedGenerator {
    draft: String,
    formatted: String,
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new(draft: &str, formatted: &str) -> Self {
        Self {
            draft: draft.to_string(),
            formatted: formatted.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }

    pub fn request(&self, index: usize) -> Option<GenerationRequest> {
        self.requests.lock().ok()?.get(index).cloned()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> AppResult<String> {
        let is_formatting = request
            .messages
            .first()
            .map(|m| m.content.contains("formatting algorithm"))
            .unwrap_or(false);

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        Ok(if is_formatting {
            self.formatted.clone()
        } else {
            self.draft.clone()
        })
    }
}

pub struct Fakes {
    pub extractor: Arc<CountingExtractor>,
    pub search: Arc<FakeSearch>,
    pub generator: Arc<ScriptedGenerator>,
}

impl Fakes {
    pub fn new(search: FakeSearch, generator: ScriptedGenerator) -> Self {
        Self {
            extractor: Arc::new(CountingExtractor::default()),
            search: Arc::new(search),
            generator: Arc::new(generator),
        }
    }

    pub fn app_state(&self, cache_dir: &Path) -> AppState {
        AppState::with_collaborators(
            test_config(cache_dir),
            Collaborators {
                sessions: Arc::new(InMemorySessionRepository::new()),
                extractor: self.extractor.clone(),
                search: self.search.clone(),
                generator: self.generator.clone(),
            },
        )
    }
}
