use std::sync::Arc;

use crate::{
    config::Config,
    repositories::{InMemorySessionRepository, SessionRepository},
    services::{
        document_extractor::{DocumentExtractor, FileDocumentExtractor},
        knowledge_search::{KnowledgeSearch, WikipediaSearch},
        model_service::{OpenAiModelService, TextGenerator},
        output_parser::QuizOutputParser,
        quiz_generation_service::QuizGenerationService,
        session_service::SessionService,
        source_resolver::SourceResolver,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub session_service: Arc<SessionService>,
    pub config: Arc<Config>,
}

/// External collaborators the services are built on.
pub struct Collaborators {
    pub sessions: Arc<dyn SessionRepository>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub search: Arc<dyn KnowledgeSearch>,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let generator = Arc::new(OpenAiModelService::new(&config, config.token_sink.build()));
        let search = Arc::new(WikipediaSearch::new(&config));

        let collaborators = Collaborators {
            sessions: Arc::new(InMemorySessionRepository::with_limits(
                config.session_max_entries,
                config.session_idle_ttl(),
            )),
            extractor: Arc::new(FileDocumentExtractor),
            search,
            generator,
        };

        Self::with_collaborators(config, collaborators)
    }

    pub fn with_collaborators(config: Config, collaborators: Collaborators) -> Self {
        let resolver = Arc::new(SourceResolver::new(
            collaborators.extractor,
            collaborators.search,
            config.file_cache_dir.clone(),
            config.wikipedia_top_k,
            config.cache_max_entries,
        ));

        let quiz_generation = Arc::new(QuizGenerationService::new(
            collaborators.generator,
            QuizOutputParser::new(config.parse_strategy),
            config.structured_output,
            config.cache_max_entries,
        ));

        let session_service = Arc::new(SessionService::new(
            collaborators.sessions,
            resolver,
            quiz_generation,
        ));

        Self {
            session_service,
            config: Arc::new(config),
        }
    }
}
