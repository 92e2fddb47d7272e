use std::sync::Arc;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Quiz, SessionContext, SourceDocument},
    repositories::SessionRepository,
    services::{
        answer_checker::{AnswerChecker, QuizResult},
        quiz_generation_service::QuizGenerationService,
        source_resolver::SourceResolver,
    },
};

pub struct SessionService {
    repository: Arc<dyn SessionRepository>,
    resolver: Arc<SourceResolver>,
    generator: Arc<QuizGenerationService>,
}

impl SessionService {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        resolver: Arc<SourceResolver>,
        generator: Arc<QuizGenerationService>,
    ) -> Self {
        Self {
            repository,
            resolver,
            generator,
        }
    }

    pub async fn create_session(&self) -> AppResult<SessionContext> {
        let session = self.repository.create(SessionContext::new()).await?;
        log::info!("Created session {}", session.id);
        Ok(session)
    }

    pub async fn get_session(&self, id: &str) -> AppResult<SessionContext> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Session with id '{}' not found", id)))
    }

    pub async fn select_file_source(
        &self,
        id: &str,
        name: &str,
        bytes: &[u8],
    ) -> AppResult<SessionContext> {
        let session = self.get_session(id).await?;
        let document = self.resolver.resolve_file(name, bytes).await?;
        self.activate(session, document).await
    }

    pub async fn select_topic_source(&self, id: &str, topic: &str) -> AppResult<SessionContext> {
        let session = self.get_session(id).await?;
        let document = self.resolver.resolve_topic(topic).await?;
        self.activate(session, document).await
    }

    /// Generates the quiz for the active source and holds it on the session.
    /// The session is only marked triggered once a valid quiz exists, and only
    /// if its source did not change while the quiz was being generated.
    pub async fn start_quiz(&self, id: &str) -> AppResult<Quiz> {
        let session = self.get_session(id).await?;
        let source = session.quiz_source()?;
        let source_id = source.id.clone();
        let source_text = source.text.clone();

        let quiz = self.generator.generate_quiz(&source_text).await?;

        let mut session = self.get_session(id).await?;
        if session.active_source_id.as_deref() != Some(source_id.as_str()) {
            log::warn!(
                "Session {} changed source while its quiz was generating, discarding it",
                id
            );
            return Err(AppError::Conflict(format!(
                "Session '{}' changed source while the quiz was generating",
                id
            )));
        }
        session.trigger(quiz.clone());
        self.repository.update(session).await?;

        log::info!("Session {} started a quiz of {} questions", id, quiz.len());
        Ok(quiz)
    }

    pub async fn current_quiz(&self, id: &str) -> AppResult<Quiz> {
        let session = self.get_session(id).await?;
        session.current_quiz().cloned().ok_or_else(|| {
            AppError::Conflict(format!("Session '{}' has not started a quiz", id))
        })
    }

    pub async fn restart(&self, id: &str) -> AppResult<SessionContext> {
        let mut session = self.get_session(id).await?;
        session.restart();
        log::info!("Session {} restarted", id);
        self.repository.update(session).await
    }

    pub async fn check_answers(
        &self,
        id: &str,
        selections: &[Option<String>],
    ) -> AppResult<QuizResult> {
        let quiz = self.current_quiz(id).await?;
        let result = AnswerChecker::check(&quiz, selections)?;
        log::info!(
            "Session {} answered {}/{} correctly",
            id,
            result.correct,
            result.total
        );
        Ok(result)
    }

    pub async fn end_session(&self, id: &str) -> AppResult<()> {
        if !self.repository.delete(id).await? {
            return Err(AppError::NotFound(format!("Session with id '{}' not found", id)));
        }
        log::info!("Ended session {}", id);
        Ok(())
    }

    async fn activate(
        &self,
        mut session: SessionContext,
        document: SourceDocument,
    ) -> AppResult<SessionContext> {
        let source_name = document.name.clone();
        if session.activate_source(document) {
            log::info!("Session {} switched source to '{}'", session.id, source_name);
        }
        self.repository.update(session).await
    }
}
