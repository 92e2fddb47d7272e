use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{quiz::Quiz, source_document::SourceDocument},
};

/// Per-user state carried between interactions.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionContext {
    pub id: String,
    pub triggered: bool,
    pub active_source_id: Option<String>,
    pub source: Option<SourceDocument>,
    #[serde(default)]
    pub quiz: Option<Quiz>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            triggered: false,
            active_source_id: None,
            source: None,
            quiz: None,
            created_at: now,
            modified_at: now,
        }
    }

    /// Makes `document` the active source. Returns true when the source identity
    /// changed, in which case the triggered flag and the held quiz are cleared.
    pub fn activate_source(&mut self, document: SourceDocument) -> bool {
        let changed = self.active_source_id.as_deref() != Some(document.id.as_str());
        if changed {
            self.triggered = false;
            self.quiz = None;
            self.active_source_id = Some(document.id.clone());
        }
        self.source = Some(document);
        self.modified_at = Utc::now();
        changed
    }

    /// The active source, provided it has text a quiz can be generated from.
    pub fn quiz_source(&self) -> AppResult<&SourceDocument> {
        self.source
            .as_ref()
            .filter(|doc| doc.has_content())
            .ok_or_else(|| {
                AppError::SourceUnavailable("select a file or topic before starting".to_string())
            })
    }

    /// Holds `quiz` as the session's quiz and marks the session triggered.
    pub fn trigger(&mut self, quiz: Quiz) {
        self.quiz = Some(quiz);
        self.triggered = true;
        self.modified_at = Utc::now();
    }

    /// The quiz being taken, if one has been started for the active source.
    pub fn current_quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref().filter(|_| self.triggered)
    }

    pub fn restart(&mut self) {
        self.triggered = false;
        self.quiz = None;
        self.modified_at = Utc::now();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}
