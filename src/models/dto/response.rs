use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::domain::{SessionContext, SourceDocument, SourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceSummaryDto {
    pub id: String,
    pub name: String,
    pub kind: SourceKind,
    pub char_count: usize,
    pub resolved_at: DateTime<Utc>,
}

impl From<&SourceDocument> for SourceSummaryDto {
    fn from(document: &SourceDocument) -> Self {
        SourceSummaryDto {
            id: document.id.clone(),
            name: document.name.clone(),
            kind: document.kind,
            char_count: document.char_count(),
            resolved_at: document.resolved_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionDto {
    pub session_id: String,
    pub triggered: bool,
    pub active_source: Option<SourceSummaryDto>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<&SessionContext> for SessionDto {
    fn from(session: &SessionContext) -> Self {
        SessionDto {
            session_id: session.id.clone(),
            triggered: session.triggered,
            active_source: session.source.as_ref().map(SourceSummaryDto::from),
            created_at: session.created_at,
            modified_at: session.modified_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: String,
}

pub type SelectSourceResponse = ApiResponse<SessionDto>;
