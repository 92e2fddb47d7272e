use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::SessionContext,
};

pub const DEFAULT_MAX_SESSIONS: usize = 1000;
pub const DEFAULT_SESSION_IDLE_TTL_SECS: i64 = 3600;

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionContext>>;
    async fn create(&self, session: SessionContext) -> AppResult<SessionContext>;
    async fn update(&self, session: SessionContext) -> AppResult<SessionContext>;
    /// Returns false when no session with `id` was stored.
    async fn delete(&self, id: &str) -> AppResult<bool>;
}

struct StoredSession {
    session: SessionContext,
    last_seen: DateTime<Utc>,
    tick: u64,
}

#[derive(Default)]
struct Sessions {
    entries: HashMap<String, StoredSession>,
    clock: u64,
}

impl Sessions {
    fn next_tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn purge_idle(&mut self, idle_ttl: Duration) {
        let cutoff = Utc::now() - idle_ttl;
        let before = self.entries.len();
        self.entries.retain(|_, stored| stored.last_seen >= cutoff);
        let purged = before - self.entries.len();
        if purged > 0 {
            log::info!("Expired {} idle session(s)", purged);
        }
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, stored)| stored.tick)
            .map(|(id, _)| id.clone());
        if let Some(id) = oldest {
            self.entries.remove(&id);
            log::info!("Evicted session {} at capacity", id);
        }
    }
}

/// Process-local session store. Sessions do not survive a restart. Sessions
/// idle for longer than `idle_ttl` are dropped, and the least recently used
/// session is evicted once `max_entries` are held.
#[derive(Clone)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<Sessions>>,
    max_entries: usize,
    idle_ttl: Duration,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::with_limits(
            DEFAULT_MAX_SESSIONS,
            Duration::seconds(DEFAULT_SESSION_IDLE_TTL_SECS),
        )
    }

    pub fn with_limits(max_entries: usize, idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(Sessions::default())),
            max_entries: max_entries.max(1),
            idle_ttl,
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_idle(&self, stored: &StoredSession) -> bool {
        Utc::now() - stored.last_seen > self.idle_ttl
    }
}

impl Default for InMemorySessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SessionContext>> {
        let mut sessions = self.sessions.write().await;
        let idle = match sessions.entries.get(id) {
            None => return Ok(None),
            Some(stored) => self.is_idle(stored),
        };
        if idle {
            sessions.entries.remove(id);
            log::info!("Session {} expired", id);
            return Ok(None);
        }

        let tick = sessions.next_tick();
        Ok(sessions.entries.get_mut(id).map(|stored| {
            stored.last_seen = Utc::now();
            stored.tick = tick;
            stored.session.clone()
        }))
    }

    async fn create(&self, session: SessionContext) -> AppResult<SessionContext> {
        let mut sessions = self.sessions.write().await;
        sessions.purge_idle(self.idle_ttl);
        if sessions.entries.contains_key(&session.id) {
            return Err(AppError::Conflict(format!(
                "Session with id '{}' already exists",
                session.id
            )));
        }

        while sessions.entries.len() >= self.max_entries {
            sessions.evict_least_recent();
        }

        let tick = sessions.next_tick();
        sessions.entries.insert(
            session.id.clone(),
            StoredSession {
                session: session.clone(),
                last_seen: Utc::now(),
                tick,
            },
        );
        Ok(session)
    }

    async fn update(&self, session: SessionContext) -> AppResult<SessionContext> {
        let mut sessions = self.sessions.write().await;
        let tick = sessions.next_tick();
        let idle_ttl = self.idle_ttl;
        match sessions.entries.get_mut(&session.id) {
            Some(stored) if Utc::now() - stored.last_seen <= idle_ttl => {
                stored.session = session.clone();
                stored.last_seen = Utc::now();
                stored.tick = tick;
                Ok(session)
            }
            _ => Err(AppError::NotFound(format!(
                "Session with id '{}' not found",
                session.id
            ))),
        }
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.entries.remove(id).is_some())
    }
}
