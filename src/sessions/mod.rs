//! In-memory conversation sessions.
//!
//! [`SessionManager`] owns every session. Callers only ever hold the
//! session ID; expired sessions are swept on each access and the least
//! recently active one is evicted when the manager is full.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Inactivity after which a session expires.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(3600);

/// Most sessions held at once.
pub const DEFAULT_MAX_SESSIONS: usize = 50;

/// Turns included when building a prompt.
pub const HISTORY_TURNS: usize = 10;

const SESSION_ID_LEN: usize = 8;

/// Speaker of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::User => f.write_str("user"),
            TurnRole::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone)]
struct Turn {
    role: TurnRole,
    content: String,
}

#[derive(Debug)]
struct Session {
    turns: Vec<Turn>,
    created_at: DateTime<Utc>,
    last_activity: DateTime<Utc>,
}

impl Session {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            turns: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }
}

/// Public view of one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    pub id: String,
    pub turns: usize,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

/// Bounded, expiring session store.
#[derive(Debug)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: ChronoDuration,
    capacity: usize,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_SESSION_TTL, DEFAULT_MAX_SESSIONS)
    }

    /// A manager with a custom TTL and capacity (at least one session).
    pub fn with_limits(ttl: Duration, capacity: usize) -> Self {
        let ttl = ChronoDuration::from_std(ttl).unwrap_or_else(|_| ChronoDuration::weeks(5200));
        Self {
            sessions: Mutex::new(HashMap::new()),
            ttl,
            capacity: capacity.max(1),
        }
    }

    /// Returns `id` if that session is live, otherwise creates one under
    /// `id` (or a fresh random ID) and returns it.
    pub async fn get_or_create(&self, id: Option<&str>) -> String {
        self.get_or_create_at(id, Utc::now()).await
    }

    /// Appends a turn. Returns false when the session does not exist.
    pub async fn record_turn(&self, id: &str, role: TurnRole, content: impl Into<String>) -> bool {
        self.record_turn_at(id, role, content.into(), Utc::now()).await
    }

    /// `message` prefixed with the last turns of the session, or `message`
    /// alone when there is no history.
    pub async fn build_prompt(&self, id: &str, message: &str) -> String {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, Utc::now());

        let Some(session) = sessions.get(id).filter(|s| !s.turns.is_empty()) else {
            return message.to_string();
        };

        let start = session.turns.len().saturating_sub(HISTORY_TURNS);
        let history = session.turns[start..]
            .iter()
            .map(|turn| format!("{}: {}", turn.role, turn.content))
            .collect::<Vec<_>>()
            .join("\n");

        format!("Previous conversation:\n{}\n\nUser: {}", history, message)
    }

    /// Removes a session. Returns true if it existed.
    pub async fn clear(&self, id: &str) -> bool {
        self.sessions.lock().await.remove(id).is_some()
    }

    /// Live sessions, most recently active first.
    pub async fn list(&self) -> Vec<SessionSummary> {
        self.list_at(Utc::now()).await
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn get_or_create_at(&self, id: Option<&str>, now: DateTime<Utc>) -> String {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        let id = id.map(str::trim).filter(|id| !id.is_empty());
        if let Some(existing) = id.filter(|id| sessions.contains_key(*id)) {
            return existing.to_string();
        }

        if sessions.len() >= self.capacity {
            let oldest = sessions
                .iter()
                .min_by_key(|(_, s)| s.last_activity)
                .map(|(id, _)| id.clone());
            if let Some(oldest) = oldest {
                tracing::debug!(session = %oldest, "Evicting least recently active session");
                sessions.remove(&oldest);
            }
        }

        let new_id = id.map(str::to_string).unwrap_or_else(new_session_id);
        sessions.insert(new_id.clone(), Session::new(now));
        tracing::debug!(session = %new_id, "Created session");
        new_id
    }

    async fn record_turn_at(
        &self,
        id: &str,
        role: TurnRole,
        content: String,
        now: DateTime<Utc>,
    ) -> bool {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        match sessions.get_mut(id) {
            Some(session) => {
                session.turns.push(Turn { role, content });
                session.last_activity = now;
                true
            }
            None => false,
        }
    }

    async fn list_at(&self, now: DateTime<Utc>) -> Vec<SessionSummary> {
        let mut sessions = self.sessions.lock().await;
        self.sweep(&mut sessions, now);

        let mut summaries: Vec<_> = sessions
            .iter()
            .map(|(id, s)| SessionSummary {
                id: id.clone(),
                turns: s.turns.len(),
                created_at: s.created_at,
                last_activity: s.last_activity,
            })
            .collect();
        summaries.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        summaries
    }

    fn sweep(&self, sessions: &mut HashMap<String, Session>, now: DateTime<Utc>) {
        let before = sessions.len();
        sessions.retain(|_, s| now.signed_duration_since(s.last_activity) <= self.ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "Swept expired sessions");
        }
    }
}

fn new_session_id() -> String {
    Uuid::new_v4().simple().to_string()[..SESSION_ID_LEN].to_string()
}
