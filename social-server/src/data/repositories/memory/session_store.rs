use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::session_store::SessionStore;
use crate::domain::error::DomainError;
use crate::domain::session::SessionData;

/// Process-local session table. Sessions do not survive a restart.
#[derive(Debug, Clone, Default)]
pub(crate) struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<String, SessionData>>>,
}

impl InMemorySessionStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, DomainError> {
        Ok(self.sessions.read().await.get(session_id).cloned())
    }

    /// Expired entries are swept on every write.
    async fn set(&self, session_id: &str, data: SessionData) -> Result<(), DomainError> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired(now));
        sessions.insert(session_id.to_string(), data);
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<(), DomainError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::InMemorySessionStore;
    use crate::data::session_store::SessionStore;
    use crate::domain::session::SessionData;

    #[tokio::test]
    async fn set_get_clear_roundtrip() {
        let store = InMemorySessionStore::new();
        let data = SessionData {
            username: "alice".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };

        store.set("sid", data.clone()).await.expect("set");
        assert_eq!(store.get("sid").await.expect("get"), Some(data));

        store.clear("sid").await.expect("clear");
        assert_eq!(store.get("sid").await.expect("get"), None);
    }

    #[tokio::test]
    async fn clones_share_the_same_table() {
        let store = InMemorySessionStore::new();
        let other = store.clone();
        other
            .set(
                "sid",
                SessionData {
                    username: "bob".to_string(),
                    expires_at: Utc::now() + Duration::hours(1),
                },
            )
            .await
            .expect("set");

        assert!(store.get("sid").await.expect("get").is_some());
    }

    #[tokio::test]
    async fn set_sweeps_expired_sessions() {
        let store = InMemorySessionStore::new();
        store
            .set(
                "stale",
                SessionData {
                    username: "alice".to_string(),
                    expires_at: Utc::now() - Duration::seconds(1),
                },
            )
            .await
            .expect("set");
        store
            .set(
                "fresh",
                SessionData {
                    username: "bob".to_string(),
                    expires_at: Utc::now() + Duration::hours(1),
                },
            )
            .await
            .expect("set");

        assert_eq!(store.sessions.read().await.len(), 1);
        assert_eq!(store.get("stale").await.expect("get"), None);
        assert!(store.get("fresh").await.expect("get").is_some());
    }
}
