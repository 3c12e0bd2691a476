use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::session::SessionData;

#[async_trait]
pub(crate) trait SessionStore: Send + Sync {
    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, DomainError>;
    async fn set(&self, session_id: &str, data: SessionData) -> Result<(), DomainError>;
    async fn clear(&self, session_id: &str) -> Result<(), DomainError>;
}
