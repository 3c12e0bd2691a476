use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{ProfileUpdate, User};

#[derive(Debug, Clone)]
pub(crate) struct UserCredentials {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) password_hash: String,
    pub(crate) avatar: Option<String>,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredentials>, DomainError>;
    async fn get_user(&self, username: &str) -> Result<Option<User>, DomainError>;
    /// Overwrites the bio; the avatar only when `update.avatar` is set.
    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> Result<Option<User>, DomainError>;
    async fn search_by_username(&self, fragment: &str) -> Result<Vec<User>, DomainError>;
}
