use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct NewPost {
    pub(crate) author: String,
    pub(crate) text: Option<String>,
    pub(crate) image: Option<String>,
}

/// A post row joined with its author's avatar.
#[derive(Debug, Clone)]
pub(crate) struct PostWithAvatar {
    pub(crate) post: Post,
    pub(crate) author_avatar: Option<String>,
}

#[async_trait]
pub(crate) trait PostRepository: Send + Sync {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError>;
    async fn exists(&self, id: i64) -> Result<bool, DomainError>;
    /// All posts, newest first.
    async fn list_with_avatars(&self) -> Result<Vec<PostWithAvatar>, DomainError>;
    async fn list_by_author(&self, author: &str) -> Result<Vec<Post>, DomainError>;
}
