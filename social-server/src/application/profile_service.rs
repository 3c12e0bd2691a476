use tracing::info;

use crate::data::media_store::MediaStore;
use crate::data::post_repository::PostRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::media::Upload;
use crate::domain::post::Post;
use crate::domain::user::{ProfileUpdate, User, normalize_avatar_url};

#[derive(Debug, Clone)]
pub(crate) struct Profile {
    pub(crate) user: User,
    pub(crate) posts: Vec<Post>,
}

pub(crate) struct ProfileService<R: UserRepository, P: PostRepository, M: MediaStore> {
    users: R,
    posts: P,
    media: M,
}

impl<R: UserRepository, P: PostRepository, M: MediaStore> ProfileService<R, P, M> {
    pub(crate) fn new(users: R, posts: P, media: M) -> Self {
        Self {
            users,
            posts,
            media,
        }
    }

    pub(crate) async fn profile(&self, username: &str) -> Result<Profile, DomainError> {
        let user = self
            .users
            .get_user(username)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;
        let posts = self.posts.list_by_author(&user.username).await?;

        Ok(Profile { user, posts })
    }

    /// The avatar is replaced only when a new file is supplied.
    pub(crate) async fn update_profile(
        &self,
        username: &str,
        bio: String,
        avatar: Option<Upload>,
    ) -> Result<User, DomainError> {
        let update = ProfileUpdate { bio, avatar: None }.validate()?;
        let avatar = match avatar {
            Some(upload) => Some(self.media.save(upload).await?),
            None => None,
        };

        self.apply(username, ProfileUpdate { avatar, ..update }).await
    }

    /// Same as [`Self::update_profile`] but the avatar is given as a URL.
    pub(crate) async fn update_account(
        &self,
        username: &str,
        bio: String,
        avatar_url: Option<String>,
    ) -> Result<User, DomainError> {
        let avatar = normalize_avatar_url(avatar_url.as_deref())?;
        let update = ProfileUpdate { bio, avatar }.validate()?;

        self.apply(username, update).await
    }

    pub(crate) async fn search(&self, query: &str) -> Result<Vec<User>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        self.users.search_by_username(query).await
    }

    async fn apply(&self, username: &str, update: ProfileUpdate) -> Result<User, DomainError> {
        let avatar_changed = update.avatar.is_some();
        let user = self
            .users
            .update_profile(username, update)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user: {username}")))?;

        info!(username, avatar_changed, "profile updated");
        Ok(user)
    }
}
