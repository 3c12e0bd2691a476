//! Client library for `social-server`.
//!
//! [`SocialClient`] drives the same form and JSON endpoints a browser uses.
//! The session id handed out by `register`/`login` is kept in the client and
//! sent as the `session_id` cookie on protected calls.
#![warn(missing_docs)]

mod error;
mod http_client;
mod models;

pub use error::{SocialClientError, SocialClientResult};
pub use models::{Attachment, Comment, Feed, FeedEntry, Post, Profile, SearchResult, User};

use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Session-aware client for the social posting service.
pub struct SocialClient {
    http: HttpClient,
    session: Option<String>,
}

impl SocialClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:5050`.
    pub fn new(base_url: impl Into<String>) -> SocialClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(base_url)?,
            session: None,
        })
    }

    /// Uses a session id obtained earlier.
    pub fn set_session(&mut self, session: impl Into<String>) {
        self.session = Some(session.into());
    }

    /// Current session id, if any.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    /// Forgets the session id without telling the server.
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Creates an account and keeps the session the server opens for it.
    pub async fn register(
        &mut self,
        username: &str,
        password: &str,
        avatar: Option<Attachment>,
    ) -> SocialClientResult<()> {
        let session = self.http.register(username, password, avatar).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Logs in and keeps the new session.
    pub async fn login(&mut self, username: &str, password: &str) -> SocialClientResult<()> {
        let session = self.http.login(username, password).await?;
        self.session = Some(session);
        Ok(())
    }

    /// Ends the session on the server and forgets it locally.
    pub async fn logout(&mut self) -> SocialClientResult<()> {
        if let Some(session) = self.session.take() {
            self.http.logout(&session).await?;
        }
        Ok(())
    }

    /// Every post, newest first, with comments.
    ///
    /// Requires a session.
    pub async fn feed(&self) -> SocialClientResult<Feed> {
        self.http.feed(self.require_session()?).await
    }

    /// Publishes a post. Text and image are both optional.
    ///
    /// Requires a session.
    pub async fn create_post(
        &self,
        text: Option<&str>,
        image: Option<Attachment>,
    ) -> SocialClientResult<()> {
        self.http
            .create_post(self.require_session()?, text, image)
            .await
    }

    /// Adds a comment under a post.
    ///
    /// Requires a session.
    pub async fn comment(&self, post_id: i64, text: &str) -> SocialClientResult<Comment> {
        self.http
            .comment(self.require_session()?, post_id, text)
            .await
    }

    /// Public profile of a user.
    pub async fn profile(&self, username: &str) -> SocialClientResult<Profile> {
        self.http.profile(username).await
    }

    /// Updates the bio; the avatar is replaced only when `avatar` is given.
    ///
    /// Requires a session.
    pub async fn update_profile(
        &self,
        bio: &str,
        avatar: Option<Attachment>,
    ) -> SocialClientResult<()> {
        self.http
            .update_profile(self.require_session()?, bio, avatar)
            .await
    }

    /// Updates the bio and points the avatar at `avatar_url` when given.
    ///
    /// Requires a session.
    pub async fn update_account(
        &self,
        bio: &str,
        avatar_url: Option<&str>,
    ) -> SocialClientResult<()> {
        self.http
            .update_account(self.require_session()?, bio, avatar_url)
            .await
    }

    /// Users whose name contains `query`, case-insensitively.
    pub async fn search(&self, query: &str) -> SocialClientResult<SearchResult> {
        self.http.search(query).await
    }

    fn require_session(&self) -> SocialClientResult<&str> {
        self.session
            .as_deref()
            .ok_or(SocialClientError::Unauthorized)
    }
}
