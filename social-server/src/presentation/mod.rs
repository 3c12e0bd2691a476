use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::SqlitePool;

use crate::application::auth_service::AuthService;
use crate::application::feed_service::FeedService;
use crate::application::profile_service::ProfileService;
use crate::data::repositories::filesystem::media_store::LocalMediaStore;
use crate::data::repositories::memory::session_store::InMemorySessionStore;
use crate::data::repositories::sqlite::comment_repository::SqliteCommentRepository;
use crate::data::repositories::sqlite::post_repository::SqlitePostRepository;
use crate::data::repositories::sqlite::user_repository::SqliteUserRepository;

pub(crate) mod http;

pub(crate) type SqliteAuthService =
    AuthService<SqliteUserRepository, InMemorySessionStore, LocalMediaStore>;
pub(crate) type SqliteFeedService =
    FeedService<SqlitePostRepository, SqliteCommentRepository, LocalMediaStore>;
pub(crate) type SqliteProfileService =
    ProfileService<SqliteUserRepository, SqlitePostRepository, LocalMediaStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) auth_service: Arc<SqliteAuthService>,
    pub(crate) feed_service: Arc<SqliteFeedService>,
    pub(crate) profile_service: Arc<SqliteProfileService>,
    pub(crate) upload_dir: PathBuf,
}

impl AppState {
    pub(crate) fn new(
        auth_service: Arc<SqliteAuthService>,
        feed_service: Arc<SqliteFeedService>,
        profile_service: Arc<SqliteProfileService>,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            auth_service,
            feed_service,
            profile_service,
            upload_dir,
        }
    }

    /// Wires the services over one pool and one upload directory.
    pub(crate) fn build(pool: SqlitePool, upload_dir: &Path, session_ttl_seconds: i64) -> Self {
        let media = LocalMediaStore::new(upload_dir);

        let auth_service = AuthService::new(
            SqliteUserRepository::new(pool.clone()),
            InMemorySessionStore::new(),
            media.clone(),
            session_ttl_seconds,
        );
        let feed_service = FeedService::new(
            SqlitePostRepository::new(pool.clone()),
            SqliteCommentRepository::new(pool.clone()),
            media.clone(),
        );
        let profile_service = ProfileService::new(
            SqliteUserRepository::new(pool.clone()),
            SqlitePostRepository::new(pool),
            media.clone(),
        );

        Self::new(
            Arc::new(auth_service),
            Arc::new(feed_service),
            Arc::new(profile_service),
            media.root().to_path_buf(),
        )
    }
}
