use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use chrono::{Duration, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::data::media_store::MediaStore;
use crate::data::session_store::SessionStore;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::media::Upload;
use crate::domain::session::SessionData;
use crate::domain::user::{LoginRequest, RegisterRequest, User};

#[derive(Debug, Clone)]
pub(crate) struct AuthResult {
    pub(crate) user: User,
    pub(crate) session_id: String,
}

pub(crate) struct AuthService<R: UserRepository, S: SessionStore, M: MediaStore> {
    repo: R,
    sessions: S,
    media: M,
    session_ttl: Duration,
}

impl<R: UserRepository, S: SessionStore, M: MediaStore> AuthService<R, S, M> {
    const DUMMY_PASSWORD_HASH: &'static str = "$argon2id$v=19$m=19456,t=2,p=1$MDEyMzQ1Njc4OWFiY2RlZg$gwN6hT1sNdk9kI95f7n2Gl3fL0qRmBf2Ffkj2r90/0M";
    const DEFAULT_TTL_SECONDS: i64 = 24 * 60 * 60;

    pub(crate) fn new(repo: R, sessions: S, media: M, session_ttl_seconds: i64) -> Self {
        let session_ttl_seconds = if session_ttl_seconds > 0 {
            session_ttl_seconds
        } else {
            Self::DEFAULT_TTL_SECONDS
        };

        Self {
            repo,
            sessions,
            media,
            session_ttl: Duration::seconds(session_ttl_seconds),
        }
    }

    /// Creates the account and logs the new user in.
    pub(crate) async fn register(
        &self,
        req: RegisterRequest,
        avatar: Option<Upload>,
    ) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        // The unique constraint still decides; this only avoids writing an avatar for nothing.
        if self.repo.find_by_username(&req.username).await?.is_some() {
            return Err(DomainError::AlreadyExists("username".to_string()));
        }

        let password_hash = self.hash_password(&req.password)?;
        let avatar = match avatar {
            Some(upload) => Some(self.media.save(upload).await?),
            None => None,
        };

        let new_user = Self::into_new_user(req, password_hash, avatar);
        let user = self.repo.create_user(new_user).await?;
        info!(username = %user.username, "user registered");

        let session_id = self.open_session(&user.username).await?;
        Ok(AuthResult { user, session_id })
    }

    pub(crate) async fn login(&self, req: LoginRequest) -> Result<AuthResult, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.repo.find_by_username(&req.username).await? {
            Some(user_creds) => user_creds,
            None => {
                // same amount of hashing work whether or not the user exists
                match self.verify_password(&req.password, Self::DUMMY_PASSWORD_HASH) {
                    Ok(()) | Err(DomainError::InvalidCredentials) => {}
                    Err(err) => return Err(err),
                }
                warn!(username = %req.username, "login failed");
                return Err(DomainError::InvalidCredentials);
            }
        };

        if let Err(err) = self.verify_password(&req.password, &user_creds.password_hash) {
            warn!(username = %req.username, "login failed");
            return Err(err);
        }

        let session_id = self.open_session(&user_creds.user.username).await?;
        info!(username = %user_creds.user.username, "user logged in");

        Ok(AuthResult {
            user: user_creds.user,
            session_id,
        })
    }

    pub(crate) async fn logout(&self, session_id: &str) -> Result<(), DomainError> {
        self.sessions.clear(session_id).await
    }

    /// Username bound to a live session; expired sessions are dropped.
    pub(crate) async fn resolve_session(
        &self,
        session_id: &str,
    ) -> Result<Option<String>, DomainError> {
        let Some(session) = self.sessions.get(session_id).await? else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            self.sessions.clear(session_id).await?;
            return Ok(None);
        }
        Ok(Some(session.username))
    }

    async fn open_session(&self, username: &str) -> Result<String, DomainError> {
        let session_id = Uuid::new_v4().to_string();
        let data = SessionData {
            username: username.to_string(),
            expires_at: Utc::now() + self.session_ttl,
        };
        self.sessions.set(&session_id, data).await?;
        Ok(session_id)
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Self::argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<(), DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Self::argon2()?
            .verify_password(raw_password.as_bytes(), &parsed_hash)
            .map_err(|err| match err {
                PasswordHashError::Password => DomainError::InvalidCredentials,
                _ => DomainError::Unexpected(err.to_string()),
            })?;

        Ok(())
    }

    fn into_new_user(req: RegisterRequest, password_hash: String, avatar: Option<String>) -> NewUser {
        NewUser {
            username: req.username,
            password_hash,
            avatar,
        }
    }

    fn argon2() -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(19 * 1024, 2, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use super::AuthService;
    use crate::data::media_store::MediaStore;
    use crate::data::repositories::memory::session_store::InMemorySessionStore;
    use crate::data::session_store::SessionStore;
    use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
    use crate::domain::error::DomainError;
    use crate::domain::media::Upload;
    use crate::domain::session::SessionData;
    use crate::domain::user::{LoginRequest, ProfileUpdate, RegisterRequest, User};

    #[derive(Clone)]
    struct FakeUserRepo {
        created_input: Arc<Mutex<Option<NewUser>>>,
        login_credentials: Arc<Mutex<Option<UserCredentials>>>,
    }

    impl FakeUserRepo {
        fn new() -> Self {
            Self {
                created_input: Arc::new(Mutex::new(None)),
                login_credentials: Arc::new(Mutex::new(None)),
            }
        }

        fn set_login_credentials(&self, creds: Option<UserCredentials>) {
            *self
                .login_credentials
                .lock()
                .expect("login credentials mutex poisoned") = creds;
        }

        fn take_created_input(&self) -> Option<NewUser> {
            self.created_input
                .lock()
                .expect("created input mutex poisoned")
                .take()
        }
    }

    #[async_trait]
    impl UserRepository for FakeUserRepo {
        async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
            let user = User::new(1, input.username.clone(), input.avatar.clone(), "", Utc::now())?;
            *self
                .created_input
                .lock()
                .expect("created input mutex poisoned") = Some(input);
            Ok(user)
        }

        async fn find_by_username(
            &self,
            _username: &str,
        ) -> Result<Option<UserCredentials>, DomainError> {
            Ok(self
                .login_credentials
                .lock()
                .expect("login credentials mutex poisoned")
                .clone())
        }

        async fn get_user(&self, _username: &str) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn update_profile(
            &self,
            _username: &str,
            _update: ProfileUpdate,
        ) -> Result<Option<User>, DomainError> {
            Ok(None)
        }

        async fn search_by_username(&self, _fragment: &str) -> Result<Vec<User>, DomainError> {
            Ok(Vec::new())
        }
    }

    #[derive(Clone, Default)]
    struct FakeMediaStore {
        saved: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl MediaStore for FakeMediaStore {
        async fn save(&self, upload: Upload) -> Result<String, DomainError> {
            let name = upload.stored_name()?;
            self.saved
                .lock()
                .expect("saved mutex poisoned")
                .push(name.clone());
            Ok(name)
        }
    }

    type TestService = AuthService<FakeUserRepo, InMemorySessionStore, FakeMediaStore>;

    fn service(repo: FakeUserRepo, media: FakeMediaStore) -> (TestService, InMemorySessionStore) {
        let sessions = InMemorySessionStore::new();
        (
            AuthService::new(repo, sessions.clone(), media, 3600),
            sessions,
        )
    }

    #[tokio::test]
    async fn register_creates_user_and_opens_session() {
        let repo = FakeUserRepo::new();
        let media = FakeMediaStore::default();
        let (service, sessions) = service(repo.clone(), media.clone());

        let req = RegisterRequest {
            username: "  valid_user  ".to_string(),
            password: "very-secure-password".to_string(),
        };
        let avatar = Upload {
            file_name: "me.png".to_string(),
            bytes: vec![1, 2, 3],
        };

        let result = service
            .register(req, Some(avatar))
            .await
            .expect("register must succeed");

        assert_eq!(result.user.username, "valid_user");
        assert_eq!(result.user.avatar.as_deref(), Some("me.png"));
        assert_eq!(
            sessions
                .get(&result.session_id)
                .await
                .expect("get")
                .map(|s| s.username),
            Some("valid_user".to_string())
        );

        let created = repo
            .take_created_input()
            .expect("create_user must be called");
        assert_eq!(created.username, "valid_user");
        assert!(created.password_hash.starts_with("$argon2id$"));
        assert_ne!(created.password_hash, "very-secure-password");
        assert_eq!(
            media.saved.lock().expect("saved mutex poisoned").clone(),
            vec!["me.png".to_string()]
        );
    }

    #[tokio::test]
    async fn register_rejects_taken_username_without_storing_avatar() {
        let repo = FakeUserRepo::new();
        let media = FakeMediaStore::default();
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user("valid_user"),
            password_hash: "irrelevant".to_string(),
        }));
        let (service, _) = service(repo.clone(), media.clone());

        let req = RegisterRequest {
            username: "valid_user".to_string(),
            password: "very-secure-password".to_string(),
        };
        let avatar = Upload {
            file_name: "me.png".to_string(),
            bytes: vec![1],
        };

        let err = service
            .register(req, Some(avatar))
            .await
            .expect_err("register must fail");
        assert!(matches!(err, DomainError::AlreadyExists(_)));
        assert!(repo.take_created_input().is_none());
        assert!(media.saved.lock().expect("saved mutex poisoned").is_empty());
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_missing_user() {
        let repo = FakeUserRepo::new();
        repo.set_login_credentials(None);
        let (service, _) = service(repo, FakeMediaStore::default());

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "some-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_returns_invalid_credentials_for_wrong_password() {
        let repo = FakeUserRepo::new();
        let (service, _) = service(repo.clone(), FakeMediaStore::default());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user("valid_user"),
            password_hash: hash,
        }));

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "wrong-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_and_logout_drive_the_session_lifecycle() {
        let repo = FakeUserRepo::new();
        let (service, _) = service(repo.clone(), FakeMediaStore::default());

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user("valid_user"),
            password_hash: hash,
        }));

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "correct-password".to_string(),
        };

        let result = service.login(req).await.expect("login must succeed");
        assert_eq!(
            service
                .resolve_session(&result.session_id)
                .await
                .expect("resolve"),
            Some("valid_user".to_string())
        );

        service.logout(&result.session_id).await.expect("logout");
        assert_eq!(
            service
                .resolve_session(&result.session_id)
                .await
                .expect("resolve"),
            None
        );
    }

    #[tokio::test]
    async fn expired_session_resolves_to_anonymous_and_is_cleared() {
        let (service, sessions) = service(FakeUserRepo::new(), FakeMediaStore::default());
        sessions
            .set(
                "stale",
                SessionData {
                    username: "valid_user".to_string(),
                    expires_at: Utc::now() - Duration::seconds(1),
                },
            )
            .await
            .expect("set");

        assert_eq!(service.resolve_session("stale").await.expect("resolve"), None);
        assert_eq!(sessions.get("stale").await.expect("get"), None);
    }

    #[tokio::test]
    async fn login_drops_expired_sessions_that_were_never_looked_up() {
        let repo = FakeUserRepo::new();
        let (service, sessions) = service(repo.clone(), FakeMediaStore::default());
        sessions
            .set(
                "abandoned",
                SessionData {
                    username: "valid_user".to_string(),
                    expires_at: Utc::now() - Duration::seconds(1),
                },
            )
            .await
            .expect("set");

        let hash = service
            .hash_password("correct-password")
            .expect("hash must be created");
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user("valid_user"),
            password_hash: hash,
        }));
        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "correct-password".to_string(),
        };
        let result = service.login(req).await.expect("login must succeed");

        assert_eq!(sessions.get("abandoned").await.expect("get"), None);
        assert!(sessions.get(&result.session_id).await.expect("get").is_some());
    }

    #[tokio::test]
    async fn login_surfaces_corrupt_password_hash_as_unexpected() {
        let repo = FakeUserRepo::new();
        repo.set_login_credentials(Some(UserCredentials {
            user: sample_user("valid_user"),
            password_hash: "not-a-phc-string".to_string(),
        }));
        let (service, _) = service(repo, FakeMediaStore::default());

        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: "some-password".to_string(),
        };

        let err = service.login(req).await.expect_err("login must fail");
        assert!(matches!(err, DomainError::Unexpected(_)));
    }

    fn sample_user(username: &str) -> User {
        User::new(1, username.to_string(), None, "", Utc::now()).expect("sample user must be valid")
    }
}
