use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::data::user_repository::{NewUser, UserCredentials, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{ProfileUpdate, User};

#[derive(Debug, Clone)]
pub(crate) struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    avatar: Option<String>,
    bio: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct UserCredentialsRow {
    id: i64,
    username: String,
    password_hash: String,
    avatar: Option<String>,
    bio: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password_hash, avatar, bio, created_at)
            VALUES (?1, ?2, ?3, '', ?4)
            RETURNING id, username, avatar, bio, created_at
            "#,
        )
        .bind(&input.username)
        .bind(&input.password_hash)
        .bind(&input.avatar)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        map_row_to_user(row)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<UserCredentials>, DomainError> {
        let row = sqlx::query_as::<_, UserCredentialsRow>(
            r#"
            SELECT
            id,
            username,
            password_hash,
            avatar,
            bio,
            created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        let Some(r) = row else {
            return Ok(None);
        };
        let user = User::new(r.id, r.username, r.avatar, r.bio, r.created_at)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(Some(UserCredentials {
            user,
            password_hash: r.password_hash,
        }))
    }

    async fn get_user(&self, username: &str) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, avatar, bio, created_at
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(map_row_to_user).transpose()
    }

    async fn update_profile(
        &self,
        username: &str,
        update: ProfileUpdate,
    ) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET bio = ?2,
                avatar = COALESCE(?3, avatar)
            WHERE username = ?1
            RETURNING id, username, avatar, bio, created_at
            "#,
        )
        .bind(username)
        .bind(&update.bio)
        .bind(&update.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        row.map(map_row_to_user).transpose()
    }

    async fn search_by_username(&self, fragment: &str) -> Result<Vec<User>, DomainError> {
        let pattern = format!("%{}%", escape_like(fragment));

        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, avatar, bio, created_at
            FROM users
            WHERE username LIKE ?1 ESCAPE '\'
            ORDER BY username
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(map_user_db_error)?;

        rows.into_iter().map(map_row_to_user).collect()
    }
}

fn map_row_to_user(row: UserRow) -> Result<User, DomainError> {
    User::new(row.id, row.username, row.avatar, row.bio, row.created_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

/// `%` and `_` in the search text match literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn map_user_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_unique_violation()
    {
        return DomainError::AlreadyExists("username".to_string());
    }
    DomainError::Unexpected(err.to_string())
}
