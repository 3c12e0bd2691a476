use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::data::post_repository::{NewPost, PostRepository, PostWithAvatar};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Debug, Clone)]
pub(crate) struct SqlitePostRepository {
    pool: SqlitePool,
}

impl SqlitePostRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    author: String,
    text: Option<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct FeedRow {
    id: i64,
    author: String,
    text: Option<String>,
    image: Option<String>,
    created_at: DateTime<Utc>,
    author_avatar: Option<String>,
}

#[async_trait]
impl PostRepository for SqlitePostRepository {
    async fn create_post(&self, input: NewPost) -> Result<Post, DomainError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
            INSERT INTO posts (author, text, image, created_at)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, author, text, image, created_at
            "#,
        )
        .bind(&input.author)
        .bind(&input.text)
        .bind(&input.image)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        map_row_to_post(row)
    }

    async fn exists(&self, id: i64) -> Result<bool, DomainError> {
        let found = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM posts WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        Ok(found > 0)
    }

    async fn list_with_avatars(&self) -> Result<Vec<PostWithAvatar>, DomainError> {
        let rows = sqlx::query_as::<_, FeedRow>(
            r#"
            SELECT
                p.id,
                p.author,
                p.text,
                p.image,
                p.created_at,
                u.avatar AS author_avatar
            FROM posts p
            LEFT JOIN users u ON u.username = p.author
            ORDER BY p.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter()
            .map(|row| {
                let post = Post::new(row.id, row.author, row.text, row.image, row.created_at)
                    .map_err(|err| DomainError::Unexpected(err.to_string()))?;
                Ok(PostWithAvatar {
                    post,
                    author_avatar: row.author_avatar,
                })
            })
            .collect()
    }

    async fn list_by_author(&self, author: &str) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query_as::<_, PostRow>(
            r#"
            SELECT id, author, text, image, created_at
            FROM posts
            WHERE author = ?1
            ORDER BY id DESC
            "#,
        )
        .bind(author)
        .fetch_all(&self.pool)
        .await
        .map_err(map_post_db_error)?;

        rows.into_iter().map(map_row_to_post).collect()
    }
}

fn map_row_to_post(row: PostRow) -> Result<Post, DomainError> {
    Post::new(row.id, row.author, row.text, row.image, row.created_at)
        .map_err(|err| DomainError::Unexpected(err.to_string()))
}

fn map_post_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err
        && db_err.is_foreign_key_violation()
    {
        return DomainError::NotFound("author".to_string());
    }
    DomainError::Unexpected(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::SqlitePostRepository;
    use crate::data::post_repository::{NewPost, PostRepository};
    use crate::data::repositories::sqlite::user_repository::SqliteUserRepository;
    use crate::data::user_repository::{NewUser, UserRepository};
    use crate::domain::error::DomainError;
    use crate::infrastructure::database::test_pool;

    #[tokio::test]
    async fn feed_is_newest_first_with_current_avatar() {
        let pool = test_pool().await;
        let users = SqliteUserRepository::new(pool.clone());
        let posts = SqlitePostRepository::new(pool);

        users
            .create_user(NewUser {
                username: "alice".to_string(),
                password_hash: "hash".to_string(),
                avatar: Some("alice.png".to_string()),
            })
            .await
            .expect("user insert");

        for text in ["first", "second"] {
            posts
                .create_post(NewPost {
                    author: "alice".to_string(),
                    text: Some(text.to_string()),
                    image: None,
                })
                .await
                .expect("post insert");
        }

        let feed = posts.list_with_avatars().await.expect("feed");
        let texts: Vec<_> = feed
            .iter()
            .map(|entry| entry.post.text.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(texts, vec!["second", "first"]);
        assert!(
            feed.iter()
                .all(|entry| entry.author_avatar.as_deref() == Some("alice.png"))
        );
        assert!(posts.exists(feed[0].post.id).await.expect("exists"));
        assert!(!posts.exists(999).await.expect("exists"));
    }

    #[tokio::test]
    async fn post_by_unknown_author_is_rejected() {
        let posts = SqlitePostRepository::new(test_pool().await);

        let err = posts
            .create_post(NewPost {
                author: "ghost".to_string(),
                text: Some("boo".to_string()),
                image: None,
            })
            .await
            .expect_err("foreign key must be enforced");
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
