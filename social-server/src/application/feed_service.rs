use std::collections::HashMap;

use tracing::info;

use crate::data::comment_repository::{CommentRepository, NewComment};
use crate::data::media_store::MediaStore;
use crate::data::post_repository::{NewPost, PostRepository};
use crate::domain::comment::{Comment, CreateCommentRequest};
use crate::domain::error::DomainError;
use crate::domain::media::Upload;
use crate::domain::post::{CreatePostRequest, FeedEntry, Post};

pub(crate) struct FeedService<P: PostRepository, C: CommentRepository, M: MediaStore> {
    posts: P,
    comments: C,
    media: M,
}

impl<P: PostRepository, C: CommentRepository, M: MediaStore> FeedService<P, C, M> {
    pub(crate) fn new(posts: P, comments: C, media: M) -> Self {
        Self {
            posts,
            comments,
            media,
        }
    }

    /// Every post, newest first, with its comments in insertion order.
    pub(crate) async fn feed(&self) -> Result<Vec<FeedEntry>, DomainError> {
        let posts = self.posts.list_with_avatars().await?;
        let mut comments_by_post: HashMap<i64, Vec<Comment>> = HashMap::new();
        for comment in self.comments.list_all().await? {
            comments_by_post
                .entry(comment.post_id)
                .or_default()
                .push(comment);
        }

        Ok(posts
            .into_iter()
            .map(|row| FeedEntry {
                comments: comments_by_post.remove(&row.post.id).unwrap_or_default(),
                post: row.post,
                author_avatar: row.author_avatar,
            })
            .collect())
    }

    pub(crate) async fn create_post(
        &self,
        author: &str,
        req: CreatePostRequest,
        image: Option<Upload>,
    ) -> Result<Post, DomainError> {
        let req = req.validate()?;

        let image = match image {
            Some(upload) => Some(self.media.save(upload).await?),
            None => None,
        };

        let new_post = NewPost {
            author: author.to_string(),
            text: req.text,
            image,
        };
        let post = self.posts.create_post(new_post).await?;
        info!(post_id = post.id, author = %post.author, "post created");
        Ok(post)
    }

    pub(crate) async fn add_comment(
        &self,
        author: &str,
        post_id: i64,
        req: CreateCommentRequest,
    ) -> Result<Comment, DomainError> {
        let req = req.validate()?;

        if !self.posts.exists(post_id).await? {
            return Err(DomainError::NotFound(format!("post id: {post_id}")));
        }

        let comment = self
            .comments
            .create_comment(NewComment {
                post_id,
                author: author.to_string(),
                text: req.text,
            })
            .await?;
        info!(comment_id = comment.id, post_id, author, "comment added");
        Ok(comment)
    }
}
