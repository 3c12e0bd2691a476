use axum::{
    Json,
    extract::{Multipart, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::comments::CommentDto;
use super::media_url;
use crate::domain::post::{CreatePostRequest, FeedEntry, Post};
use crate::presentation::AppState;
use crate::presentation::http::app_error::PageResult;
use crate::presentation::http::forms::{MultipartFields, PostForm};
use crate::presentation::http::middleware::session::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct PostDto {
    pub(crate) id: i64,
    pub(crate) author: String,
    pub(crate) text: Option<String>,
    /// URL of the attached image, if any.
    pub(crate) image: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FeedEntryDto {
    #[serde(flatten)]
    pub(crate) post: PostDto,
    /// The author's avatar at the time of the request.
    pub(crate) author_avatar: Option<String>,
    pub(crate) comments: Vec<CommentDto>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct FeedResponseDto {
    pub(crate) viewer: String,
    pub(crate) posts: Vec<FeedEntryDto>,
}

impl From<Post> for PostDto {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            text: post.text,
            image: post.image.as_deref().map(media_url),
            created_at: post.created_at,
        }
    }
}

impl From<FeedEntry> for FeedEntryDto {
    fn from(entry: FeedEntry) -> Self {
        Self {
            post: PostDto::from(entry.post),
            author_avatar: entry.author_avatar.as_deref().map(media_url),
            comments: entry.comments.into_iter().map(CommentDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "feed",
    responses(
        (status = 200, description = "All posts, newest first", body = FeedResponseDto),
        (status = 303, description = "No session, redirect to /login"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn index(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> PageResult<Json<FeedResponseDto>> {
    let feed = state.feed_service.feed().await?;

    Ok(Json(FeedResponseDto {
        viewer: auth.username,
        posts: feed.into_iter().map(FeedEntryDto::from).collect(),
    }))
}

pub(crate) async fn create_post(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    multipart: Multipart,
) -> PageResult<Redirect> {
    let form = PostForm::from(MultipartFields::collect(multipart).await?);

    let req = CreatePostRequest { text: form.text };
    state
        .feed_service
        .create_post(&auth.username, req, form.image)
        .await?;

    Ok(Redirect::to("/"))
}
