use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::comment::{Comment, CreateCommentRequest};
use crate::domain::error::DomainError;
use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, AppResult};
use crate::presentation::http::middleware::session::AuthenticatedUser;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct CreateCommentDto {
    /// Missing or `null` text counts as empty.
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct CommentDto {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author: String,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl From<Comment> for CommentDto {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author: comment.author,
            text: comment.text,
            created_at: comment.created_at,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/comment/{post_id}",
    tag = "comments",
    params(
        ("post_id" = i64, Path, description = "Post id")
    ),
    request_body = CreateCommentDto,
    responses(
        (status = 200, description = "Comment created", body = CommentDto),
        (status = 400, description = "Empty or oversized comment"),
        (status = 403, description = "No session"),
        (status = 404, description = "Post not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn create_comment(
    State(state): State<AppState>,
    auth: Option<AuthenticatedUser>,
    Path(post_id): Path<i64>,
    payload: Result<Json<CreateCommentDto>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CommentDto>)> {
    // JSON callers get a status code, not a redirect to the login form
    let Some(auth) = auth else {
        return Err(DomainError::Forbidden.into());
    };
    let Json(dto) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    dto.validate()?;

    let req = CreateCommentRequest {
        text: dto.text.unwrap_or_default(),
    };
    let comment = state
        .feed_service
        .add_comment(&auth.username, post_id, req)
        .await?;

    Ok((StatusCode::OK, Json(CommentDto::from(comment))))
}
