use axum::{
    Form, Json,
    extract::{Multipart, Path, Query, State},
    response::Redirect,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::feed::PostDto;
use super::media_url;
use crate::application::profile_service::Profile;
use crate::domain::user::User;
use crate::presentation::AppState;
use crate::presentation::http::app_error::PageResult;
use crate::presentation::http::forms::{MultipartFields, ProfileForm};
use crate::presentation::http::middleware::session::AuthenticatedUser;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) username: String,
    pub(crate) avatar: Option<String>,
    pub(crate) bio: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ProfileDto {
    #[serde(flatten)]
    pub(crate) user: UserDto,
    pub(crate) posts: Vec<PostDto>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub(crate) struct SearchQuery {
    /// Substring of the username, case-insensitive.
    #[serde(default)]
    pub(crate) q: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct SearchResponseDto {
    pub(crate) query: String,
    pub(crate) users: Vec<UserDto>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ModifyAccountDto {
    #[serde(default)]
    #[validate(length(max = 4000))]
    pub(crate) bio: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub(crate) avatar_url: Option<String>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            username: user.username,
            avatar: user.avatar.as_deref().map(media_url),
            bio: user.bio,
            created_at: user.created_at,
        }
    }
}

impl From<Profile> for ProfileDto {
    fn from(profile: Profile) -> Self {
        Self {
            user: UserDto::from(profile.user),
            posts: profile.posts.into_iter().map(PostDto::from).collect(),
        }
    }
}

#[utoipa::path(
    get,
    path = "/profil/{username}",
    tag = "profiles",
    params(
        ("username" = String, Path, description = "Username")
    ),
    responses(
        (status = 200, description = "Profile found", body = ProfileDto),
        (status = 404, description = "Unknown user (plain text)"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> PageResult<Json<ProfileDto>> {
    let profile = state.profile_service.profile(&username).await?;
    Ok(Json(ProfileDto::from(profile)))
}

pub(crate) async fn edit_profile(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    multipart: Multipart,
) -> PageResult<Redirect> {
    let form = ProfileForm::try_from(MultipartFields::collect(multipart).await?)?;

    let user = state
        .profile_service
        .update_profile(&auth.username, form.bio, form.avatar)
        .await?;

    Ok(Redirect::to(&format!("/profil/{}", user.username)))
}

pub(crate) async fn modify_account(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Form(dto): Form<ModifyAccountDto>,
) -> PageResult<Redirect> {
    dto.validate()?;

    let user = state
        .profile_service
        .update_account(&auth.username, dto.bio, dto.avatar_url)
        .await?;

    Ok(Redirect::to(&format!("/profil/{}", user.username)))
}

#[utoipa::path(
    get,
    path = "/search",
    tag = "profiles",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching users, possibly none", body = SearchResponseDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> PageResult<Json<SearchResponseDto>> {
    let users = state.profile_service.search(&query.q).await?;

    Ok(Json(SearchResponseDto {
        query: query.q,
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}
