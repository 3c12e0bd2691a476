use axum::{
    Form,
    extract::{Multipart, State},
    response::Redirect,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use validator::Validate;

use crate::domain::user::{LoginRequest, RegisterRequest};
use crate::presentation::AppState;
use crate::presentation::http::app_error::PageResult;
use crate::presentation::http::forms::{MultipartFields, RegisterForm};
use crate::presentation::http::middleware::session::{
    SESSION_COOKIE, removal_cookie, session_cookie,
};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct LoginDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub(crate) password: String,
}

/// Creates the account, logs the user in and sends them to the feed.
pub(crate) async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> PageResult<(CookieJar, Redirect)> {
    let form = RegisterForm::try_from(MultipartFields::collect(multipart).await?)?;

    let req = RegisterRequest {
        username: form.username,
        password: form.password,
    };
    let result = state.auth_service.register(req, form.avatar).await?;

    Ok((jar.add(session_cookie(result.session_id)), Redirect::to("/")))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(dto): Form<LoginDto>,
) -> PageResult<(CookieJar, Redirect)> {
    dto.validate()?;

    let req = LoginRequest {
        username: dto.username,
        password: dto.password,
    };
    let result = state.auth_service.login(req).await?;

    Ok((jar.add(session_cookie(result.session_id)), Redirect::to("/")))
}

/// Anonymous callers are simply sent back to the login form.
pub(crate) async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> PageResult<(CookieJar, Redirect)> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.auth_service.logout(cookie.value()).await?;
    }

    Ok((jar.remove(removal_cookie()), Redirect::to("/login")))
}
