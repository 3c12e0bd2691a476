use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::warn;

use crate::presentation::AppState;
use crate::presentation::http::app_error::{AppError, PageError};

pub(crate) const SESSION_COOKIE: &str = "session_id";

/// The caller's identity, resolved from the session cookie.
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) username: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(PageError(AppError::LoginRequired))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthenticatedUser>().cloned())
    }
}

/// Resolves the session cookie for every request. Anonymous requests pass
/// through untouched; handlers decide whether that is acceptable.
pub(crate) async fn session_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(session_id) = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
    {
        match state.auth_service.resolve_session(&session_id).await {
            Ok(Some(username)) => {
                request
                    .extensions_mut()
                    .insert(AuthenticatedUser { username });
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "session lookup failed"),
        }
    }

    next.run(request).await
}

pub(crate) fn session_cookie(session_id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

pub(crate) fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}
