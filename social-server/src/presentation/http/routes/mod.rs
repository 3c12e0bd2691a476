use axum::Router;
use axum::middleware;

use crate::presentation::AppState;
use crate::presentation::http::middleware::session::session_middleware;

pub(crate) mod auth;
pub(crate) mod posts;
pub(crate) mod profiles;

/// Every route sees the session middleware; handlers pick whether they need a
/// logged-in caller through the `AuthenticatedUser` extractor.
pub(crate) fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(posts::router())
        .merge(profiles::router())
        .layer(middleware::from_fn_with_state(state, session_middleware))
}
