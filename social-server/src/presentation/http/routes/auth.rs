use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::auth::{login, logout, register};
use crate::presentation::http::handlers::pages::{login_page, register_page};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register", get(register_page).post(register))
        .route("/login", get(login_page).post(login))
        .route("/logout", get(logout))
}
