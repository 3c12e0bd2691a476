use axum::Router;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::comments::create_comment;
use crate::presentation::http::handlers::feed::{create_post, index};
use crate::presentation::http::handlers::pages::post_page;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/post", get(post_page).post(create_post))
        .route("/api/comment/{post_id}", post(create_comment))
}
