use axum::{Router, routing::get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::pages::{edit_profile_page, modify_account_page, rec_page};
use crate::presentation::http::handlers::profiles::{edit_profile, modify_account, profile, search};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/profil/{username}", get(profile))
        .route("/modifier-profil", get(edit_profile_page).post(edit_profile))
        .route("/modify_account", get(modify_account_page).post(modify_account))
        .route("/search", get(search))
        .route("/rec", get(rec_page))
}
