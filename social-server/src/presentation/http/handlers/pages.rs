use axum::response::Html;

use crate::presentation::http::middleware::session::AuthenticatedUser;

const REGISTER_PAGE: &str = include_str!("../../../../assets/register.html");
const LOGIN_PAGE: &str = include_str!("../../../../assets/login.html");
const POST_PAGE: &str = include_str!("../../../../assets/post.html");
const EDIT_PROFILE_PAGE: &str = include_str!("../../../../assets/edit_profile.html");
const MODIFY_ACCOUNT_PAGE: &str = include_str!("../../../../assets/modify_account.html");
const REC_PAGE: &str = include_str!("../../../../assets/rec.html");

pub(crate) async fn register_page() -> Html<&'static str> {
    Html(REGISTER_PAGE)
}

pub(crate) async fn login_page() -> Html<&'static str> {
    Html(LOGIN_PAGE)
}

pub(crate) async fn post_page(_auth: AuthenticatedUser) -> Html<&'static str> {
    Html(POST_PAGE)
}

pub(crate) async fn edit_profile_page(_auth: AuthenticatedUser) -> Html<&'static str> {
    Html(EDIT_PROFILE_PAGE)
}

pub(crate) async fn modify_account_page(_auth: AuthenticatedUser) -> Html<&'static str> {
    Html(MODIFY_ACCOUNT_PAGE)
}

pub(crate) async fn rec_page() -> Html<&'static str> {
    Html(REC_PAGE)
}
