pub(crate) mod comment_repository;
pub(crate) mod media_store;
pub(crate) mod post_repository;
pub(crate) mod repositories;
pub(crate) mod session_store;
pub(crate) mod user_repository;
