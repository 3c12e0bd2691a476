pub(crate) mod comment;
pub(crate) mod error;
pub(crate) mod media;
pub(crate) mod post;
pub(crate) mod session;
pub(crate) mod user;
