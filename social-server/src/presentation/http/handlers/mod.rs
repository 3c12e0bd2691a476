pub(crate) mod auth;
pub(crate) mod comments;
pub(crate) mod feed;
pub(crate) mod pages;
pub(crate) mod profiles;

/// Public URL for a stored media reference.
///
/// Uploaded files are stored by name and served under `/uploads`; avatars set
/// through `/modify_account` are already URLs and pass through unchanged.
pub(crate) fn media_url(stored: &str) -> String {
    if stored.starts_with("http://") || stored.starts_with("https://") || stored.starts_with('/') {
        return stored.to_string();
    }
    format!("/uploads/{stored}")
}

#[cfg(test)]
mod tests {
    use super::media_url;

    #[test]
    fn media_url_prefixes_stored_names_only() {
        assert_eq!(media_url("cat.png"), "/uploads/cat.png");
        assert_eq!(media_url("https://cdn.test/a.png"), "https://cdn.test/a.png");
        assert_eq!(media_url("/static/default.png"), "/static/default.png");
    }
}
