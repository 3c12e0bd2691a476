use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by `social-client`.
pub enum SocialClientError {
    /// Transport failure reported by `reqwest`.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// No session, an expired one, or wrong credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// The requested user or post does not exist.
    #[error("not found")]
    NotFound,

    /// The username is already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The server rejected the input, or answered in an unexpected way.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Result of `social-client` operations.
pub type SocialClientResult<T> = Result<T, SocialClientError>;

impl SocialClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                Self::Unauthorized
            }
            reqwest::StatusCode::NOT_FOUND => Self::NotFound,
            reqwest::StatusCode::CONFLICT => {
                Self::Conflict(message.unwrap_or_else(|| "already exists".to_string()))
            }
            _ => {
                let message = message.unwrap_or_else(|| format!("http status {status}"));
                Self::InvalidRequest(message)
            }
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::SocialClientError;

    #[test]
    fn statuses_map_to_variants() {
        assert!(matches!(
            SocialClientError::from_http_status(StatusCode::FORBIDDEN, None),
            SocialClientError::Unauthorized
        ));
        assert!(matches!(
            SocialClientError::from_http_status(StatusCode::NOT_FOUND, None),
            SocialClientError::NotFound
        ));
        assert!(matches!(
            SocialClientError::from_http_status(
                StatusCode::CONFLICT,
                Some("resource already exists: username".to_string())
            ),
            SocialClientError::Conflict(msg) if msg.contains("username")
        ));
        assert!(matches!(
            SocialClientError::from_http_status(StatusCode::BAD_REQUEST, None),
            SocialClientError::InvalidRequest(msg) if msg.contains("400")
        ));
    }
}
