use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub(crate) const MAX_BIO_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_register_username(&self.username)?;
        let password_len = self.password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(DomainError::validation("password", "must be 8..128 chars"));
        }
        Ok(Self {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = self.username.trim();
        if username.is_empty() || username.len() > 64 {
            return Err(DomainError::validation("username", "must be 1..64 chars"));
        }

        if self.password.is_empty() {
            return Err(DomainError::validation("password", "must not be empty"));
        }
        Ok(Self {
            username: username.to_string(),
            password: self.password,
        })
    }
}

/// New bio plus the avatar reference that should replace the current one.
///
/// `avatar: None` keeps whatever avatar the user already has.
#[derive(Debug, Clone, Default)]
pub(crate) struct ProfileUpdate {
    pub(crate) bio: String,
    pub(crate) avatar: Option<String>,
}

impl ProfileUpdate {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            bio: normalize_bio(&self.bio)?,
            avatar: self.avatar,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) avatar: Option<String>,
    pub(crate) bio: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        avatar: Option<String>,
        bio: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        let username = username.into();
        if username.trim().is_empty() {
            return Err(DomainError::validation("username", "must not be empty"));
        }

        Ok(Self {
            id,
            username,
            avatar: avatar.filter(|value| !value.trim().is_empty()),
            bio: bio.into(),
            created_at,
        })
    }
}

fn normalize_register_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.chars().count() < 3 || username.chars().count() > 64 {
        return Err(DomainError::validation("username", "must be 3..64 chars"));
    }
    if username
        .chars()
        .any(|ch| ch.is_whitespace() || ch == '/' || ch == '\\')
    {
        return Err(DomainError::validation(
            "username",
            "must not contain whitespace or slashes",
        ));
    }
    Ok(username.to_string())
}

fn normalize_bio(bio: &str) -> Result<String, DomainError> {
    let bio = bio.trim();
    if bio.chars().count() > MAX_BIO_CHARS {
        return Err(DomainError::validation("bio", "must be at most 1000 chars"));
    }
    Ok(bio.to_string())
}

/// Blank input means "keep the current avatar".
pub(crate) fn normalize_avatar_url(raw: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(url) = raw.map(str::trim).filter(|url| !url.is_empty()) else {
        return Ok(None);
    };

    let allowed = url.starts_with("http://") || url.starts_with("https://") || url.starts_with('/');
    if !allowed || url.len() > 2048 {
        return Err(DomainError::validation(
            "avatar_url",
            "must be an http(s) URL or an absolute path",
        ));
    }
    Ok(Some(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{
        LoginRequest, ProfileUpdate, RegisterRequest, User, normalize_avatar_url,
        normalize_register_username,
    };
    use crate::domain::error::DomainError;
    use chrono::Utc;

    #[test]
    fn user_new_rejects_non_positive_id() {
        let result = User::new(0, "valid_user", None, "", Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn user_new_drops_blank_avatar() {
        let user = User::new(1, "valid_user", Some("  ".to_string()), "", Utc::now())
            .expect("must be valid");
        assert!(user.avatar.is_none());
    }

    #[test]
    fn register_username_rules_are_applied() {
        assert!(normalize_register_username("ab").is_err());
        assert!(normalize_register_username("bad name").is_err());
        assert!(normalize_register_username("../etc").is_err());
        assert_eq!(
            normalize_register_username("  valid_user ").expect("must be valid"),
            "valid_user"
        );
    }

    #[test]
    fn register_password_length_is_checked() {
        let short = RegisterRequest {
            username: "valid_user".to_string(),
            password: "short".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            username: " valid_user ".to_string(),
            password: "very-secure-password".to_string(),
        };
        let validated = ok.validate().expect("must be valid");
        assert_eq!(validated.username, "valid_user");
    }

    #[test]
    fn login_request_rejects_empty_password() {
        let req = LoginRequest {
            username: "valid_user".to_string(),
            password: String::new(),
        };
        match req.validate() {
            Err(DomainError::Validation { field, .. }) => assert_eq!(field, "password"),
            other => panic!("expected password validation error, got {other:?}"),
        }
    }

    #[test]
    fn profile_update_trims_bio_and_rejects_long_bio() {
        let update = ProfileUpdate {
            bio: "  hello  ".to_string(),
            avatar: None,
        }
        .validate()
        .expect("must be valid");
        assert_eq!(update.bio, "hello");

        let long = ProfileUpdate {
            bio: "x".repeat(1001),
            avatar: None,
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn avatar_url_blank_means_keep() {
        assert_eq!(normalize_avatar_url(None).expect("ok"), None);
        assert_eq!(normalize_avatar_url(Some("   ")).expect("ok"), None);
        assert_eq!(
            normalize_avatar_url(Some(" https://cdn.example.com/a.png ")).expect("ok"),
            Some("https://cdn.example.com/a.png".to_string())
        );
        assert!(normalize_avatar_url(Some("javascript:alert(1)")).is_err());
    }
}
