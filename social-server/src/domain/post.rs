use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::comment::Comment;
use super::error::DomainError;

pub(crate) const MAX_POST_TEXT_CHARS: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Post {
    pub(crate) id: i64,
    pub(crate) author: String,
    pub(crate) text: Option<String>,
    pub(crate) image: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
}

/// A post as shown in the feed: the author's current avatar is joined at
/// read time and comments are in insertion order.
#[derive(Debug, Clone)]
pub(crate) struct FeedEntry {
    pub(crate) post: Post,
    pub(crate) author_avatar: Option<String>,
    pub(crate) comments: Vec<Comment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct CreatePostRequest {
    pub(crate) text: Option<String>,
}

impl CreatePostRequest {
    /// Both text and image may be missing; only the text length is bounded.
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            text: normalize_text(self.text)?,
        })
    }
}

impl Post {
    pub(crate) fn new(
        id: i64,
        author: impl Into<String>,
        text: Option<String>,
        image: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::validation("id", "must be > 0"));
        }
        let author = author.into();
        if author.trim().is_empty() {
            return Err(DomainError::validation("author", "must not be empty"));
        }

        Ok(Self {
            id,
            author,
            text,
            image,
            created_at,
        })
    }
}

fn normalize_text(text: Option<String>) -> Result<Option<String>, DomainError> {
    let Some(text) = text else {
        return Ok(None);
    };
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    if text.chars().count() > MAX_POST_TEXT_CHARS {
        return Err(DomainError::validation("text", "must be at most 10000 chars"));
    }
    Ok(Some(text.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::{CreatePostRequest, DomainError, Post};

    #[test]
    fn create_post_request_trims_text() {
        let req = CreatePostRequest {
            text: Some("  hello  ".to_string()),
        };

        let validated = req.validate().expect("must validate");
        assert_eq!(validated.text.as_deref(), Some("hello"));
    }

    #[test]
    fn create_post_request_turns_blank_text_into_none() {
        let req = CreatePostRequest {
            text: Some("   ".to_string()),
        };

        let validated = req.validate().expect("blank text is allowed");
        assert!(validated.text.is_none());
    }

    #[test]
    fn create_post_request_rejects_oversized_text() {
        let req = CreatePostRequest {
            text: Some("a".repeat(10_001)),
        };

        let err = req.validate().expect_err("text must be rejected");
        assert_validation_field(err, "text");
    }

    #[test]
    fn post_new_rejects_non_positive_id() {
        let err = Post::new(0, "alice", None, None, Utc::now()).expect_err("id must be > 0");
        assert_validation_field(err, "id");
    }

    #[test]
    fn post_new_rejects_blank_author() {
        let err = Post::new(1, "  ", Some("text".to_string()), None, Utc::now())
            .expect_err("author must be set");
        assert_validation_field(err, "author");
    }

    fn assert_validation_field(err: DomainError, expected_field: &'static str) {
        match err {
            DomainError::Validation { field, .. } => assert_eq!(field, expected_field),
            _ => panic!("expected DomainError::Validation"),
        }
    }
}
