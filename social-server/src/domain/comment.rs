use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::DomainError;

pub(crate) const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Comment {
    pub(crate) id: i64,
    pub(crate) post_id: i64,
    pub(crate) author: String,
    pub(crate) text: String,
    pub(crate) created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct CreateCommentRequest {
    pub(crate) text: String,
}

impl CreateCommentRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(DomainError::validation("text", "comment cannot be empty"));
        }
        if text.chars().count() > MAX_COMMENT_CHARS {
            return Err(DomainError::validation("text", "must be at most 2000 chars"));
        }
        Ok(Self {
            text: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CreateCommentRequest;
    use crate::domain::error::DomainError;

    #[test]
    fn empty_comment_is_rejected() {
        for text in ["", "   ", "\n\t"] {
            let err = CreateCommentRequest {
                text: text.to_string(),
            }
            .validate()
            .expect_err("blank comment must fail");
            assert!(matches!(err, DomainError::Validation { field: "text", .. }));
        }
    }

    #[test]
    fn comment_text_is_trimmed() {
        let req = CreateCommentRequest {
            text: "  nice  ".to_string(),
        }
        .validate()
        .expect("must be valid");
        assert_eq!(req.text, "nice");
    }
}
