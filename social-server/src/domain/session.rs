use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SessionData {
    pub(crate) username: String,
    pub(crate) expires_at: DateTime<Utc>,
}

impl SessionData {
    pub(crate) fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
