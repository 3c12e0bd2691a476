use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::media::Upload;

#[async_trait]
pub(crate) trait MediaStore: Send + Sync {
    /// Writes the upload and returns the stored file name.
    ///
    /// Files are keyed by their original name; a second upload with the same
    /// name replaces the first.
    async fn save(&self, upload: Upload) -> Result<String, DomainError>;
}
