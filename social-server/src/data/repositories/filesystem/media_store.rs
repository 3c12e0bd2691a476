use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::data::media_store::MediaStore;
use crate::domain::error::DomainError;
use crate::domain::media::Upload;

#[derive(Debug, Clone)]
pub(crate) struct LocalMediaStore {
    root: PathBuf,
}

impl LocalMediaStore {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, upload: Upload) -> Result<String, DomainError> {
        let name = upload.stored_name()?;
        let path = self.root.join(&name);

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| DomainError::Storage(err.to_string()))?;
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|err| DomainError::Storage(err.to_string()))?;

        debug!(path = %path.display(), size = upload.bytes.len(), "upload stored");
        Ok(name)
    }
}
