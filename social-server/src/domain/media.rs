use std::path::Path;

use super::error::DomainError;

/// A file received from a form, before it is written to the upload directory.
#[derive(Debug, Clone)]
pub(crate) struct Upload {
    pub(crate) file_name: String,
    pub(crate) bytes: Vec<u8>,
}

impl Upload {
    /// Browsers send an empty file part when nothing was selected.
    pub(crate) fn non_empty(file_name: Option<String>, bytes: Vec<u8>) -> Option<Self> {
        let file_name = file_name.filter(|name| !name.trim().is_empty())?;
        if bytes.is_empty() {
            return None;
        }
        Some(Self { file_name, bytes })
    }

    /// Uploads are keyed by their original name, without any directory part.
    pub(crate) fn stored_name(&self) -> Result<String, DomainError> {
        sanitize_file_name(&self.file_name)
    }
}

pub(crate) fn sanitize_file_name(raw: &str) -> Result<String, DomainError> {
    // Windows browsers may send the full client path.
    let last_segment = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();

    let name = Path::new(last_segment)
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.starts_with('.'))
        .ok_or(DomainError::validation("file", "invalid file name"))?;

    if name.len() > 255 || name.chars().any(char::is_control) {
        return Err(DomainError::validation("file", "invalid file name"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Upload, sanitize_file_name};

    #[test]
    fn empty_part_is_not_an_upload() {
        assert!(Upload::non_empty(Some(String::new()), vec![1, 2]).is_none());
        assert!(Upload::non_empty(Some("a.png".to_string()), Vec::new()).is_none());
        assert!(Upload::non_empty(None, vec![1]).is_none());
        assert!(Upload::non_empty(Some("a.png".to_string()), vec![1]).is_some());
    }

    #[test]
    fn directory_parts_are_stripped() {
        assert_eq!(sanitize_file_name("cat.png").expect("ok"), "cat.png");
        assert_eq!(sanitize_file_name("../../etc/passwd").expect("ok"), "passwd");
        assert_eq!(
            sanitize_file_name("C:\\Users\\bob\\photo.jpg").expect("ok"),
            "photo.jpg"
        );
    }

    #[test]
    fn hidden_and_empty_names_are_rejected() {
        assert!(sanitize_file_name("..").is_err());
        assert!(sanitize_file_name(".env").is_err());
        assert!(sanitize_file_name("dir/").is_err());
    }
}
