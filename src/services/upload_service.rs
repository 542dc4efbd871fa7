use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Prefix of stored picture paths; also the URL the upload directory is served under.
pub const UPLOAD_URL_PREFIX: &str = "uploads";

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file selected")]
    Empty,
    #[error("Unsupported file type")]
    UnsupportedType,
    #[error("Upload storage failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes profile pictures into a directory and cleans up replaced ones.
#[derive(Debug, Clone)]
pub struct UploadService {
    root: PathBuf,
}

impl UploadService {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Stores the file and returns the path to record on the user.
    pub async fn store_picture(
        &self,
        user_id: i64,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let extension = allowed_extension(original_name).ok_or(UploadError::UnsupportedType)?;
        let file_name = format!("{}-{}.{}", user_id, Uuid::new_v4().simple(), extension);

        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), bytes).await?;

        tracing::debug!(user_id, file = %file_name, size = bytes.len(), "Stored profile picture");
        Ok(format!("{}/{}", UPLOAD_URL_PREFIX, file_name))
    }

    /// Deletes a previously stored picture. Paths outside the upload
    /// directory (the placeholder included) are left alone.
    pub async fn remove_picture(&self, stored_path: &str) -> Result<bool, UploadError> {
        let Some(file_name) = self.stored_file_name(stored_path) else {
            return Ok(false);
        };

        match tokio::fs::remove_file(self.root.join(file_name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(UploadError::Io(e)),
        }
    }

    fn stored_file_name<'a>(&self, stored_path: &'a str) -> Option<&'a str> {
        let file_name = stored_path
            .strip_prefix(UPLOAD_URL_PREFIX)?
            .strip_prefix('/')?;

        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.starts_with('.')
        {
            return None;
        }

        Some(file_name)
    }
}

fn allowed_extension(file_name: &str) -> Option<String> {
    let extension = Path::new(file_name)
        .extension()?
        .to_str()?
        .to_ascii_lowercase();

    ALLOWED_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_and_remove() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path());

        let path = uploads
            .store_picture(1, "test.JPG", b"not really a jpeg")
            .await
            .unwrap();
        assert!(path.starts_with("uploads/1-"));
        assert!(path.ends_with(".jpg"));

        let file_name = path.trim_start_matches("uploads/");
        let on_disk = dir.path().join(file_name);
        assert_eq!(std::fs::read(&on_disk).unwrap(), b"not really a jpeg");

        assert!(uploads.remove_picture(&path).await.unwrap());
        assert!(!on_disk.exists());
        // second removal is a no-op
        assert!(!uploads.remove_picture(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_empty() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path());

        let result = uploads.store_picture(1, "script.sh", b"#!/bin/sh").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType)));

        let result = uploads.store_picture(1, "noextension", b"data").await;
        assert!(matches!(result, Err(UploadError::UnsupportedType)));

        let result = uploads.store_picture(1, "empty.png", b"").await;
        assert!(matches!(result, Err(UploadError::Empty)));
    }

    #[tokio::test]
    async fn test_never_removes_outside_upload_dir() {
        let dir = TempDir::new().unwrap();
        let uploads = UploadService::new(dir.path());

        assert!(!uploads.remove_picture("public/unknown.png").await.unwrap());
        assert!(!uploads.remove_picture("uploads/../secret").await.unwrap());
        assert!(!uploads.remove_picture("uploads/").await.unwrap());
        assert!(!uploads.remove_picture("uploadsx/a.png").await.unwrap());
    }
}
