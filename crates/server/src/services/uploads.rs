//! Product image storage on the local filesystem.
//!
//! Accepted files are written under a generated collision-resistant name and
//! referenced by public URL path from `product_image` rows. File removal is
//! always best-effort: the database row is the source of truth and a
//! leftover file on disk is acceptable.

use std::path::PathBuf;

use uuid::Uuid;

/// Extensions accepted for product images (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/static/img/uploads";

/// Whether an uploaded filename carries an accepted image extension
/// (case-insensitive).
#[must_use]
pub fn allowed_file(filename: &str) -> bool {
    extension(filename)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// The extension of a filename, if any.
fn extension(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// A 12-hex-char random token for upload filenames.
fn short_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(12);
    token
}

/// Filesystem store for uploaded product images.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first save.
    #[must_use]
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store uploaded bytes under a fresh `product_<token>.<ext>` name,
    /// preserving the original extension, and return the public URL path.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let ext = extension(original_name)
            .map_or_else(|| "jpg".to_string(), str::to_lowercase);
        let unique = format!("product_{}.{ext}", short_token());

        tokio::fs::write(self.dir.join(&unique), data).await?;
        Ok(format!("{PUBLIC_PREFIX}/{unique}"))
    }

    /// Best-effort removal of the file behind a stored image URL.
    ///
    /// Failures are logged and swallowed; the caller's database operation
    /// must never depend on this succeeding.
    pub async fn remove(&self, image_url: &str) {
        let Some(name) = image_url.strip_prefix(&format!("{PUBLIC_PREFIX}/")) else {
            return;
        };
        // Only plain filenames inside the upload dir are ever removed.
        if name.is_empty() || name.contains('/') || name.contains("..") {
            return;
        }

        if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
            tracing::debug!(image_url, error = %e, "could not remove upload file");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn temp_store() -> UploadStore {
        UploadStore::new(std::env::temp_dir().join(format!("atelie-test-{}", Uuid::new_v4())))
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        for name in ["photo.jpg", "photo.JPG", "photo.JPeG", "a.png", "b.webp"] {
            assert!(allowed_file(name), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_unsupported_and_missing_extensions() {
        for name in ["photo.GIF", "photo.gif", "archive.zip", "noext", "dot."] {
            assert!(!allowed_file(name), "{name} should be rejected");
        }
    }

    #[tokio::test]
    async fn save_generates_unique_names_preserving_extension() {
        let store = temp_store();
        let first = store.save("photo.JPG", b"fake-jpeg").await.unwrap();
        let second = store.save("photo.JPG", b"fake-jpeg").await.unwrap();

        assert!(first.starts_with("/static/img/uploads/product_"));
        assert!(first.ends_with(".jpg"));
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn remove_deletes_the_stored_file() {
        let store = temp_store();
        let url = store.save("photo.png", b"fake-png").await.unwrap();

        let name = url.rsplit('/').next().unwrap();
        let path = store.dir.join(name);
        assert!(path.exists());

        store.remove(&url).await;
        assert!(!path.exists());

        // Removing again is a no-op, not a panic.
        store.remove(&url).await;
    }

    #[tokio::test]
    async fn remove_ignores_urls_outside_the_upload_prefix() {
        let store = temp_store();
        store.remove("/etc/passwd").await;
        store.remove("/static/img/uploads/../../etc/passwd").await;
        store.remove("/static/img/uploads/").await;
    }
}
