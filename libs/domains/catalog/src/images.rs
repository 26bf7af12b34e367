//! Local filesystem storage for product pictures.

use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::CatalogResult;
use crate::models::NO_IMAGE;

pub const DEFAULT_UPLOADS_DIR: &str = "wwwroot/uploads";

/// 10 MiB
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

/// Where uploads go and how large a request body may be
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
        }
    }
}

impl FromEnv for UploadConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let dir = PathBuf::from(env_or_default("UPLOADS_DIR", DEFAULT_UPLOADS_DIR));
        let max_bytes = env_parse("UPLOAD_MAX_BYTES", &DEFAULT_UPLOAD_MAX_BYTES.to_string())?;

        Ok(Self { dir, max_bytes })
    }
}

/// Storage for uploaded product pictures
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store `bytes` under a fresh random name that keeps the extension of
    /// `original_name`, returning the stored name
    async fn save(&self, bytes: Vec<u8>, original_name: &str) -> CatalogResult<String>;

    /// Remove a stored picture. The no-image sentinel, external references
    /// and already missing files are left alone.
    async fn delete(&self, filename: &str) -> CatalogResult<()>;
}

/// A reference this store could have produced: a bare file name
fn is_local_name(filename: &str) -> bool {
    !filename.is_empty()
        && !filename.contains(['/', '\\'])
        && !filename.contains("..")
}

/// `.ext` of the client-supplied name, as given. A leading dot counts, so
/// `.jpg` keeps `.jpg`; a trailing dot yields nothing.
fn extension_of(original_name: &str) -> String {
    // Some browsers send the full client path
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(original_name);

    match base.rfind('.') {
        Some(dot) if dot + 1 < base.len() => base[dot..].to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
}

impl LocalImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_config(config: &UploadConfig) -> Self {
        Self::new(config.dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(&self, bytes: Vec<u8>, original_name: &str) -> CatalogResult<String> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let filename = format!("{}{}", Uuid::new_v4(), extension_of(original_name));
        tokio::fs::write(self.path_of(&filename), &bytes).await?;

        tracing::info!(file = %filename, size = bytes.len(), "Stored product image");
        Ok(filename)
    }

    async fn delete(&self, filename: &str) -> CatalogResult<()> {
        if filename == NO_IMAGE {
            return Ok(());
        }

        if !is_local_name(filename) {
            tracing::debug!(file = %filename, "Picture is not a stored upload, leaving it");
            return Ok(());
        }

        match tokio::fs::remove_file(self.path_of(filename)).await {
            Ok(()) => {
                tracing::info!(file = %filename, "Deleted product image");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(file = %filename, "Product image already missing");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_is_kept_as_given() {
        assert_eq!(extension_of("photo.JPG"), ".JPG");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("C:\\Users\\me\\cat.png"), ".png");
        assert_eq!(extension_of(".jpg"), ".jpg");
        assert_eq!(extension_of("photo."), "");
    }

    #[test]
    fn test_local_names_reject_paths() {
        assert!(is_local_name("0f8fad5b-d9cb-469f-a165-70867728950e.jpg"));
        assert!(!is_local_name("../etc/passwd"));
        assert!(!is_local_name("https://cdn.example.com/a.jpg"));
        assert!(!is_local_name("dir\\file.png"));
        assert!(!is_local_name(""));
    }

    #[tokio::test]
    async fn test_save_creates_dir_and_generates_distinct_names() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(tmp.path().join("nested/uploads"));

        let first = store.save(b"abc".to_vec(), "a.jpg").await.unwrap();
        let second = store.save(b"abc".to_vec(), "a.jpg").await.unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with(".jpg"));
        assert_eq!(std::fs::read(store.path_of(&first)).unwrap(), b"abc");
    }

    #[tokio::test]
    async fn test_delete_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(tmp.path());

        let name = store.save(vec![1, 2, 3], "p.png").await.unwrap();
        store.delete(&name).await.unwrap();

        assert!(!store.path_of(&name).exists());
    }

    #[tokio::test]
    async fn test_delete_never_touches_sentinel() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(tmp.path());
        std::fs::write(store.path_of(NO_IMAGE), b"placeholder").unwrap();

        store.delete(NO_IMAGE).await.unwrap();

        assert!(store.path_of(NO_IMAGE).exists());
    }

    #[tokio::test]
    async fn test_delete_missing_or_external_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let store = LocalImageStore::new(tmp.path());

        assert!(store.delete("does-not-exist.jpg").await.is_ok());
        assert!(store.delete("https://cdn.example.com/a.jpg").await.is_ok());
    }

    #[test]
    fn test_upload_config_from_env() {
        temp_env::with_vars(
            [
                ("UPLOADS_DIR", Some("/srv/uploads")),
                ("UPLOAD_MAX_BYTES", Some("2048")),
            ],
            || {
                let config = UploadConfig::from_env().unwrap();
                assert_eq!(config.dir, PathBuf::from("/srv/uploads"));
                assert_eq!(config.max_bytes, 2048);
            },
        );
    }

    #[test]
    fn test_upload_config_defaults() {
        temp_env::with_vars_unset(["UPLOADS_DIR", "UPLOAD_MAX_BYTES"], || {
            let config = UploadConfig::from_env().unwrap();
            assert_eq!(config.dir, PathBuf::from(DEFAULT_UPLOADS_DIR));
            assert_eq!(config.max_bytes, DEFAULT_UPLOAD_MAX_BYTES);
        });
    }
}
