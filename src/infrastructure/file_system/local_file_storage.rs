use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

use crate::application::ports::file_storage::{FileStorage, FileStorageError};

/// Stores attachment blobs as uuid-named files under a base directory. The
/// storage reference handed out is the file name.
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub async fn ensure_directory_exists(&self) -> Result<(), FileStorageError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    fn file_path(&self, storage_ref: &str) -> PathBuf {
        self.base_path.join(storage_ref)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, data: &[u8]) -> Result<String, FileStorageError> {
        self.ensure_directory_exists().await?;

        let storage_ref = Uuid::new_v4().to_string();
        let file_path = self.file_path(&storage_ref);

        fs::write(&file_path, data)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?;

        Ok(storage_ref)
    }

    async fn retrieve(&self, storage_ref: &str) -> Result<Vec<u8>, FileStorageError> {
        let file_path = self.file_path(storage_ref);

        if !file_path.exists() {
            return Err(FileStorageError::FileNotFound(storage_ref.to_string()));
        }

        fs::read(&file_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))
    }

    async fn delete(&self, storage_ref: &str) -> Result<bool, FileStorageError> {
        let file_path = self.file_path(storage_ref);

        if !file_path.exists() {
            return Ok(false);
        }

        fs::remove_file(&file_path)
            .await
            .map_err(|e| FileStorageError::IoError(e.to_string()))?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_retrieve_delete() {
        let dir = std::env::temp_dir().join(format!("storage-test-{}", Uuid::new_v4()));
        let storage = LocalFileStorage::new(dir.clone());

        let storage_ref = storage.store(b"file contents").await.unwrap();
        assert_eq!(storage.retrieve(&storage_ref).await.unwrap(), b"file contents");

        assert!(storage.delete(&storage_ref).await.unwrap());
        assert!(!storage.delete(&storage_ref).await.unwrap());
        assert!(matches!(
            storage.retrieve(&storage_ref).await,
            Err(FileStorageError::FileNotFound(_))
        ));

        let _ = fs::remove_dir_all(dir).await;
    }
}
