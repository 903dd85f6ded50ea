use async_trait::async_trait;

#[derive(Debug)]
pub enum FileStorageError {
    FileNotFound(String),
    IoError(String),
}

impl std::fmt::Display for FileStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStorageError::FileNotFound(storage_ref) => {
                write!(f, "File not found: {}", storage_ref)
            }
            FileStorageError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for FileStorageError {}

/// Blob storage for uploaded attachments, addressed by an opaque storage
/// reference.
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(&self, data: &[u8]) -> Result<String, FileStorageError>;
    async fn retrieve(&self, storage_ref: &str) -> Result<Vec<u8>, FileStorageError>;
    async fn delete(&self, storage_ref: &str) -> Result<bool, FileStorageError>;
}
