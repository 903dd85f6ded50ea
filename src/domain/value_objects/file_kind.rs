use serde::{Deserialize, Serialize};

/// Largest attachment the pipeline accepts.
pub const MAX_FILE_SIZE_BYTES: i64 = 10 * 1024 * 1024;

/// Supported attachment formats. Anything else is rejected at upload time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    PlainText,
    Pdf,
}

impl FileKind {
    pub fn from_media_type(media_type: &str) -> Result<Self, String> {
        match media_type {
            "text/plain" => Ok(FileKind::PlainText),
            "application/pdf" => Ok(FileKind::Pdf),
            _ => Err(format!("Unsupported media type: {}", media_type)),
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            FileKind::PlainText => "text/plain",
            FileKind::Pdf => "application/pdf",
        }
    }
}

/// Upload-time validation, applied before anything is stored or queued.
pub fn validate_upload(media_type: &str, byte_size: i64) -> Result<FileKind, String> {
    let kind = FileKind::from_media_type(media_type)?;
    if byte_size <= 0 {
        return Err("File is empty".to_string());
    }
    if byte_size > MAX_FILE_SIZE_BYTES {
        return Err(format!(
            "File size {} exceeds maximum of {} bytes",
            byte_size, MAX_FILE_SIZE_BYTES
        ));
    }
    Ok(kind)
}
