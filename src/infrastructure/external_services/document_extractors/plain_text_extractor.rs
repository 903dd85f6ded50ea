use async_trait::async_trait;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor,
};
use crate::domain::value_objects::FileKind;

pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(
        &self,
        data: &[u8],
        kind: FileKind,
    ) -> Result<String, DocumentExtractionError> {
        if kind != FileKind::PlainText {
            return Err(DocumentExtractionError::UnsupportedFormat(
                kind.media_type().to_string(),
            ));
        }

        String::from_utf8(data.to_vec())
            .map_err(|e| DocumentExtractionError::CorruptedFile(format!("Invalid UTF-8: {}", e)))
    }

    fn can_extract(&self, kind: FileKind) -> bool {
        kind == FileKind::PlainText
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_utf8_decoding() {
        let extractor = PlainTextExtractor::new();
        let text = extractor
            .extract("héllo wörld".as_bytes(), FileKind::PlainText)
            .await
            .unwrap();
        assert_eq!(text, "héllo wörld");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_rejected() {
        let extractor = PlainTextExtractor::new();
        let result = extractor.extract(&[0xff, 0xfe, 0x00], FileKind::PlainText).await;
        assert!(matches!(
            result,
            Err(DocumentExtractionError::CorruptedFile(_))
        ));
    }
}
