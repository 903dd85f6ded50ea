use async_trait::async_trait;
use lopdf::Document;

use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor,
};
use crate::domain::value_objects::FileKind;

pub struct PdfExtractor {
    password: String,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self {
            password: String::new(),
        }
    }

    fn extract_pdf_text(&self, doc: &Document) -> Result<String, DocumentExtractionError> {
        let pages = doc.get_pages();
        let mut all_text = Vec::new();
        let mut errors = Vec::new();

        for (page_num, _) in pages {
            match doc.extract_text(&[page_num]) {
                Ok(text) => {
                    let lines: Vec<String> = text
                        .split('\n')
                        .map(|s| s.trim_end().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    all_text.extend(lines);
                }
                Err(e) => {
                    errors.push(format!("page {}: {}", page_num, e));
                }
            }
        }

        if !errors.is_empty() {
            tracing::warn!(errors = ?errors, "some PDF pages could not be extracted");
        }

        let combined_text = all_text.join("\n");
        if combined_text.trim().is_empty() {
            return Err(DocumentExtractionError::ExtractionFailed(
                "No text could be extracted; this may be a scanned PDF requiring OCR".to_string(),
            ));
        }

        Ok(combined_text)
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for PdfExtractor {
    async fn extract(
        &self,
        data: &[u8],
        kind: FileKind,
    ) -> Result<String, DocumentExtractionError> {
        if kind != FileKind::Pdf {
            return Err(DocumentExtractionError::UnsupportedFormat(
                kind.media_type().to_string(),
            ));
        }

        let mut doc = Document::load_mem(data)
            .map_err(|e| DocumentExtractionError::CorruptedFile(e.to_string()))?;

        if doc.is_encrypted() {
            doc.decrypt(&self.password).map_err(|_| {
                DocumentExtractionError::ExtractionFailed(
                    "Failed to decrypt PDF - invalid password".to_string(),
                )
            })?;
        }

        self.extract_pdf_text(&doc)
    }

    fn can_extract(&self, kind: FileKind) -> bool {
        kind == FileKind::Pdf
    }
}
