use async_trait::async_trait;
use std::sync::Arc;

use super::{PdfExtractor, PlainTextExtractor};
use crate::application::ports::document_extractor::{
    DocumentExtractionError, DocumentExtractor,
};
use crate::domain::value_objects::FileKind;

pub struct CompositeDocumentExtractor {
    plain_text_extractor: Arc<PlainTextExtractor>,
    pdf_extractor: Arc<PdfExtractor>,
}

impl CompositeDocumentExtractor {
    pub fn new() -> Self {
        Self {
            plain_text_extractor: Arc::new(PlainTextExtractor::new()),
            pdf_extractor: Arc::new(PdfExtractor::new()),
        }
    }

    fn extractor_for(&self, kind: FileKind) -> Arc<dyn DocumentExtractor> {
        match kind {
            FileKind::PlainText => self.plain_text_extractor.clone(),
            FileKind::Pdf => self.pdf_extractor.clone(),
        }
    }
}

impl Default for CompositeDocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentExtractor for CompositeDocumentExtractor {
    async fn extract(
        &self,
        data: &[u8],
        kind: FileKind,
    ) -> Result<String, DocumentExtractionError> {
        self.extractor_for(kind).extract(data, kind).await
    }

    fn can_extract(&self, kind: FileKind) -> bool {
        self.plain_text_extractor.can_extract(kind) || self.pdf_extractor.can_extract(kind)
    }
}
