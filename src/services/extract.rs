use crate::error::{AppError, AppResult};

/// Turns an uploaded document into plain text
pub trait DocumentExtractor: Send + Sync {
    /// Extract the concatenated text of every page
    fn extract(&self, document: &[u8]) -> AppResult<String>;

    fn name(&self) -> &'static str;
}

/// PDF text extraction
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractor;

impl DocumentExtractor for PdfExtractor {
    fn extract(&self, document: &[u8]) -> AppResult<String> {
        pdf_extract::extract_text_from_mem(document)
            .map_err(|e| AppError::Extraction(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "pdf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_are_an_extraction_error() {
        let result = PdfExtractor.extract(b"definitely not a pdf");
        assert!(matches!(result, Err(AppError::Extraction(_))));
    }
}
