//! Document loading, splitting and in-memory retrieval.

mod index;
mod splitter;

pub use index::{cosine_similarity, DocumentIndex, ScoredChunk};
pub use splitter::TextSplitter;

use crate::error::{KioskError, Result};
use std::path::Path;
use tracing::{debug, instrument};

/// Read the text of a PDF or UTF-8 text file.
#[instrument]
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
        || bytes.starts_with(b"%PDF");

    let text = if is_pdf {
        pdf_extract::extract_text_from_mem(&bytes).map_err(|e| KioskError::Pdf(e.to_string()))?
    } else {
        String::from_utf8(bytes).map_err(|_| {
            KioskError::InvalidInput(format!("{} is neither a PDF nor UTF-8 text", path.display()))
        })?
    };

    if text.trim().is_empty() {
        return Err(KioskError::EmptyResult(format!(
            "No text could be extracted from {}",
            path.display()
        )));
    }

    debug!("Loaded {} chars from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_plain_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Rust engineer, 5 years").unwrap();

        assert_eq!(load_text(&path).unwrap(), "Rust engineer, 5 years");
    }

    #[test]
    fn test_blank_file_is_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n").unwrap();

        assert!(matches!(load_text(&path), Err(KioskError::EmptyResult(_))));
    }

    #[test]
    fn test_binary_non_pdf_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.bin");
        std::fs::write(&path, [0xff, 0xfe, 0x00, 0x81]).unwrap();

        assert!(matches!(load_text(&path), Err(KioskError::InvalidInput(_))));
    }

    #[test]
    fn test_corrupt_pdf_is_pdf_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 not really").unwrap();

        assert!(matches!(load_text(&path), Err(KioskError::Pdf(_))));
    }
}
