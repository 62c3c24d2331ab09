//! Resume text extraction from an uploaded PDF.
//!
//! The same PDF a user attaches to the email can feed the drafting prompt, so they do not
//! have to paste their resume separately.

use anyhow::anyhow;
use bytes::Bytes;
use tracing::info;

use crate::errors::AppError;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Cheap signature check; says nothing about whether the document parses.
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Extracts plain text from PDF bytes. Parsing runs on the blocking pool.
pub async fn extract_resume_text(data: Bytes) -> Result<String, AppError> {
    if !is_pdf(&data) {
        return Err(AppError::Pdf("Uploaded file is not a PDF".to_string()));
    }

    let size = data.len();
    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| {
        // pdf-extract panics on some malformed documents instead of returning an error.
        if e.is_panic() {
            AppError::Pdf("Could not read text from PDF: malformed document".to_string())
        } else {
            AppError::Internal(anyhow!("PDF extraction task failed: {e}"))
        }
    })?
    .map_err(|e| AppError::Pdf(format!("Could not read text from PDF: {e}")))?;

    let text = tidy_extracted_text(&text);
    if text.is_empty() {
        return Err(AppError::Pdf(
            "PDF contains no extractable text (is it a scanned image?)".to_string(),
        ));
    }
    info!("Extracted {} chars of resume text from {} byte PDF", text.len(), size);
    Ok(text)
}

/// Trims every line and drops the blank runs PDF extraction tends to leave behind.
fn tidy_extracted_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tidy_drops_blank_lines_and_edges() {
        let raw = "\n\n  JANE DOE  \n\n\nRust Engineer\n   \nSkills: Rust\n";
        assert_eq!(tidy_extracted_text(raw), "JANE DOE\nRust Engineer\nSkills: Rust");
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_are_rejected() {
        let err = extract_resume_text(Bytes::from_static(b"plain text resume"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Pdf(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_pdf_error() {
        let err = extract_resume_text(Bytes::from_static(b"%PDF-1.4\ngarbage"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Pdf(_)));
    }
}
