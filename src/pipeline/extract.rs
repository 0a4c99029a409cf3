//! PDF text extraction.
//!
//! Uses [`pdf_extract`] to pull text from statement PDFs entirely in memory.
//! The library can panic on malformed input rather than returning an error,
//! so the call is wrapped in [`std::panic::catch_unwind`] and both failure
//! shapes collapse into [`SpendwiseError::DocumentParse`].
//!
//! No OCR happens here: a scanned, image-only statement parses fine but
//! yields empty text. The caller treats that as "no readable transactions"
//! rather than an extraction failure, which is why this module does not
//! enforce non-emptiness itself.

use crate::error::SpendwiseError;
use std::panic::{self, AssertUnwindSafe};
use tracing::debug;

/// Extract the statement text from PDF bytes.
///
/// Pages are extracted individually and concatenated in page order with no
/// separator, so the result is one flat string covering the whole document.
///
/// # Errors
///
/// Returns [`SpendwiseError::DocumentParse`] when the bytes are not a valid
/// PDF (including panics from the underlying library).
pub fn extract_text(bytes: &[u8]) -> Result<String, SpendwiseError> {
    let pages = extract_pages(bytes)?;
    debug!("Extracted text from {} pages", pages.len());
    Ok(concat_pages(&pages))
}

/// Extract one text string per page, in page order.
fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, SpendwiseError> {
    let data = bytes.to_vec(); // owned copy for the unwind boundary
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&data)
    }));
    match result {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(SpendwiseError::DocumentParse {
            detail: e.to_string(),
        }),
        Err(_) => Err(SpendwiseError::DocumentParse {
            detail: "extraction panicked (malformed document)".into(),
        }),
    }
}

/// Join per-page text in order with no inserted separator.
///
/// Whatever whitespace the extractor produced at page boundaries is kept
/// as-is; this function never adds or removes characters.
fn concat_pages(pages: &[String]) -> String {
    let total: usize = pages.iter().map(String::len).sum();
    let mut out = String::with_capacity(total);
    for page in pages {
        out.push_str(page);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_joins_in_order_without_separator() {
        let pages = vec!["first ".to_string(), "second".to_string(), "".to_string()];
        assert_eq!(concat_pages(&pages), "first second");
    }

    #[test]
    fn concat_of_no_pages_is_empty() {
        assert_eq!(concat_pages(&[]), "");
    }

    #[test]
    fn garbage_bytes_are_a_parse_error() {
        let result = extract_text(b"not a pdf at all");
        assert!(matches!(
            result,
            Err(SpendwiseError::DocumentParse { .. })
        ));
    }

    #[test]
    fn truncated_header_is_a_parse_error() {
        let result = extract_text(b"%PDF-1.4\n%%EOF\n");
        assert!(matches!(
            result,
            Err(SpendwiseError::DocumentParse { .. })
        ));
    }
}
