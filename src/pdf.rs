//! PDF text extraction and whitespace normalization.

use crate::pipeline::PipelineError;

/// Extract the full text of an in-memory PDF, page order preserved, and
/// normalize it for segmentation.
pub fn extract_text(bytes: &[u8]) -> Result<String, PipelineError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PipelineError::UnsupportedFormat(e.to_string()))?;
    Ok(normalize(&text))
}

/// Replace the whitespace artifacts PDF extraction leaves behind.
/// Non-breaking spaces and tabs would defeat space-sensitive heading
/// patterns.
pub fn normalize(text: &str) -> String {
    text.replace('\u{a0}', " ").replace('\t', " ")
}

// ── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_replaces_nbsp_and_tabs() {
        assert_eq!(normalize("32.\u{a0}Deductions\tfrom wages"), "32. Deductions from wages");
    }

    #[test]
    fn normalize_leaves_plain_text_alone() {
        let text = "ART. 1 Name of Decree.\nShort body.";
        assert_eq!(normalize(text), text);
    }

    #[test]
    fn garbage_bytes_are_an_unsupported_format() {
        let err = extract_text(b"plainly not a pdf").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }
}
