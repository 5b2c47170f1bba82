//! Resume text extraction

use std::path::Path;

/// Extract plain text from a resume PDF
///
/// A missing or unreadable resume degrades the interview prompt rather than
/// aborting startup: failures are logged and empty text is returned.
#[must_use]
pub fn extract_text(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => {
            let text = text.trim().to_string();
            if text.is_empty() {
                tracing::warn!(path = %path.display(), "resume extracted as empty text");
            }
            text
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to extract resume text");
            String::new()
        }
    }
}
