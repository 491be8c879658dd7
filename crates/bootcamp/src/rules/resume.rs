use std::path::Path;

use mime::Mime;

use super::ValidationError;

const WORD_LEGACY: &str = "application/msword";
const WORD_OPEN_XML: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Accepted résumé formats as (extension, mime essence).
const ACCEPTED: [(&str, &str); 3] = [
    ("pdf", "application/pdf"),
    ("doc", WORD_LEGACY),
    ("docx", WORD_OPEN_XML),
];

/// Validates an uploaded résumé and returns the lowercase extension it will be stored under.
///
/// The extension decides the format. A declared content type is only consulted to reject
/// uploads that claim to be something else; `application/octet-stream` is tolerated since
/// browsers fall back to it for unknown types.
pub fn ensure_acceptable_resume(
    file_name: &str,
    declared: Option<&str>,
    size: usize,
    max_bytes: usize,
) -> Result<&'static str, ValidationError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .ok_or(ValidationError::UnsupportedResumeType)?;

    let (stored_ext, essence) = ACCEPTED
        .iter()
        .copied()
        .find(|(ext, _)| *ext == extension)
        .ok_or(ValidationError::UnsupportedResumeType)?;

    let guessed = mime_guess::from_ext(stored_ext).first();
    let declared = declared.and_then(|raw| raw.parse::<Mime>().ok());
    if let Some(declared) = declared {
        let matches_guess = guessed
            .as_ref()
            .map(|guess| guess.essence_str() == declared.essence_str())
            .unwrap_or(false);
        let generic = declared == mime::APPLICATION_OCTET_STREAM;
        if !(declared.essence_str() == essence || matches_guess || generic) {
            return Err(ValidationError::UnsupportedResumeType);
        }
    }

    if size > max_bytes {
        return Err(ValidationError::ResumeTooLarge { max: max_bytes });
    }

    Ok(stored_ext)
}
