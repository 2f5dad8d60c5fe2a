//! Upload validation and stored-file naming.

use crate::error::CoreError;

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Extension used when neither the filename nor the MIME type yields one.
const FALLBACK_EXTENSION: &str = "img";

/// Reject uploads whose declared content type is not `image/*`.
pub fn validate_content_type(content_type: Option<&str>) -> Result<(), CoreError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(()),
        _ => Err(CoreError::Validation("File must be an image".into())),
    }
}

/// Reject empty or oversized uploads.
pub fn validate_size(len: usize) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::Validation("Empty file".into()));
    }
    if len > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation("File too large (max 10MB)".into()));
    }
    Ok(())
}

/// Build the on-disk file name for an upload.
///
/// Files are keyed by inference id so two uploads never share a path. The
/// extension comes from the original filename when it is plain ASCII
/// alphanumeric, otherwise from the MIME subtype.
pub fn stored_file_name(
    inference_id: &str,
    original_filename: Option<&str>,
    content_type: Option<&str>,
) -> String {
    let from_name = original_filename
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| is_safe_extension(ext));

    let from_mime = || {
        content_type
            .and_then(|ct| ct.split(';').next())
            .and_then(|ct| ct.trim().strip_prefix("image/"))
            .map(|sub| match sub {
                "jpeg" | "pjpeg" => "jpg".to_string(),
                other => other.to_ascii_lowercase(),
            })
            .filter(|ext| is_safe_extension(ext))
    };

    let ext = from_name
        .or_else(from_mime)
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string());

    format!("{inference_id}.{ext}")
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric())
}
