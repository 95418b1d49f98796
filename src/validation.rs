// Upload validation for the transcription intake service
//
// Decides accept/reject for an incoming upload before it is committed to
// shared storage. The declared media type and the filename extension are
// checked against fixed allow-lists; either signal suffices because clients
// routinely declare unreliable content types. The size ceiling is enforced
// against the streamed byte count, independent of type validity.

use std::path::Path;

use crate::error::IntakeError;

/// Maximum accepted upload size (100 MiB)
pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Media types accepted for transcription
pub const ALLOWED_CONTENT_TYPES: [&str; 12] = [
    "audio/mpeg",
    "audio/mp4",
    "audio/wav",
    "audio/x-wav",
    "audio/ogg",
    "audio/flac",
    "audio/aac",
    "audio/webm",
    "video/mp4",
    "video/webm",
    "video/quicktime",
    "video/x-matroska",
];

/// Filename extensions accepted when the declared type is missing or unknown
pub const ALLOWED_EXTENSIONS: [&str; 11] = [
    "mp3", "wav", "m4a", "aac", "ogg", "opus", "flac", "mp4", "webm", "mov", "mkv",
];

/// Renders the accepted-extension list for client-facing error messages
pub fn accepted_extensions() -> String {
    ALLOWED_EXTENSIONS.join(", ")
}

/// Checks the declared media type and filename against the allow-lists
///
/// Accepts when the declared content type is allow-listed OR the filename
/// carries an allow-listed extension (case-insensitive). Rejects with
/// `InvalidFileType` otherwise, carrying the accepted extensions so the
/// client knows what to send instead.
pub fn check_media_type(content_type: Option<&str>, filename: &str) -> Result<(), IntakeError> {
    if let Some(declared) = content_type {
        if ALLOWED_CONTENT_TYPES.contains(&declared) {
            return Ok(());
        }
    }

    let extension = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
        _ => Err(IntakeError::InvalidFileType(accepted_extensions())),
    }
}

/// Enforces the size ceiling against the byte count received so far
///
/// Called once per streamed chunk, so an oversized upload is rejected as soon
/// as the ceiling is crossed rather than after full receipt.
pub fn check_size(received_bytes: usize) -> Result<(), IntakeError> {
    if received_bytes > MAX_UPLOAD_BYTES {
        Err(IntakeError::FileTooLarge {
            received: received_bytes,
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allow_listed_content_type() {
        assert!(check_media_type(Some("audio/mpeg"), "sample.mp3").is_ok());
        assert!(check_media_type(Some("video/mp4"), "clip.mp4").is_ok());
    }

    #[test]
    fn accepts_allow_listed_extension_despite_wrong_type() {
        // Declared type is unreliable, the extension alone is sufficient
        assert!(check_media_type(Some("application/octet-stream"), "sample.mp3").is_ok());
        assert!(check_media_type(None, "recording.wav").is_ok());
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(check_media_type(None, "MEETING.WAV").is_ok());
        assert!(check_media_type(None, "interview.Mp3").is_ok());
    }

    #[test]
    fn rejects_when_both_signals_fail() {
        let err = check_media_type(Some("text/plain"), "notes.txt").unwrap_err();
        assert!(matches!(err, IntakeError::InvalidFileType(_)));
        assert!(err.to_string().starts_with("Invalid file type"));
        assert!(err.to_string().contains("mp3"));
    }

    #[test]
    fn rejects_extensionless_file_with_unknown_type() {
        assert!(check_media_type(None, "audio").is_err());
        assert!(check_media_type(Some("application/pdf"), "audio").is_err());
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        assert!(check_size(0).is_ok());
        assert!(check_size(MAX_UPLOAD_BYTES).is_ok());

        let err = check_size(MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert!(matches!(err, IntakeError::FileTooLarge { .. }));
        assert_eq!(err.to_string(), "File too large. Maximum size is 100MB.");
    }
}
