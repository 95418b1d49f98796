// File utilities for the transcription intake service
//
// This module handles placement of uploaded media on shared storage. Each
// upload gets its own unique folder under the configured upload directory,
// and the stored file keeps the original extension so the worker's decoder
// can sniff the container format.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{error, info};
use uuid::Uuid;

/// Paths for one stored upload
#[derive(Debug, Clone)]
pub struct UploadPaths {
    /// Unique folder holding this upload
    pub folder: PathBuf,
    /// Destination of the media file inside the folder
    pub file: PathBuf,
}

/// Allocate a unique destination for an incoming upload
///
/// Creates a fresh folder named after a storage UUID under `base_dir` and
/// returns the media file path inside it. The storage UUID is independent of
/// the job identifier, which is only assigned once the upload is accepted.
///
/// # Errors
///
/// Returns an IO error if directory creation fails
pub fn allocate_upload_paths(base_dir: &str, original_filename: &str) -> io::Result<UploadPaths> {
    let storage_id = Uuid::new_v4().to_string();
    let extension = Path::new(original_filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("bin");

    let folder = Path::new(base_dir).join(&storage_id);
    fs::create_dir_all(&folder)?;

    let file = folder.join(format!("upload_{}.{}", storage_id, extension));

    Ok(UploadPaths { folder, file })
}

/// Remove an upload folder and everything in it
///
/// Used when a submission is rejected or the client disconnects mid-upload.
/// Errors are logged but not returned, the request outcome is already decided
/// by the time this runs.
pub fn discard_upload(folder: &Path) {
    if let Err(e) = fs::remove_dir_all(folder) {
        error!("Failed to discard upload folder {}: {}", folder.display(), e);
    } else {
        info!("Discarded upload folder: {}", folder.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("intake_test_{}", Uuid::new_v4()))
    }

    #[test]
    fn allocates_unique_folder_and_keeps_extension() {
        let base = scratch_dir();
        let base_str = base.to_str().unwrap();

        let first = allocate_upload_paths(base_str, "meeting.mp3").unwrap();
        let second = allocate_upload_paths(base_str, "meeting.mp3").unwrap();

        assert!(first.folder.is_dir());
        assert_ne!(first.folder, second.folder);
        assert_eq!(first.file.extension().unwrap(), "mp3");

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn falls_back_to_bin_extension() {
        let base = scratch_dir();
        let paths = allocate_upload_paths(base.to_str().unwrap(), "upload").unwrap();

        assert_eq!(paths.file.extension().unwrap(), "bin");

        fs::remove_dir_all(&base).unwrap();
    }

    #[test]
    fn discard_removes_folder_and_contents() {
        let base = scratch_dir();
        let paths = allocate_upload_paths(base.to_str().unwrap(), "clip.wav").unwrap();
        fs::write(&paths.file, b"partial bytes").unwrap();

        discard_upload(&paths.folder);
        assert!(!paths.folder.exists());

        fs::remove_dir_all(&base).unwrap();
    }
}
