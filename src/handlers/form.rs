// Multipart form processing for upload submissions
//
// This module receives the multipart form of a submission, validates the
// audio field against the upload policy, and streams the accepted file to
// shared storage chunk by chunk. Rejections and stream errors discard
// whatever was already written, so a failed submission leaves nothing behind.

use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};
use log::info;
use std::fs::File;
use std::io::Write;

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::file_utils::{allocate_upload_paths, discard_upload, UploadPaths};
use crate::validation;

/// A validated upload persisted to shared storage
#[derive(Debug)]
pub struct ReceivedUpload {
    /// Where the media landed
    pub paths: UploadPaths,
    /// Filename as sent by the client
    pub original_filename: String,
    /// Total bytes received
    pub size_bytes: usize,
}

/// Receive and validate the upload from a multipart form
///
/// Only the first field named `audio` is considered; other fields are
/// drained and ignored. The media type check runs before any byte is
/// committed to disk, and the size ceiling is enforced per received chunk so
/// oversized uploads are cut off early.
pub async fn receive_upload(
    mut form: Multipart,
    config: &IntakeConfig,
) -> Result<ReceivedUpload, IntakeError> {
    let mut upload: Option<ReceivedUpload> = None;

    config.ensure_upload_dir()?;

    while let Ok(Some(mut field)) = form.try_next().await {
        let content_disposition = field.content_disposition();
        let field_name = content_disposition
            .and_then(|cd| cd.get_name().map(|name| name.to_string()))
            .unwrap_or_default();

        if field_name != "audio" || upload.is_some() {
            // Drain unknown fields and any duplicate audio part
            while field.next().await.is_some() {}
            continue;
        }

        let original_filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|name| name.to_string()))
            .unwrap_or_else(|| String::from("upload"));
        let content_type = field.content_type().map(|m| m.essence_str().to_string());

        // Accept/reject on declared type and extension before touching disk
        validation::check_media_type(content_type.as_deref(), &original_filename)?;

        let paths = allocate_upload_paths(&config.upload_dir, &original_filename)?;
        let mut file = match File::create(&paths.file) {
            Ok(file) => file,
            Err(e) => {
                discard_upload(&paths.folder);
                return Err(IntakeError::FileError(e));
            }
        };

        let mut received: usize = 0;
        while let Some(chunk) = field.next().await {
            let data = match chunk {
                Ok(data) => data,
                Err(e) => {
                    // Client disconnects mid-upload land here
                    discard_upload(&paths.folder);
                    return Err(IntakeError::FormError(format!(
                        "Error processing file upload: {}",
                        e
                    )));
                }
            };

            received += data.len();
            if let Err(e) = validation::check_size(received) {
                discard_upload(&paths.folder);
                return Err(e);
            }

            if let Err(e) = file.write_all(&data) {
                discard_upload(&paths.folder);
                return Err(IntakeError::FileError(e));
            }
        }

        info!(
            "Stored upload {} ({} bytes) at {}",
            original_filename,
            received,
            paths.file.display()
        );

        upload = Some(ReceivedUpload {
            paths,
            original_filename,
            size_bytes: received,
        });
    }

    upload.ok_or(IntakeError::MissingFile)
}
