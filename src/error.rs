// Error handling for the transcription intake service
//
// This module defines the error taxonomy for the intake handlers and its
// translation to HTTP responses. Client input errors are returned verbatim as
// structured JSON; infrastructure errors are logged with full detail server
// side and reduced to a generic message client side.

use std::io;

use actix_web::{HttpResponse, ResponseError};
use log::error;
use thiserror::Error;

use crate::job_store::StoreError;
use crate::models::ErrorResponse;

/// Errors that can occur in the intake handlers
#[derive(Error, Debug)]
pub enum IntakeError {
    /// No audio file part was present in the request
    #[error("No audio file provided")]
    MissingFile,

    /// Neither the declared media type nor the extension is allow-listed
    #[error("Invalid file type. Accepted extensions: {0}")]
    InvalidFileType(String),

    /// The streamed upload exceeded the size ceiling
    #[error("File too large. Maximum size is 100MB.")]
    FileTooLarge { received: usize },

    /// Error while reading the multipart form
    #[error("Form error: {0}")]
    FormError(String),

    /// Error while persisting the upload to shared storage
    #[error("File error: {0}")]
    FileError(#[from] io::Error),

    /// No status or result record exists for the requested job
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// The accepted upload could not be appended to the work queue
    #[error("Queue publish failed: {0}")]
    QueuePublishFailed(#[source] StoreError),

    /// The job store could not be read or returned a malformed record
    #[error("Store error: {0}")]
    Store(#[source] StoreError),
}

impl IntakeError {
    /// Label value used when recording a rejected upload in metrics
    pub fn metric_reason(&self) -> &'static str {
        match self {
            IntakeError::MissingFile => "missing_file",
            IntakeError::InvalidFileType(_) => "invalid_type",
            IntakeError::FileTooLarge { .. } => "too_large",
            IntakeError::FormError(_) => "form_error",
            IntakeError::FileError(_) => "file_error",
            _ => "other",
        }
    }
}

impl ResponseError for IntakeError {
    fn error_response(&self) -> HttpResponse {
        match self {
            IntakeError::MissingFile
            | IntakeError::InvalidFileType(_)
            | IntakeError::FileTooLarge { .. }
            | IntakeError::FormError(_) => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
                status: String::from("error"),
            }),
            // Expected outcome for unknown or expired job ids
            IntakeError::JobNotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: String::from("Job not found"),
                status: String::from("not_found"),
            }),
            IntakeError::QueuePublishFailed(source) => {
                error!("Failed to publish job to work queue: {}", source);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: String::from("Failed to queue transcription job"),
                    status: String::from("error"),
                })
            }
            IntakeError::Store(source) => {
                error!("Job store lookup failed: {}", source);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: String::from("Failed to read job status"),
                    status: String::from("error"),
                })
            }
            IntakeError::FileError(source) => {
                error!("Failed to store uploaded file: {}", source);
                HttpResponse::InternalServerError().json(ErrorResponse {
                    error: String::from("Failed to store uploaded file"),
                    status: String::from("error"),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    async fn body_json(err: IntakeError) -> (StatusCode, serde_json::Value) {
        let response = err.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[actix_web::test]
    async fn missing_file_maps_to_400() {
        let (status, body) = body_json(IntakeError::MissingFile).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No audio file provided");
        assert_eq!(body["status"], "error");
    }

    #[actix_web::test]
    async fn oversized_upload_maps_to_400_with_fixed_message() {
        let (status, body) = body_json(IntakeError::FileTooLarge {
            received: 150 * 1024 * 1024,
        })
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "File too large. Maximum size is 100MB.");
    }

    #[actix_web::test]
    async fn unknown_job_maps_to_404() {
        let (status, body) = body_json(IntakeError::JobNotFound(String::from("nope"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], "not_found");
        assert_eq!(body["error"], "Job not found");
    }

    #[actix_web::test]
    async fn corrupt_record_is_reduced_to_generic_500() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = IntakeError::Store(StoreError::CorruptRecord {
            key: String::from("job:abc:result"),
            source: parse_error,
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "error");
        // No internal detail leaks to the client
        assert_eq!(body["error"], "Failed to read job status");
    }
}
