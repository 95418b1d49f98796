// Data models for the transcription intake service
//
// This module contains the job record created at submission time, its wire
// form pushed onto the work queue, and the HTTP response types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// One unit of submitted transcription work
///
/// Created exclusively at submission time and never mutated afterward. State
/// transitions (queued, processing, completed, error) are owned by the
/// downstream workers and observed through the job store.
#[derive(Debug, Clone)]
pub struct Job {
    /// Unique identifier, the sole correlation key between producer, queue,
    /// worker and client
    pub id: String,
    /// Location of the persisted upload, meaningful only to the worker
    pub file_path: PathBuf,
    /// Filename as sent by the client, echoed back at submission time
    pub original_filename: String,
    /// Size of the upload in bytes
    pub size_bytes: usize,
}

impl Job {
    /// Build the canonical job record for a validated upload
    ///
    /// Pure construction: generates a v4 UUID and copies the upload metadata.
    /// Identifier collisions are treated as a non-requirement.
    pub fn new(file_path: PathBuf, original_filename: String, size_bytes: usize) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            file_path,
            original_filename,
            size_bytes,
        }
    }

    /// The wire form of this job for the work queue
    pub fn queue_entry(&self) -> QueueEntry {
        QueueEntry {
            job_id: self.id.clone(),
            file_path: self.file_path.to_string_lossy().into_owned(),
        }
    }
}

/// Serialized queue payload consumed by the transcription workers
///
/// Field names are a wire contract with the worker side and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Job identifier
    #[serde(rename = "jobId")]
    pub job_id: String,
    /// Path to the uploaded media on shared storage
    pub file_path: String,
}

/// Response for an accepted submission
#[derive(Serialize)]
pub struct SubmitResponse {
    /// Job ID assigned to the submission
    #[serde(rename = "jobId")]
    pub job_id: String,
    /// Always "queued" at submission time
    pub status: String,
    /// Original filename echoed back to the caller
    pub filename: String,
    /// Upload size in bytes
    pub size: usize,
}

/// Error response for the API
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Outcome classifier ("error" or "not_found")
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_ids_are_unique() {
        let a = Job::new(PathBuf::from("/tmp/a.mp3"), String::from("a.mp3"), 10);
        let b = Job::new(PathBuf::from("/tmp/a.mp3"), String::from("a.mp3"), 10);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn queue_entry_uses_wire_field_names() {
        let job = Job::new(
            PathBuf::from("/shared/audio/upload.mp3"),
            String::from("sample.mp3"),
            2_000_000,
        );
        let entry = job.queue_entry();
        let wire = serde_json::to_value(&entry).unwrap();

        assert_eq!(wire["jobId"], job.id);
        assert_eq!(wire["file_path"], "/shared/audio/upload.mp3");
        assert_eq!(wire.as_object().unwrap().len(), 2);
    }

    #[test]
    fn submit_response_shape() {
        let response = SubmitResponse {
            job_id: String::from("abc"),
            status: String::from("queued"),
            filename: String::from("sample.mp3"),
            size: 2_000_000,
        };
        let body = serde_json::to_value(&response).unwrap();

        assert_eq!(body["jobId"], "abc");
        assert_eq!(body["status"], "queued");
        assert_eq!(body["filename"], "sample.mp3");
        assert_eq!(body["size"], 2_000_000);
    }
}
