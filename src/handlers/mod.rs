// HTTP handlers for the transcription intake service
//
// This module contains the HTTP handlers for the intake API.
// It provides the interface between HTTP requests and the shared job store.

pub mod form;
pub mod routes;

// Re-export handlers for easier access
pub use self::routes::{job_status, transcribe};
