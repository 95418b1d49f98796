// API route handlers for the transcription intake service
//
// This module implements the HTTP endpoints of the intake API: submission of
// an upload onto the work queue, and polling for a job's status or result.
// Every request terminates synchronously in exactly one outcome.

use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpResponse};
use log::info;
use std::time::Instant;

use crate::config::IntakeConfig;
use crate::error::IntakeError;
use crate::handlers::form::receive_upload;
use crate::job_store::{Disposition, JobStore};
use crate::metrics::metrics::Metrics;
use crate::models::{Job, SubmitResponse};

/// Handler for transcription submissions
///
/// Receives the uploaded media, validates it, persists it to shared storage,
/// and appends a job entry to the work queue. The returned job id is the
/// handle clients poll with. A publish failure deliberately leaves the stored
/// upload in place: no job references it, and reconciling orphans is an
/// operator concern rather than a rollback path.
#[post("/transcribe")]
pub async fn transcribe(
    form: Multipart,
    store: web::Data<JobStore>,
    config: web::Data<IntakeConfig>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, IntakeError> {
    let start_time = Instant::now();

    let upload = match receive_upload(form, &config).await {
        Ok(upload) => upload,
        Err(e) => {
            metrics.record_upload_rejected(e.metric_reason()).await;
            return Err(e);
        }
    };
    metrics.record_upload_accepted(upload.size_bytes).await;

    let job = Job::new(
        upload.paths.file.clone(),
        upload.original_filename.clone(),
        upload.size_bytes,
    );

    let queue_depth = match store.publish_job(&job.queue_entry()).await {
        Ok(depth) => depth,
        Err(e) => {
            metrics.record_publish_failure().await;
            return Err(IntakeError::QueuePublishFailed(e));
        }
    };
    metrics.record_job_queued(queue_depth).await;
    info!("Job {} queued for {}", job.id, job.original_filename);

    let response = HttpResponse::Ok().json(SubmitResponse {
        job_id: job.id,
        status: String::from("queued"),
        filename: job.original_filename,
        size: job.size_bytes,
    });

    let duration = start_time.elapsed().as_secs_f64();
    metrics
        .record_http_request("POST", "/transcribe", "200", duration)
        .await;

    Ok(response)
}

/// Handler for job status requests
///
/// Resolves the most authoritative known disposition of a job: the terminal
/// result record if one exists, otherwise the in-flight status record,
/// otherwise 404. The stored record JSON is passed through to the client
/// verbatim. Polling reads nothing but the two record keys and writes
/// nothing, so it is idempotent.
#[get("/status/{job_id}")]
pub async fn job_status(
    job_id: web::Path<String>,
    store: web::Data<JobStore>,
    metrics: web::Data<Metrics>,
) -> Result<HttpResponse, IntakeError> {
    let start_time = Instant::now();
    let job_id = job_id.into_inner();

    let disposition = match store.fetch_disposition(&job_id).await {
        Ok(disposition) => disposition,
        Err(e) => {
            metrics.record_status_lookup("store_error").await;
            return Err(IntakeError::Store(e));
        }
    };

    let response = match disposition {
        Disposition::Completed(record) => {
            metrics.record_status_lookup("completed").await;
            HttpResponse::Ok().json(record)
        }
        Disposition::InFlight(record) => {
            metrics.record_status_lookup("in_flight").await;
            HttpResponse::Ok().json(record)
        }
        Disposition::Unknown => {
            metrics.record_status_lookup("not_found").await;
            return Err(IntakeError::JobNotFound(job_id));
        }
    };

    let duration = start_time.elapsed().as_secs_f64();
    metrics
        .record_http_request("GET", "/status/{job_id}", "200", duration)
        .await;

    Ok(response)
}
