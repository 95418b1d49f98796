//! Shared job store client for the transcription pipeline
//!
//! This module implements the producer side of the work queue and the
//! read-only view of worker-written job records. The intake service owns
//! exactly two interactions with the store: one atomic append per accepted
//! upload, and single-key reads when a client polls. All other mutation of
//! the keyspace belongs to the workers, so no locking is needed here: the
//! store's own command atomicity is the only synchronization.

use log::debug;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use serde_json::Value;
use thiserror::Error;

use crate::config::StoreConfig;
use crate::models::QueueEntry;

/// Name of the shared FIFO work queue, a wire contract with the workers
pub const WORK_QUEUE: &str = "transcription_queue";

/// Key of the terminal result record for a job
pub fn result_key(job_id: &str) -> String {
    format!("job:{}:result", job_id)
}

/// Key of the in-flight status record for a job
pub fn status_key(job_id: &str) -> String {
    format!("job:{}:status", job_id)
}

/// Job store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store is unreachable or a command failed
    #[error("store command failed: {0}")]
    Connection(#[from] redis::RedisError),

    /// A worker-written record did not parse as JSON
    #[error("malformed record at {key}: {source}")]
    CorruptRecord {
        key: String,
        source: serde_json::Error,
    },

    /// The queue entry could not be serialized
    #[error("failed to encode queue entry: {0}")]
    Encode(serde_json::Error),
}

/// Most authoritative known disposition of a job
///
/// A result record supersedes a status record: completion is terminal and
/// never retracted, while status records describe in-flight state only.
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// Terminal result record written by a worker
    Completed(Value),
    /// Non-terminal status record written by a worker
    InFlight(Value),
    /// Neither record exists for this job id
    Unknown,
}

/// Client for the shared job store
///
/// Constructed once at startup and cloned into request handlers; the
/// underlying multiplexed connection is shared and reconnects on its own.
#[derive(Clone)]
pub struct JobStore {
    connection: ConnectionManager,
}

impl JobStore {
    /// Connect to the store
    ///
    /// The connection lives for the whole process; dropping the last clone at
    /// shutdown closes it.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let client = redis::Client::open(config.url())?;
        let connection = client.get_connection_manager().await?;
        Ok(Self { connection })
    }

    /// Atomically append a queue entry to the work queue
    ///
    /// A single LPUSH is race-free under concurrent submissions; the workers
    /// BRPOP from the opposite end, so entries are consumed in submission
    /// order. Exactly one entry is produced per accepted upload, there is no
    /// acknowledgement tracking, so delivery is at-least-once at best.
    ///
    /// Returns the queue depth after the append, as reported by the store.
    pub async fn publish_job(&self, entry: &QueueEntry) -> Result<usize, StoreError> {
        let payload = serde_json::to_string(entry).map_err(StoreError::Encode)?;
        let mut connection = self.connection.clone();
        let depth: usize = connection.lpush(WORK_QUEUE, payload).await?;
        debug!("Published job {} to {} (depth {})", entry.job_id, WORK_QUEUE, depth);
        Ok(depth)
    }

    /// Resolve the current disposition of a job
    ///
    /// Two explicit reads in precedence order: the result record first, and
    /// the status record only when no result exists yet.
    pub async fn fetch_disposition(&self, job_id: &str) -> Result<Disposition, StoreError> {
        let mut connection = self.connection.clone();

        let result_raw: Option<String> = connection.get(result_key(job_id)).await?;
        if result_raw.is_some() {
            return resolve_disposition(job_id, result_raw.as_deref(), None);
        }

        let status_raw: Option<String> = connection.get(status_key(job_id)).await?;
        resolve_disposition(job_id, None, status_raw.as_deref())
    }
}

/// Precedence rule between the two record keyspaces
///
/// Kept free of I/O so the lookup order is testable without a live store:
/// result record wins, then status record, then `Unknown`.
pub fn resolve_disposition(
    job_id: &str,
    result_raw: Option<&str>,
    status_raw: Option<&str>,
) -> Result<Disposition, StoreError> {
    if let Some(raw) = result_raw {
        let record = serde_json::from_str(raw).map_err(|source| StoreError::CorruptRecord {
            key: result_key(job_id),
            source,
        })?;
        return Ok(Disposition::Completed(record));
    }

    if let Some(raw) = status_raw {
        let record = serde_json::from_str(raw).map_err(|source| StoreError::CorruptRecord {
            key: status_key(job_id),
            source,
        })?;
        return Ok(Disposition::InFlight(record));
    }

    Ok(Disposition::Unknown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_keys_are_namespaced_by_job_id() {
        assert_eq!(result_key("abc"), "job:abc:result");
        assert_eq!(status_key("abc"), "job:abc:status");
    }

    #[test]
    fn result_record_takes_precedence_over_status() {
        let disposition = resolve_disposition(
            "abc",
            Some(r#"{"transcript":"hello"}"#),
            Some(r#"{"state":"processing"}"#),
        )
        .unwrap();

        assert_eq!(disposition, Disposition::Completed(json!({"transcript": "hello"})));
    }

    #[test]
    fn status_record_is_returned_when_no_result_exists() {
        let disposition =
            resolve_disposition("abc", None, Some(r#"{"state":"processing"}"#)).unwrap();

        assert_eq!(disposition, Disposition::InFlight(json!({"state": "processing"})));
    }

    #[test]
    fn unknown_when_neither_record_exists() {
        assert_eq!(resolve_disposition("abc", None, None).unwrap(), Disposition::Unknown);
    }

    #[test]
    fn malformed_result_record_is_a_corrupt_record_error() {
        let err = resolve_disposition("abc", Some("not json"), None).unwrap_err();
        match err {
            StoreError::CorruptRecord { key, .. } => assert_eq!(key, "job:abc:result"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn malformed_status_record_is_a_corrupt_record_error() {
        let err = resolve_disposition("abc", None, Some("{truncated")).unwrap_err();
        match err {
            StoreError::CorruptRecord { key, .. } => assert_eq!(key, "job:abc:status"),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn repeated_resolution_is_stable() {
        // Polling is idempotent: the same inputs resolve the same way
        let raw = r#"{"status":"completed","text":"done"}"#;
        let first = resolve_disposition("abc", Some(raw), None).unwrap();
        let second = resolve_disposition("abc", Some(raw), None).unwrap();
        assert_eq!(first, second);
    }
}
