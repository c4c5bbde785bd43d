use super::log::JobLogger;
use crate::message::JobRef;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio_util::sync::CancellationToken;

/// Context handed to a command while it runs as part of a background job.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub job_ref: JobRef,

    /// Cancelled when the job, or the whole queue, is asked to stop.
    pub cancellation_token: CancellationToken,

    /// Writes to tracing and to the job's own log.
    pub logger: JobLogger,

    interrupted: Arc<AtomicBool>,
}

impl JobContext {
    pub fn new(job_ref: JobRef, cancellation_token: CancellationToken) -> Self {
        Self {
            job_ref,
            cancellation_token,
            logger: JobLogger::new(job_ref),
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation_token.is_cancelled()
    }

    /// Records that cancellation cut the command's work short.
    pub fn mark_interrupted(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }
}
