use crate::message::JobRef;
use std::sync::{Arc, Mutex};

/// Destination for the human-readable lines a command produces.
pub trait LogSink: Send + Sync {
    fn log(&self, line: &str);
}

/// Forwards every line to tracing and keeps a copy in the job's own log.
///
/// Clones share the same buffer.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_ref: JobRef,
    lines: Arc<Mutex<Vec<String>>>,
}

impl JobLogger {
    pub fn new(job_ref: JobRef) -> Self {
        Self {
            job_ref,
            lines: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn job_ref(&self) -> JobRef {
        self.job_ref
    }

    /// Snapshot of the lines logged so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("Failed to lock job log").clone()
    }
}

impl LogSink for JobLogger {
    fn log(&self, line: &str) {
        tracing::info!(job = %self.job_ref, "{}", line);
        self.lines
            .lock()
            .expect("Failed to lock job log")
            .push(line.to_string());
    }
}
