//! In-memory background job queue.
//!
//! A queue pairs a worker command with a callback command. Enqueueing
//! returns a `JobRef` immediately; worker tasks run the worker command and
//! then feed its result to the callback. Nothing is persisted or retried.

mod context;
mod job;
mod log;

pub use context::JobContext;
pub use job::{JobState, JobSummary};
pub use log::{JobLogger, LogSink};

use crate::command::AsyncCommand;
use crate::message::JobRef;
use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;
use uuid::Uuid;

const WORKER_NAME_PREFIX: &str = "JobWorker";
const WORKER_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_HISTORY_LIMIT: usize = 256;
const SHUT_DOWN_ERROR: &str = "Job queue shut down";

type JobReceiver<R> = Arc<tokio::sync::Mutex<mpsc::Receiver<QueuedJob<R>>>>;

struct QueuedJob<R> {
    ctx: JobContext,
    request: R,
}

struct JobRecord {
    ctx: JobContext,
    state_tx: watch::Sender<JobState>,
    result: Option<serde_json::Value>,
    error: Option<String>,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

// State shared between the queue handle and its worker tasks.
struct Registry<W, C> {
    worker: W,
    callback: C,
    records: Mutex<HashMap<u64, JobRecord>>,
    // Finished jobs kept for `summary` and `wait`.
    history_limit: AtomicUsize,
}

impl<W, C> Registry<W, C>
where
    W: AsyncCommand,
    C: AsyncCommand<Request = W::Result>,
{
    async fn run_worker(self: Arc<Self>, name: &str, rx: JobReceiver<W::Request>) {
        tracing::debug!("{} started", name);

        while let Some(job) = Self::receive(&rx).await {
            let job_ref = job.ctx.job_ref;
            let registry = self.clone();
            // A panicking command takes down only its own task.
            let handle = AbortOnDropHandle::new(tokio::spawn(async move {
                registry.process(job).await;
            }));
            if let Err(e) = handle.await {
                tracing::error!("{} panicked: {}", job_ref, e);
                self.finish(job_ref.id, JobState::Failed, Some(format!("Task panic: {}", e)));
            }
        }

        tracing::debug!("{} stopped", name);
    }

    async fn receive(rx: &JobReceiver<W::Request>) -> Option<QueuedJob<W::Request>> {
        let mut rx = rx.lock().await;
        rx.recv().await
    }

    /// Runs the worker command, then the callback with its result.
    ///
    /// A job whose worker was interrupted by cancellation still reports its
    /// partial result and ends as `Cancelled`. A cancel that arrives after
    /// the worker finished its work does not change the outcome.
    async fn process(&self, job: QueuedJob<W::Request>) {
        let QueuedJob { ctx, request } = job;
        let job_ref = ctx.job_ref;

        if ctx.is_cancelled() {
            tracing::info!("{} cancelled before it started", job_ref);
            self.finish(job_ref.id, JobState::Cancelled, None);
            return;
        }

        self.set_state(job_ref.id, JobState::Started);
        let result = match self.worker.run(request, &ctx).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("{} {} failed: {:#}", job_ref, self.worker.name(), e);
                self.finish(job_ref.id, JobState::Failed, Some(format!("{:#}", e)));
                return;
            }
        };

        match serde_json::to_value(&result) {
            Ok(value) => self.update(job_ref.id, |record| record.result = Some(value)),
            Err(e) => tracing::warn!("{} result could not be serialized: {}", job_ref, e),
        }
        self.set_state(job_ref.id, JobState::Executed);

        if let Err(e) = self.callback.run(result, &ctx).await {
            tracing::warn!("{} {} failed: {:#}", job_ref, self.callback.name(), e);
            self.finish(job_ref.id, JobState::Failed, Some(format!("{:#}", e)));
            return;
        }

        let state = if ctx.is_interrupted() {
            JobState::Cancelled
        } else {
            JobState::Completed
        };
        self.finish(job_ref.id, state, None);
    }

    fn update<F: FnOnce(&mut JobRecord)>(&self, id: u64, f: F) {
        let mut records = self.records.lock().expect("Failed to lock job records");
        if let Some(record) = records.get_mut(&id) {
            f(record);
        }
    }

    // Terminal states are final.
    fn set_state(&self, id: u64, state: JobState) {
        tracing::debug!("job-{} {}", id, state);
        self.update(id, |record| {
            record.state_tx.send_if_modified(|current| {
                if current.is_terminal() {
                    return false;
                }
                *current = state;
                true
            });
        });
    }

    fn finish(&self, id: u64, state: JobState, error: Option<String>) {
        tracing::debug!("job-{} {}", id, state);
        let mut records = self.records.lock().expect("Failed to lock job records");
        if let Some(record) = records.get_mut(&id) {
            Self::close(record, state, error);
        }
        self.evict_finished(&mut records);
    }

    fn close(record: &mut JobRecord, state: JobState, error: Option<String>) {
        if record.state_tx.borrow().is_terminal() {
            return;
        }
        record.error = error;
        record.completed_at = Some(Utc::now());
        record.state_tx.send_replace(state);
    }

    // Drops the oldest finished jobs beyond the history limit.
    fn evict_finished(&self, records: &mut HashMap<u64, JobRecord>) {
        let limit = self.history_limit.load(Ordering::Relaxed);
        let mut finished: Vec<(DateTime<Utc>, u64)> = records
            .iter()
            .filter_map(|(id, record)| record.completed_at.map(|at| (at, *id)))
            .collect();
        if finished.len() <= limit {
            return;
        }

        finished.sort_unstable();
        let excess = finished.len() - limit;
        for (_, id) in finished.into_iter().take(excess) {
            records.remove(&id);
        }
        tracing::debug!("Evicted {} finished jobs", excess);
    }

    // Cancels every job that never reached a terminal state.
    fn abandon_unfinished(&self) -> usize {
        let mut records = self.records.lock().expect("Failed to lock job records");
        let mut abandoned = 0;
        for record in records.values_mut() {
            if record.state_tx.borrow().is_terminal() {
                continue;
            }
            record.ctx.cancellation_token.cancel();
            Self::close(record, JobState::Cancelled, Some(SHUT_DOWN_ERROR.to_string()));
            abandoned += 1;
        }
        self.evict_finished(&mut records);
        abandoned
    }

    fn summary(&self, job_ref: &JobRef) -> Option<JobSummary> {
        let records = self.records.lock().expect("Failed to lock job records");
        let record = records
            .get(&job_ref.id)
            .filter(|record| record.ctx.job_ref == *job_ref)?;

        Some(JobSummary {
            job_ref: record.ctx.job_ref,
            command: self.worker.name(),
            callback: self.callback.name(),
            state: *record.state_tx.borrow(),
            logs: record.ctx.logger.lines(),
            result: record.result.clone(),
            error: record.error.clone(),
            created_at: record.created_at,
            completed_at: record.completed_at,
        })
    }
}

struct HandleHolder {
    name: String,
    handle: tokio::task::JoinHandle<()>,
}

pub struct BackgroundJobs<W, C>
where
    W: AsyncCommand,
    C: AsyncCommand<Request = W::Result>,
{
    registry: Arc<Registry<W, C>>,
    next_id: AtomicU64,
    root_token: CancellationToken,
    job_tx: Option<mpsc::Sender<QueuedJob<W::Request>>>,
    job_rx: JobReceiver<W::Request>,
    handles: Vec<HandleHolder>,
}

impl<W, C> BackgroundJobs<W, C>
where
    W: AsyncCommand,
    C: AsyncCommand<Request = W::Result>,
{
    /// Creates a queue holding up to `capacity` jobs that wait for a worker.
    pub fn new(worker: W, callback: C, capacity: usize) -> Self {
        let (job_tx, job_rx) = mpsc::channel(capacity.max(1));
        Self {
            registry: Arc::new(Registry {
                worker,
                callback,
                records: Mutex::new(HashMap::new()),
                history_limit: AtomicUsize::new(DEFAULT_HISTORY_LIMIT),
            }),
            next_id: AtomicU64::new(1),
            root_token: CancellationToken::new(),
            job_tx: Some(job_tx),
            job_rx: Arc::new(tokio::sync::Mutex::new(job_rx)),
            handles: Vec::new(),
        }
    }

    /// Keeps at most `limit` finished jobs. Older ones are forgotten and
    /// `summary` returns `None` for them.
    pub fn with_history_limit(self, limit: usize) -> Self {
        self.registry
            .history_limit
            .store(limit.max(1), Ordering::Relaxed);
        self
    }

    pub fn start(&mut self, num_workers: usize) {
        let first_id = self.handles.len();
        for i in first_id..first_id + num_workers {
            let name = format!("{}-{}", WORKER_NAME_PREFIX, i);
            let registry = self.registry.clone();
            let rx = self.job_rx.clone();
            let task_name = name.clone();

            let handle = tokio::spawn(async move {
                registry.run_worker(&task_name, rx).await;
            });
            self.handles.push(HandleHolder { name, handle });
        }

        tracing::info!(
            "BackgroundJobs started {} workers for {}",
            num_workers,
            self.registry.worker.name()
        );
    }

    /// Queues `request` for the worker command. Waits only while the queue
    /// is full.
    pub async fn enqueue(&self, request: W::Request) -> Result<JobRef> {
        let tx = self.job_tx.as_ref().context("Job queue is shut down")?;
        let job_ref = JobRef {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            ref_id: Uuid::new_v4(),
        };
        let ctx = JobContext::new(job_ref, self.root_token.child_token());
        let (state_tx, _) = watch::channel(JobState::Queued);

        self.registry
            .records
            .lock()
            .expect("Failed to lock job records")
            .insert(
                job_ref.id,
                JobRecord {
                    ctx: ctx.clone(),
                    state_tx,
                    result: None,
                    error: None,
                    created_at: Utc::now(),
                    completed_at: None,
                },
            );

        if tx.send(QueuedJob { ctx, request }).await.is_err() {
            self.registry
                .records
                .lock()
                .expect("Failed to lock job records")
                .remove(&job_ref.id);
            return Err(anyhow!("Failed to enqueue {}: job channel closed", job_ref));
        }

        tracing::info!("{} enqueued for {}", job_ref, self.registry.worker.name());
        Ok(job_ref)
    }

    /// Requests cancellation of one job. Returns `false` for an unknown job.
    pub fn cancel(&self, job_ref: &JobRef) -> bool {
        let records = self.registry.records.lock().expect("Failed to lock job records");
        match records
            .get(&job_ref.id)
            .filter(|record| record.ctx.job_ref == *job_ref)
        {
            Some(record) => {
                tracing::info!("{} cancellation requested", job_ref);
                record.ctx.cancellation_token.cancel();
                true
            }
            None => false,
        }
    }

    /// Requests cancellation of every queued and running job.
    pub fn cancel_all(&self) {
        tracing::info!("Cancelling all jobs");
        self.root_token.cancel();
    }

    pub fn summary(&self, job_ref: &JobRef) -> Option<JobSummary> {
        self.registry.summary(job_ref)
    }

    /// Waits until the job reaches a terminal state.
    pub async fn wait(&self, job_ref: &JobRef) -> Option<JobSummary> {
        let mut state_rx = {
            let records = self.registry.records.lock().expect("Failed to lock job records");
            records
                .get(&job_ref.id)
                .filter(|record| record.ctx.job_ref == *job_ref)?
                .state_tx
                .subscribe()
        };

        if state_rx.wait_for(JobState::is_terminal).await.is_err() {
            tracing::warn!("{} state channel closed while waiting", job_ref);
        }
        self.summary(job_ref)
    }

    /// Stops accepting jobs and waits for the workers to drain the queue.
    ///
    /// Jobs still queued or running once the workers are gone end as
    /// `Cancelled`.
    pub async fn shutdown(&mut self) {
        tracing::info!("Shutting down BackgroundJobs with {} workers", self.handles.len());
        self.job_tx.take();

        for mut holder in self.handles.drain(..) {
            match tokio::time::timeout(WORKER_SHUTDOWN_TIMEOUT, &mut holder.handle).await {
                Ok(_) => {
                    tracing::debug!("{} completed successfully", holder.name);
                }
                Err(_) => {
                    tracing::warn!("{} did not shut down in time, aborting", holder.name);
                    holder.handle.abort();
                }
            }
        }

        let abandoned = self.registry.abandon_unfinished();
        if abandoned > 0 {
            tracing::warn!("{} unfinished jobs cancelled by shutdown", abandoned);
        }
        tracing::info!("BackgroundJobs shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CheckUrlsCommand, CheckUrlsReportCommand};
    use crate::config::BatchConfig;
    use crate::message::{CheckUrls, EnqueueRequest};
    use async_trait::async_trait;
    use httptest::{Expectation, Server, matchers::*, responders::*};
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    struct CountCommand;

    #[async_trait]
    impl AsyncCommand for CountCommand {
        type Request = Vec<String>;
        type Result = usize;

        fn name(&self) -> &'static str {
            "CountCommand"
        }

        async fn run(&self, request: Vec<String>, ctx: &JobContext) -> Result<usize> {
            ctx.logger.log(&format!("counting {} items", request.len()));
            Ok(request.len())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl AsyncCommand for FailingCommand {
        type Request = Vec<String>;
        type Result = usize;

        fn name(&self) -> &'static str {
            "FailingCommand"
        }

        async fn run(&self, _request: Vec<String>, _ctx: &JobContext) -> Result<usize> {
            Err(anyhow!("boom"))
        }
    }

    // Signals once it runs, then returns only when its job is cancelled.
    struct UntilCancelled {
        started: Arc<Notify>,
    }

    #[async_trait]
    impl AsyncCommand for UntilCancelled {
        type Request = Vec<String>;
        type Result = usize;

        fn name(&self) -> &'static str {
            "UntilCancelled"
        }

        async fn run(&self, _request: Vec<String>, ctx: &JobContext) -> Result<usize> {
            self.started.notify_one();
            ctx.cancellation_token.cancelled().await;
            ctx.mark_interrupted();
            Ok(0)
        }
    }

    // Panics on an empty request.
    struct PickyCommand;

    #[async_trait]
    impl AsyncCommand for PickyCommand {
        type Request = Vec<String>;
        type Result = usize;

        fn name(&self) -> &'static str {
            "PickyCommand"
        }

        async fn run(&self, request: Vec<String>, _ctx: &JobContext) -> Result<usize> {
            assert!(!request.is_empty(), "empty request");
            Ok(request.len())
        }
    }

    // Ignores cancellation and takes longer than the shutdown timeout.
    struct SlowCommand {
        started: Arc<Notify>,
    }

    #[async_trait]
    impl AsyncCommand for SlowCommand {
        type Request = Vec<String>;
        type Result = usize;

        fn name(&self) -> &'static str {
            "SlowCommand"
        }

        async fn run(&self, request: Vec<String>, _ctx: &JobContext) -> Result<usize> {
            self.started.notify_one();
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(request.len())
        }
    }

    // Cancels its own job once the work is already done.
    struct LateCancelCallback;

    #[async_trait]
    impl AsyncCommand for LateCancelCallback {
        type Request = usize;
        type Result = ();

        fn name(&self) -> &'static str {
            "LateCancelCallback"
        }

        async fn run(&self, _request: usize, ctx: &JobContext) -> Result<()> {
            ctx.cancellation_token.cancel();
            Ok(())
        }
    }

    struct LogCallback;

    #[async_trait]
    impl AsyncCommand for LogCallback {
        type Request = usize;
        type Result = ();

        fn name(&self) -> &'static str {
            "LogCallback"
        }

        async fn run(&self, request: usize, ctx: &JobContext) -> Result<()> {
            ctx.logger.log(&format!("got {}", request));
            Ok(())
        }
    }

    fn items(n: usize) -> Vec<String> {
        (0..n).map(|i| i.to_string()).collect()
    }

    #[tokio::test]
    async fn test_enqueue_returns_before_job_runs() {
        let mut jobs = BackgroundJobs::new(CountCommand, LogCallback, 4);

        let job_ref = jobs.enqueue(items(2)).await.unwrap();
        assert_eq!(job_ref.id, 1);
        assert_eq!(jobs.summary(&job_ref).unwrap().state, JobState::Queued);

        jobs.start(1);
        let summary = jobs.wait(&job_ref).await.unwrap();

        assert_eq!(summary.state, JobState::Completed);
        assert_eq!(summary.command, "CountCommand");
        assert_eq!(summary.callback, "LogCallback");
        assert_eq!(summary.logs, vec!["counting 2 items", "got 2"]);
        assert_eq!(summary.result, Some(serde_json::json!(2)));
        assert!(summary.completed_at.is_some());
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_job_ids_increase() {
        let mut jobs = BackgroundJobs::new(CountCommand, LogCallback, 4);
        jobs.start(2);

        let first = jobs.enqueue(items(1)).await.unwrap();
        let second = jobs.enqueue(items(3)).await.unwrap();

        assert_eq!(second.id, first.id + 1);
        assert_ne!(first.ref_id, second.ref_id);
        assert_eq!(jobs.wait(&second).await.unwrap().result, Some(serde_json::json!(3)));
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_failing_worker_skips_callback() {
        let mut jobs = BackgroundJobs::new(FailingCommand, LogCallback, 4);
        jobs.start(1);

        let job_ref = jobs.enqueue(items(1)).await.unwrap();
        let summary = jobs.wait(&job_ref).await.unwrap();

        assert_eq!(summary.state, JobState::Failed);
        assert_eq!(summary.error.as_deref(), Some("boom"));
        assert!(summary.logs.is_empty());
        assert!(summary.result.is_none());
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_before_start() {
        let mut jobs = BackgroundJobs::new(CountCommand, LogCallback, 4);
        let job_ref = jobs.enqueue(items(1)).await.unwrap();

        assert!(jobs.cancel(&job_ref));
        jobs.start(1);
        let summary = jobs.wait(&job_ref).await.unwrap();

        assert_eq!(summary.state, JobState::Cancelled);
        assert!(summary.logs.is_empty());
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_running_job_still_runs_callback() {
        let started = Arc::new(Notify::new());
        let mut jobs = BackgroundJobs::new(
            UntilCancelled {
                started: started.clone(),
            },
            LogCallback,
            4,
        );
        jobs.start(1);

        let job_ref = jobs.enqueue(items(1)).await.unwrap();
        started.notified().await;
        jobs.cancel_all();
        let summary = jobs.wait(&job_ref).await.unwrap();

        assert_eq!(summary.state, JobState::Cancelled);
        assert_eq!(summary.logs, vec!["got 0"]);
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel_after_work_done_completes() {
        let mut jobs = BackgroundJobs::new(CountCommand, LateCancelCallback, 4);
        jobs.start(1);

        let job_ref = jobs.enqueue(items(2)).await.unwrap();
        let summary = jobs.wait(&job_ref).await.unwrap();

        assert_eq!(summary.state, JobState::Completed);
        assert_eq!(summary.result, Some(serde_json::json!(2)));
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_panicking_command_fails_job_and_worker_survives() {
        let mut jobs = BackgroundJobs::new(PickyCommand, LogCallback, 4);
        jobs.start(1);

        let panicked = jobs.enqueue(Vec::new()).await.unwrap();
        let summary = tokio::time::timeout(Duration::from_secs(5), jobs.wait(&panicked))
            .await
            .expect("wait on a panicked job should resolve")
            .unwrap();

        assert_eq!(summary.state, JobState::Failed);
        assert!(
            summary.error.as_deref().unwrap_or_default().starts_with("Task panic"),
            "error {:?}",
            summary.error
        );
        assert!(summary.completed_at.is_some());

        let next = jobs.enqueue(items(2)).await.unwrap();
        assert_eq!(jobs.wait(&next).await.unwrap().state, JobState::Completed);
        jobs.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_unfinished_jobs() {
        let started = Arc::new(Notify::new());
        let mut jobs = BackgroundJobs::new(
            SlowCommand {
                started: started.clone(),
            },
            LogCallback,
            4,
        );
        jobs.start(1);

        let running = jobs.enqueue(items(1)).await.unwrap();
        let queued = jobs.enqueue(items(2)).await.unwrap();
        started.notified().await;
        jobs.shutdown().await;

        for job_ref in [&running, &queued] {
            let summary = tokio::time::timeout(Duration::from_secs(1), jobs.wait(job_ref))
                .await
                .expect("wait after shutdown should resolve")
                .unwrap();
            assert_eq!(summary.state, JobState::Cancelled);
            assert_eq!(summary.error.as_deref(), Some("Job queue shut down"));
            assert!(summary.completed_at.is_some());
            assert!(summary.result.is_none());
        }
    }

    #[tokio::test]
    async fn test_shutdown_without_workers_cancels_queued_jobs() {
        let mut jobs = BackgroundJobs::new(CountCommand, LogCallback, 4);
        let job_ref = jobs.enqueue(items(1)).await.unwrap();

        jobs.shutdown().await;

        assert_eq!(jobs.wait(&job_ref).await.unwrap().state, JobState::Cancelled);
    }

    #[tokio::test]
    async fn test_finished_jobs_beyond_history_limit_are_forgotten() {
        let mut jobs = BackgroundJobs::new(CountCommand, LogCallback, 4).with_history_limit(2);
        jobs.start(1);

        let mut refs = Vec::new();
        for n in 1..=3 {
            let job_ref = jobs.enqueue(items(n)).await.unwrap();
            jobs.wait(&job_ref).await.unwrap();
            refs.push(job_ref);
        }

        assert!(jobs.summary(&refs[0]).is_none());
        assert_eq!(jobs.summary(&refs[1]).unwrap().result, Some(serde_json::json!(2)));
        assert_eq!(jobs.summary(&refs[2]).unwrap().result, Some(serde_json::json!(3)));
        jobs.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let jobs = BackgroundJobs::new(CountCommand, LogCallback, 4);
        let unknown = JobRef {
            id: 42,
            ref_id: Uuid::new_v4(),
        };

        assert!(!jobs.cancel(&unknown));
        assert!(jobs.summary(&unknown).is_none());
        assert!(jobs.wait(&unknown).await.is_none());
    }

    #[tokio::test]
    async fn test_enqueue_after_shutdown_fails() {
        let mut jobs = BackgroundJobs::new(CountCommand, LogCallback, 4);
        jobs.start(1);
        jobs.shutdown().await;

        assert!(jobs.enqueue(items(1)).await.is_err());
    }

    #[tokio::test]
    async fn test_check_urls_job_end_to_end() {
        let server = Server::run();
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/up")).respond_with(status_code(200)),
        );
        server.expect(
            Expectation::matching(request::method_path("HEAD", "/down"))
                .respond_with(status_code(503)),
        );

        let command = CheckUrlsCommand::new(&BatchConfig {
            timeout: Duration::from_secs(3),
            delay: Duration::ZERO,
        });
        let mut jobs = BackgroundJobs::new(command, CheckUrlsReportCommand::new(), 4);
        jobs.start(1);

        let up = server.url_str("/up");
        let down = server.url_str("/down");
        let request: CheckUrls = EnqueueRequest::new(format!("{}\n\n  \n{}", up, down)).into_check_urls();
        let job_ref = jobs.enqueue(request).await.unwrap();
        let summary = jobs.wait(&job_ref).await.unwrap();

        assert_eq!(summary.state, JobState::Completed);
        assert_eq!(
            summary.result,
            Some(serde_json::json!({ "urlStatuses": { up.clone(): true, down.clone(): false } }))
        );
        let report: Vec<_> = summary
            .logs
            .iter()
            .skip_while(|line| !line.starts_with("Reporting on"))
            .cloned()
            .collect();
        assert_eq!(
            report,
            vec![
                "Reporting on 2 URLs".to_string(),
                format!("{} is up", up),
                format!("{} is down", down),
            ]
        );
        jobs.shutdown().await;
    }
}
