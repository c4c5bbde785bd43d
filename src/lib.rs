//! Rate-limited URL health checks run as background jobs.
//!
//! A `CheckUrlsCommand` probes a list of URLs one at a time with HEAD
//! requests and hands the resulting status map to a
//! `CheckUrlsReportCommand`, which writes one `"<url> is <up|down>"` line
//! per URL to the job log.

pub mod batch;
pub mod command;
pub mod config;
pub mod jobs;
pub mod logger;
pub mod message;
pub mod probe;
pub mod reporter;

pub use batch::{BatchOutcome, UrlCheckBatch};
pub use command::{AsyncCommand, CheckUrlsCommand, CheckUrlsReportCommand};
pub use config::Config;
pub use jobs::{BackgroundJobs, JobContext, JobLogger, JobState, JobSummary, LogSink};
pub use message::{
    CheckUrls, CheckUrlsResult, EnqueueRequest, EnqueueResponse, JobRef, UrlList, UrlStatusMap,
};
pub use probe::{HttpProber, ProbeFailure, ProbeOutcome, Prober};
pub use reporter::UrlCheckReporter;
