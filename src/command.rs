use crate::batch::UrlCheckBatch;
use crate::config::BatchConfig;
use crate::jobs::JobContext;
use crate::message::{CheckUrls, CheckUrlsResult};
use crate::reporter::UrlCheckReporter;
use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt::Debug;

/// A unit of work the job queue can run, either as a worker or a callback.
#[async_trait]
pub trait AsyncCommand: Send + Sync + 'static {
    type Request: Debug + Send + Sync + 'static;
    type Result: Debug + Serialize + Send + Sync + 'static;

    /// Returns the name of this command for logging purposes.
    fn name(&self) -> &'static str;

    async fn run(&self, request: Self::Request, ctx: &JobContext) -> Result<Self::Result>;
}

/// Worker command: checks every URL of the request.
pub struct CheckUrlsCommand {
    batch: UrlCheckBatch,
}

impl CheckUrlsCommand {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            batch: UrlCheckBatch::new(config),
        }
    }
}

#[async_trait]
impl AsyncCommand for CheckUrlsCommand {
    type Request = CheckUrls;
    type Result = CheckUrlsResult;

    fn name(&self) -> &'static str {
        "CheckUrlsCommand"
    }

    async fn run(&self, request: CheckUrls, ctx: &JobContext) -> Result<CheckUrlsResult> {
        let outcome = self
            .batch
            .run(&request.urls, &ctx.cancellation_token, &ctx.logger)
            .await?;
        if outcome.stopped_early {
            ctx.mark_interrupted();
        }
        Ok(CheckUrlsResult {
            url_statuses: outcome.statuses,
        })
    }
}

/// Callback command: reports the result of a `CheckUrlsCommand`.
#[derive(Default)]
pub struct CheckUrlsReportCommand {
    reporter: UrlCheckReporter,
}

impl CheckUrlsReportCommand {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AsyncCommand for CheckUrlsReportCommand {
    type Request = CheckUrlsResult;
    type Result = ();

    fn name(&self) -> &'static str {
        "CheckUrlsReportCommand"
    }

    async fn run(&self, request: CheckUrlsResult, ctx: &JobContext) -> Result<()> {
        self.reporter.report(&request.url_statuses, &ctx.logger);
        Ok(())
    }
}
