/// Batch module for the pulse-check system
///
/// Runs one URL check batch: normalizes the candidate list, probes each URL
/// in order with a HEAD request and pauses between probes. Probes never run
/// concurrently, which caps the outbound rate at one request per `delay`.
use crate::config::BatchConfig;
use crate::jobs::LogSink;
use crate::message::UrlStatusMap;
use crate::probe::{HttpProber, ProbeOutcome, Prober};
use crate::reporter::status_line;
use anyhow::Result;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Statuses gathered by one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub statuses: UrlStatusMap,

    /// Set when cancellation stopped the batch before every URL was checked.
    pub stopped_early: bool,
}

#[derive(Debug, Clone)]
pub struct UrlCheckBatch {
    timeout: Duration,
    delay: Duration,
}

impl UrlCheckBatch {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            timeout: config.timeout,
            delay: config.delay,
        }
    }

    /// Checks `urls` with a reqwest client that lives only for this call.
    ///
    /// Fails only if the client cannot be built. Per-URL failures and
    /// cancellation never surface as errors.
    pub async fn run(
        &self,
        urls: &[String],
        cancel: &CancellationToken,
        log: &dyn LogSink,
    ) -> Result<BatchOutcome> {
        let prober = HttpProber::new(self.timeout)?;
        Ok(self.run_with(&prober, urls, cancel, log).await)
    }

    /// Checks `urls` with the given prober.
    ///
    /// Returns the statuses accumulated so far once `cancel` fires. A probe
    /// interrupted by cancellation is not recorded.
    pub async fn run_with(
        &self,
        prober: &dyn Prober,
        urls: &[String],
        cancel: &CancellationToken,
        log: &dyn LogSink,
    ) -> BatchOutcome {
        let candidates = normalize(urls);
        let mut statuses = UrlStatusMap::new();
        let mut probed_any = false;
        let mut stopped_early = false;

        log.log(&format!("Checking {} URLs", candidates.len()));

        for url in candidates {
            if statuses.contains(url) {
                tracing::debug!("{} already checked, skipping", url);
                continue;
            }

            if probed_any {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => {
                        stopped_early = true;
                        break;
                    }
                    _ = tokio::time::sleep(self.delay) => {}
                }
            }
            if cancel.is_cancelled() {
                stopped_early = true;
                break;
            }

            log.log(&format!("Checking {}", url));
            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    stopped_early = true;
                    break;
                }
                outcome = prober.probe(url) => outcome,
            };
            probed_any = true;

            if let ProbeOutcome::Failure(reason) = &outcome {
                tracing::debug!("{} unreachable: {}", url, reason);
            }
            let up = outcome.is_up();
            statuses.insert(url, up);
            log.log(&status_line(url, up));
        }

        if stopped_early {
            log.log(&format!(
                "Cancelled after checking {} URLs",
                statuses.len()
            ));
        }
        log.log(&format!(
            "Finished checking URLs, {} up, {} down",
            statuses.up_count(),
            statuses.down_count()
        ));

        BatchOutcome {
            statuses,
            stopped_early,
        }
    }
}

impl Default for UrlCheckBatch {
    fn default() -> Self {
        Self::new(&BatchConfig::default())
    }
}

// Trims every entry and drops the ones left empty.
fn normalize(urls: &[String]) -> Vec<&str> {
    urls.iter()
        .map(|url| url.trim())
        .filter(|url| !url.is_empty())
        .collect()
}
