use crate::jobs::LogSink;
use crate::message::UrlStatusMap;

/// Formats one reachability line, e.g. `https://example.com is up`.
pub fn status_line(url: &str, up: bool) -> String {
    format!("{} is {}", url, if up { "up" } else { "down" })
}

/// Emits one line per checked URL, in the order the batch probed them.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlCheckReporter;

impl UrlCheckReporter {
    pub fn new() -> Self {
        Self
    }

    /// The per-URL lines `report` writes, without the header.
    pub fn render(&self, statuses: &UrlStatusMap) -> Vec<String> {
        statuses
            .iter()
            .map(|(url, up)| status_line(url, up))
            .collect()
    }

    pub fn report(&self, statuses: &UrlStatusMap, log: &dyn LogSink) {
        log.log(&format!("Reporting on {} URLs", statuses.len()));
        for line in self.render(statuses) {
            log.log(&line);
        }
    }
}
