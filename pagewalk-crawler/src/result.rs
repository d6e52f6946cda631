use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// What a fetcher hands back for one URL. Only the status and the body text
/// matter to the crawl; headers are never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Totals for one crawl run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlSummary {
    pub seed_url: String,
    pub max_depth: u32,
    pub urls_visited: usize,
    pub pages_fetched: usize,
    pub pages_saved: usize,
    pub fetch_failures: usize,
    pub non_success_statuses: usize,
    pub storage_failures: usize,
    pub links_skipped: usize,
    pub branch_failures: usize,
    pub elapsed: Duration,
}

impl CrawlSummary {
    pub fn failures(&self) -> usize {
        self.fetch_failures
            + self.non_success_statuses
            + self.storage_failures
            + self.branch_failures
    }
}

/// Counters shared by every branch of a run.
#[derive(Debug, Default)]
pub(crate) struct RunCounters {
    pub pages_fetched: AtomicUsize,
    pub pages_saved: AtomicUsize,
    pub fetch_failures: AtomicUsize,
    pub non_success_statuses: AtomicUsize,
    pub storage_failures: AtomicUsize,
    pub links_skipped: AtomicUsize,
    pub branch_failures: AtomicUsize,
}

impl RunCounters {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn summarize(
        &self,
        seed_url: String,
        max_depth: u32,
        urls_visited: usize,
        elapsed: Duration,
    ) -> CrawlSummary {
        CrawlSummary {
            seed_url,
            max_depth,
            urls_visited,
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_saved: self.pages_saved.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            non_success_statuses: self.non_success_statuses.load(Ordering::Relaxed),
            storage_failures: self.storage_failures.load(Ordering::Relaxed),
            links_skipped: self.links_skipped.load(Ordering::Relaxed),
            branch_failures: self.branch_failures.load(Ordering::Relaxed),
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(FetchResponse::new(200, "").is_success());
        assert!(FetchResponse::new(204, "").is_success());
        assert!(!FetchResponse::new(199, "").is_success());
        assert!(!FetchResponse::new(301, "").is_success());
        assert!(!FetchResponse::new(404, "").is_success());
    }

    #[test]
    fn test_summary_failures_total() {
        let summary = CrawlSummary {
            fetch_failures: 1,
            non_success_statuses: 2,
            storage_failures: 3,
            branch_failures: 4,
            links_skipped: 100,
            ..Default::default()
        };
        assert_eq!(summary.failures(), 10);
    }
}
