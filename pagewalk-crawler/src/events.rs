use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Status updates emitted while a crawl runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CrawlEvent {
    Fetching { url: String, depth: u32 },
    Saved { url: String, path: PathBuf },
    FetchFailed { url: String, reason: String },
    NonSuccessStatus { url: String, status: u16 },
    StorageFailed { url: String, reason: String },
    LinkSkipped { url: String, link: String, reason: String },
    LinkCapReached { url: String, cap: usize },
    BranchFailed { url: String, reason: String },
}

impl CrawlEvent {
    pub fn url(&self) -> &str {
        match self {
            CrawlEvent::Fetching { url, .. }
            | CrawlEvent::Saved { url, .. }
            | CrawlEvent::FetchFailed { url, .. }
            | CrawlEvent::NonSuccessStatus { url, .. }
            | CrawlEvent::StorageFailed { url, .. }
            | CrawlEvent::LinkSkipped { url, .. }
            | CrawlEvent::LinkCapReached { url, .. }
            | CrawlEvent::BranchFailed { url, .. } => url,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            CrawlEvent::FetchFailed { .. }
                | CrawlEvent::NonSuccessStatus { .. }
                | CrawlEvent::StorageFailed { .. }
                | CrawlEvent::BranchFailed { .. }
        )
    }
}

impl fmt::Display for CrawlEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlEvent::Fetching { url, depth } => write!(f, "fetching {} (depth {})", url, depth),
            CrawlEvent::Saved { url, path } => write!(f, "saved {} to {}", url, path.display()),
            CrawlEvent::FetchFailed { url, reason } => {
                write!(f, "failed to fetch {}: {}", url, reason)
            }
            CrawlEvent::NonSuccessStatus { url, status } => {
                write!(f, "{} returned status {}", url, status)
            }
            CrawlEvent::StorageFailed { url, reason } => {
                write!(f, "could not save {}: {}", url, reason)
            }
            CrawlEvent::LinkSkipped { url, link, reason } => {
                write!(f, "skipped link '{}' on {}: {}", link, url, reason)
            }
            CrawlEvent::LinkCapReached { url, cap } => {
                write!(f, "link cap of {} reached on {}", cap, url)
            }
            CrawlEvent::BranchFailed { url, reason } => {
                write!(f, "crawl of {} failed: {}", url, reason)
            }
        }
    }
}

/// Callback for reporting crawl events as they happen
pub type EventCallback = Arc<dyn Fn(&CrawlEvent) + Send + Sync>;
