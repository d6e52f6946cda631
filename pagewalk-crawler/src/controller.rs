use crate::config::CrawlConfig;
use crate::error::{CrawlError, Result};
use crate::events::{CrawlEvent, EventCallback};
use crate::extractor::extract_links;
use crate::fetcher::Fetcher;
use crate::result::{CrawlSummary, RunCounters};
use crate::storage::Storage;
use crate::url_utils::{
    file_name_for_url, is_http_scheme, normalize_url, normalize_url_str, resolve_link,
};
use futures::StreamExt;
use futures::future::BoxFuture;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};

/// State owned by a single call to [`CrawlController::crawl`].
struct CrawlRun {
    visited: Mutex<HashSet<String>>,
    counters: RunCounters,
    /// Caps fetches in flight across the whole tree, not per level.
    fetch_permits: Semaphore,
}

impl CrawlRun {
    fn new(concurrency: usize) -> Self {
        Self {
            visited: Mutex::new(HashSet::new()),
            counters: RunCounters::default(),
            fetch_permits: Semaphore::new(concurrency),
        }
    }

    /// Marks `url` visited. Returns false if it already was.
    async fn mark_visited(&self, url: &str) -> bool {
        self.visited.lock().await.insert(url.to_string())
    }

    async fn visited_count(&self) -> usize {
        self.visited.lock().await.len()
    }
}

/// Depth-first recursive page downloader.
///
/// Each call to [`crawl`](Self::crawl) starts from an empty visited set, so one
/// controller can drive any number of independent runs.
pub struct CrawlController<F, S> {
    fetcher: F,
    storage: S,
    config: Option<CrawlConfig>,
    concurrency: usize,
    event_callback: Option<EventCallback>,
}

impl<F: Fetcher, S: Storage> CrawlController<F, S> {
    /// Creates an unconfigured controller. [`configure`](Self::configure) must be
    /// called before a crawl with a non-zero depth.
    pub fn new(fetcher: F, storage: S) -> Self {
        Self {
            fetcher,
            storage,
            config: None,
            concurrency: 1,
            event_callback: None,
        }
    }

    pub fn configure(
        &mut self,
        output_destination: impl Into<PathBuf>,
        max_links_per_page: usize,
    ) -> Result<()> {
        self.config = Some(CrawlConfig::new(output_destination, max_links_per_page)?);
        Ok(())
    }

    /// Number of pages fetched at once across the whole run. 1 (the default)
    /// keeps the strict depth-first order: a link's whole subtree finishes
    /// before the next sibling starts.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    pub fn config(&self) -> Option<&CrawlConfig> {
        self.config.as_ref()
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Crawls from `seed_url`, following links until `max_depth` levels have
    /// been fetched. A depth of 0 does nothing.
    ///
    /// Only configuration and input errors for the seed itself are returned;
    /// everything that goes wrong further down is reported through events and
    /// counted in the summary.
    pub async fn crawl(&self, seed_url: &str, max_depth: u32) -> Result<CrawlSummary> {
        let start = Instant::now();
        let run = CrawlRun::new(self.concurrency);

        info!("Starting crawl of {} to depth {}", seed_url, max_depth);
        self.crawl_page(&run, seed_url.to_string(), max_depth).await?;

        let visited = run.visited_count().await;
        let summary = run
            .counters
            .summarize(seed_url.to_string(), max_depth, visited, start.elapsed());
        info!(
            "Crawl complete. Visited {} URLs, saved {} pages, {} failures",
            summary.urls_visited,
            summary.pages_saved,
            summary.failures()
        );
        Ok(summary)
    }

    /// Fetches and saves `url` as given, then follows its links. The visited
    /// set is keyed on the fragment-free form so the seed and a link back to
    /// it count as one URL.
    fn crawl_page<'a>(
        &'a self,
        run: &'a CrawlRun,
        url: String,
        depth: u32,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            if depth == 0 {
                return Ok(());
            }

            let config = self.config.as_ref().ok_or_else(|| {
                CrawlError::Config("crawl started before the controller was configured".to_string())
            })?;

            if url.is_empty() {
                return Err(CrawlError::InvalidInput("cannot crawl an empty URL".to_string()));
            }

            if !run.mark_visited(&normalize_url_str(&url)).await {
                debug!("Already visited {}", url);
                return Ok(());
            }

            self.emit(CrawlEvent::Fetching {
                url: url.clone(),
                depth,
            });

            let fetched = {
                let _permit = run.fetch_permits.acquire().await.map_err(|e| {
                    CrawlError::Config(format!("fetch limiter closed during crawl: {}", e))
                })?;
                self.fetcher.fetch(&url).await
            };

            let response = match fetched {
                Ok(response) => response,
                Err(e) => {
                    warn!("Fetch failed for {}: {}", url, e);
                    RunCounters::bump(&run.counters.fetch_failures);
                    self.emit(CrawlEvent::FetchFailed {
                        url,
                        reason: e.to_string(),
                    });
                    return Ok(());
                }
            };

            if !response.is_success() {
                warn!("{} returned status {}", url, response.status);
                RunCounters::bump(&run.counters.non_success_statuses);
                self.emit(CrawlEvent::NonSuccessStatus {
                    url,
                    status: response.status,
                });
                return Ok(());
            }
            RunCounters::bump(&run.counters.pages_fetched);

            let file_name = file_name_for_url(&url);
            match self
                .storage
                .write_blob(config.output_destination(), &file_name, &response.body)
                .await
            {
                Ok(path) => {
                    RunCounters::bump(&run.counters.pages_saved);
                    self.emit(CrawlEvent::Saved {
                        url: url.clone(),
                        path,
                    });
                }
                Err(e) => {
                    warn!("Could not save {}: {}", url, e);
                    RunCounters::bump(&run.counters.storage_failures);
                    self.emit(CrawlEvent::StorageFailed {
                        url: url.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            let links = self.select_links(run, &url, &response.body, config.max_links_per_page());
            drop(response);
            debug!("Following {} links from {}", links.len(), url);

            let next_depth = depth - 1;
            futures::stream::iter(links)
                .for_each_concurrent(self.concurrency, move |link| async move {
                    if let Err(e) = self.crawl_page(run, link.clone(), next_depth).await {
                        warn!("Crawl of {} failed: {}", link, e);
                        RunCounters::bump(&run.counters.branch_failures);
                        self.emit(CrawlEvent::BranchFailed {
                            url: link,
                            reason: e.to_string(),
                        });
                    }
                })
                .await;

            Ok(())
        })
    }

    /// Resolves the page's raw links and keeps the first `cap` that are
    /// absolute http(s) URLs. Links that fail to resolve or have another
    /// scheme are skipped without counting against the cap.
    fn select_links(&self, run: &CrawlRun, page_url: &str, body: &str, cap: usize) -> Vec<String> {
        let mut selected = Vec::new();

        for raw in extract_links(body) {
            let resolved = match resolve_link(page_url, &raw) {
                Ok(resolved) => resolved,
                Err(e) => {
                    self.skip_link(run, page_url, raw, e.to_string());
                    continue;
                }
            };

            if !is_http_scheme(&resolved) {
                let reason = format!("unsupported scheme '{}'", resolved.scheme());
                self.skip_link(run, page_url, raw, reason);
                continue;
            }

            if selected.len() == cap {
                debug!("Link cap of {} reached on {}", cap, page_url);
                self.emit(CrawlEvent::LinkCapReached {
                    url: page_url.to_string(),
                    cap,
                });
                break;
            }

            selected.push(normalize_url(&resolved));
        }

        selected
    }

    fn skip_link(&self, run: &CrawlRun, page_url: &str, link: String, reason: String) {
        debug!("Skipping link '{}' on {}: {}", link, page_url, reason);
        RunCounters::bump(&run.counters.links_skipped);
        self.emit(CrawlEvent::LinkSkipped {
            url: page_url.to_string(),
            link,
            reason,
        });
    }

    fn emit(&self, event: CrawlEvent) {
        if let Some(ref callback) = self.event_callback {
            callback(&event);
        }
    }
}
