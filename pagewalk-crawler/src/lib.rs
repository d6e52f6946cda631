pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod extractor;
pub mod fetcher;
pub mod result;
pub mod storage;
pub mod url_utils;

pub use config::CrawlConfig;
pub use controller::CrawlController;
pub use error::{CrawlError, Result};
pub use events::{CrawlEvent, EventCallback};
pub use extractor::extract_links;
pub use fetcher::{Fetcher, HttpFetcher};
pub use result::{CrawlSummary, FetchResponse};
pub use storage::{FsStorage, Storage};
