use crate::error::{CrawlError, Result};
use std::path::{Path, PathBuf};

/// Settings shared read-only by every step of a crawl run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    output_destination: PathBuf,
    max_links_per_page: usize,
}

impl CrawlConfig {
    /// Validates and builds a config: the destination must be non-empty and at
    /// least one link per page must be allowed.
    pub fn new(output_destination: impl Into<PathBuf>, max_links_per_page: usize) -> Result<Self> {
        let output_destination = output_destination.into();

        if output_destination.as_os_str().is_empty() {
            return Err(CrawlError::Config(
                "output destination must not be empty".to_string(),
            ));
        }
        if max_links_per_page < 1 {
            return Err(CrawlError::Config(format!(
                "max links per page must be at least 1, got {}",
                max_links_per_page
            )));
        }

        Ok(Self {
            output_destination,
            max_links_per_page,
        })
    }

    pub fn output_destination(&self) -> &Path {
        &self.output_destination
    }

    pub fn max_links_per_page(&self) -> usize {
        self.max_links_per_page
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config() {
        let config = CrawlConfig::new("pages", 5).unwrap();
        assert_eq!(config.output_destination(), Path::new("pages"));
        assert_eq!(config.max_links_per_page(), 5);
    }

    #[test]
    fn test_empty_destination_rejected() {
        let err = CrawlConfig::new("", 5).unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
        assert!(err.to_string().contains("output destination"));
    }

    #[test]
    fn test_zero_links_rejected() {
        let err = CrawlConfig::new("pages", 0).unwrap_err();
        assert!(matches!(err, CrawlError::Config(_)));
        assert!(err.to_string().contains("at least 1"));
    }
}
