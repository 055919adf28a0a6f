//! Extraction dispatcher: fetch, pick a strategy, extract, validate.

use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use crate::config::{Config, SelectionMode};
use crate::error::{ExtractionError, FetchError};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::models::ProductRecord;
use crate::page::Page;
use crate::selection::{StrategySelector, selector_for};
use crate::strategies::strategy_for;

/// Validates an input URL and derives its lowercase host.
pub fn parse_target(raw: &str) -> Result<(Url, String), ExtractionError> {
    let invalid = |reason: &str| ExtractionError::InvalidUrl {
        url: raw.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    let domain = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| invalid("URL has no host"))?
        .to_lowercase();

    Ok((url, domain))
}

/// Turns product URLs into [`ProductRecord`]s.
///
/// Cheap to clone; holds no state between calls, so clones can run
/// extractions concurrently.
#[derive(Clone)]
pub struct Extractor {
    fetcher: Arc<dyn PageFetcher>,
    selector: Arc<dyn StrategySelector>,
}

impl Extractor {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::from_config(config)?;
        Ok(Self::with_fetcher(Arc::new(fetcher), config.selection_mode))
    }

    pub fn with_fetcher(fetcher: Arc<dyn PageFetcher>, mode: SelectionMode) -> Self {
        Self {
            fetcher,
            selector: Arc::from(selector_for(mode)),
        }
    }

    /// Fetches `url` and extracts its product. A failed fetch aborts before
    /// any strategy runs; a failing strategy is reported as is, never
    /// retried with another one.
    pub async fn extract(&self, url: &str) -> Result<ProductRecord, ExtractionError> {
        let (target, domain) = parse_target(url)?;

        let html = self
            .fetcher
            .fetch(&target)
            .await
            .map_err(|source| ExtractionError::Fetch {
                url: url.to_string(),
                source,
            })?;

        self.extract_html(url, target, domain, html)
    }

    /// Synchronous half of [`Self::extract`], on an already fetched body.
    pub fn extract_document(&self, url: &str, html: String) -> Result<ProductRecord, ExtractionError> {
        let (target, domain) = parse_target(url)?;
        self.extract_html(url, target, domain, html)
    }

    fn extract_html(
        &self,
        url: &str,
        target: Url,
        domain: String,
        html: String,
    ) -> Result<ProductRecord, ExtractionError> {
        let page = Page::new(&target, html);
        let kind = self.selector.select(&page);
        info!(url, domain = %domain, strategy = %kind, "Extracting product");

        let mut record = strategy_for(kind)
            .extract(&page)
            .map_err(|source| ExtractionError::Strategy {
                url: url.to_string(),
                domain: domain.clone(),
                strategy: kind,
                source,
            })?;

        record.website = domain;
        record.url = url.trim().to_string();

        info!(url, name = %record.name, price = record.price, "Extracted product");
        Ok(record)
    }

    /// Extracts every URL concurrently. Each URL is isolated: one failure
    /// never aborts the rest. Results keep the input order.
    pub async fn extract_many<I, S>(&self, urls: I) -> Vec<(String, Result<ProductRecord, ExtractionError>)>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let handles: Vec<_> = urls
            .into_iter()
            .map(|url| {
                let url: String = url.into();
                let extractor = self.clone();
                let task_url = url.clone();
                (url, tokio::spawn(async move { extractor.extract(&task_url).await }))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for (url, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(source) => {
                    warn!(url = %url, error = %source, "Extraction task failed");
                    Err(ExtractionError::Task {
                        url: url.clone(),
                        source,
                    })
                }
            };
            results.push((url, result));
        }

        let failed = results.iter().filter(|(_, r)| r.is_err()).count();
        info!(total = results.len(), failed, "Batch extraction finished");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_target_lowercases_host() {
        let (url, domain) = parse_target("https://Shop.Example.COM/p/1?x=1").expect("target");
        assert_eq!(domain, "shop.example.com");
        assert_eq!(url.path(), "/p/1");
    }

    #[test]
    fn parse_target_rejects_non_http() {
        for bad in ["ftp://example.com/a", "not a url", "file:///etc/passwd", ""] {
            assert!(
                matches!(parse_target(bad), Err(ExtractionError::InvalidUrl { .. })),
                "{bad} should be rejected"
            );
        }
    }
}
