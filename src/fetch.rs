//! BibTeX retrieval from per-paper citation pages.
//!
//! The fetch capability is a trait seam so the row processor can be driven
//! by stub fetchers in tests; [`HttpFetcher`] is the production
//! implementation that retrieves the page and extracts the embedded
//! citation block.

use crate::error::{BibfetchError, Result};
use scraper::{Html, Selector};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;

/// Upper bound on a single page retrieval
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent string for requests
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Container that marks the citation block in a paper page
const BIBTEX_SECTION_SELECTOR: &str = "div#bibtex-section";

/// Capability to resolve a citation page URL into BibTeX text.
///
/// Returns the extracted text, or `None` for every failure mode: invalid
/// URL, request error, timeout, non-success status, missing marker or
/// block. Failures are reported where they occur; callers only see
/// presence or absence of a result.
pub trait FetchBibtex {
    /// Fetch BibTeX text for `url`
    fn fetch(&self, url: &str) -> impl Future<Output = Option<String>> + Send;
}

/// HTTP fetcher backed by `reqwest` with a bounded timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher with the default timeout.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| BibfetchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Retrieve the page body, treating non-success statuses as errors.
    async fn get_document(&self, url: &Url) -> Result<String> {
        let response = self.client.get(url.as_str()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BibfetchError::Api {
                code: status.as_u16() as i32,
                message: format!("HTTP error: {}", status),
            });
        }

        response.text().await.map_err(BibfetchError::Network)
    }
}

impl FetchBibtex for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let url = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(url = url, error = %e, "Invalid BibTeX URL");
                return None;
            }
        };

        debug!(url = %url, "Fetching BibTeX");

        let html = match self.get_document(&url).await {
            Ok(html) => html,
            Err(e) => {
                error!(url = %url, error = %e, "Failed to fetch BibTeX");
                return None;
            }
        };

        match extract_citation(&html) {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                warn!(url = %url, "No BibTeX section found");
                None
            }
            Err(e) => {
                error!(url = %url, error = %e, "Failed to parse citation page");
                None
            }
        }
    }
}

/// Extract the first preformatted block inside the citation section, trimmed.
///
/// # Arguments
///
/// * `html` - Raw HTML content of a paper's citation page
///
/// # Returns
///
/// The trimmed BibTeX text, or `None` when the marker or block is absent
/// or the block is empty after trimming
pub fn extract_citation(html: &str) -> Result<Option<String>> {
    let document = Html::parse_document(html);

    let section_selector = Selector::parse(BIBTEX_SECTION_SELECTOR)
        .map_err(|e| BibfetchError::Parse(e.to_string()))?;
    let pre_selector =
        Selector::parse("pre").map_err(|e| BibfetchError::Parse(e.to_string()))?;

    let section = match document.select(&section_selector).next() {
        Some(section) => section,
        None => return Ok(None),
    };

    let block = match section.select(&pre_selector).next() {
        Some(block) => block,
        None => return Ok(None),
    };

    let text = block.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        Ok(None)
    } else {
        Ok(Some(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_citation() {
        let html = r#"
            <html><body>
                <div id="bibtex-section">
                    <pre>
                        @inproceedings{a, title={Paper A}}
                    </pre>
                </div>
            </body></html>
        "#;
        let text = extract_citation(html).expect("Parse failed");
        assert_eq!(text.as_deref(), Some("@inproceedings{a, title={Paper A}}"));
    }

    #[test]
    fn test_extract_first_block_only() {
        let html = r#"
            <div id="bibtex-section"><pre>@article{first}</pre><pre>@article{second}</pre></div>
        "#;
        let text = extract_citation(html).expect("Parse failed");
        assert_eq!(text.as_deref(), Some("@article{first}"));
    }

    #[test]
    fn test_missing_section() {
        let html = "<html><body><pre>@article{a}</pre></body></html>";
        assert_eq!(extract_citation(html).expect("Parse failed"), None);
    }

    #[test]
    fn test_section_without_block() {
        let html = r#"<div id="bibtex-section"><p>nothing here</p></div>"#;
        assert_eq!(extract_citation(html).expect("Parse failed"), None);
    }

    #[test]
    fn test_empty_block() {
        let html = r#"<div id="bibtex-section"><pre>   </pre></div>"#;
        assert_eq!(extract_citation(html).expect("Parse failed"), None);
    }

    #[tokio::test]
    async fn test_invalid_url_is_absent() {
        let fetcher = HttpFetcher::new().expect("Failed to build fetcher");
        assert_eq!(fetcher.fetch("not a url").await, None);
    }
}
