//! URL liveness checks
//!
//! Requests run one at a time with no retry. A URL is good when it answers 200
//! or matches one of the configured skip prefixes.

use crate::config::Config;
use crate::error::{CvError, Result};
use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, error, info};

/// Outcome of checking one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlStatus {
    /// Not requested (mailto and similar)
    Skipped,
    /// Final HTTP status after redirects
    Status(u16),
    /// The request itself failed
    Failed(String),
}

impl UrlStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, UrlStatus::Skipped | UrlStatus::Status(200))
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlStatus::Skipped => write!(f, "skipped"),
            UrlStatus::Status(code) => write!(f, "{}", code),
            UrlStatus::Failed(reason) => write!(f, "{}", reason),
        }
    }
}

/// Decides whether a link is alive
#[allow(async_fn_in_trait)]
pub trait LinkCheck {
    async fn check(&self, url: &str) -> UrlStatus;
}

/// HTTP client configured for link checking
pub struct UrlChecker {
    client: reqwest::Client,
    skip_prefixes: Vec<String>,
}

impl UrlChecker {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .danger_accept_invalid_certs(true)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|source| CvError::Http {
                url: "(client setup)".to_string(),
                source,
            })?;
        Ok(Self {
            client,
            skip_prefixes: config.skip_url_prefixes.clone(),
        })
    }

    pub fn is_skipped(&self, url: &str) -> bool {
        self.skip_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix.as_str()))
    }

    /// Checks every URL found in a file
    ///
    /// # Parameters
    /// - `path`: LaTeX, BibTeX or HTML file
    /// - `verbose`: also log passing URLs
    pub async fn check_file(&self, path: &Path, verbose: bool) -> Result<UrlReport> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CvError::io(path, e))?;
        let urls = find_urls(&text);
        info!("Found {} urls in {}", urls.len(), path.display());

        let mut report = UrlReport::default();
        for url in urls {
            let status = self.check(&url).await;
            report.checked += 1;
            if status.is_ok() {
                if verbose {
                    info!("Passed: {}: {}", url, status);
                }
            } else {
                error!("Failed: {}: {}", url, status);
                report.failures.push((url, status));
            }
        }
        Ok(report)
    }
}

impl LinkCheck for UrlChecker {
    /// GETs `url` and reports the final status
    async fn check(&self, url: &str) -> UrlStatus {
        if self.is_skipped(url) {
            debug!("Skipping {}", url);
            return UrlStatus::Skipped;
        }
        match self.client.get(url).send().await {
            Ok(response) => UrlStatus::Status(response.status().as_u16()),
            Err(e) => UrlStatus::Failed(format!("request failed on {}: {}", url, e)),
        }
    }
}

/// Result of checking one file
#[derive(Debug, Default)]
pub struct UrlReport {
    pub checked: usize,
    pub failures: Vec<(String, UrlStatus)>,
}

impl UrlReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// BibTeX `url = {...}`, LaTeX `\href{...}`, then HTML anchors
static URL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"url\s*=\s*\{(.*?)\}",
        r"href\{(.*?)\}",
        r#"a href=["'](.*?)["']"#,
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex"))
});

/// URLs in BibTeX, LaTeX and HTML syntax, grouped in that order
pub fn find_urls(text: &str) -> Vec<String> {
    let mut urls = Vec::new();
    for re in URL_PATTERNS.iter() {
        urls.extend(
            re.captures_iter(text)
                .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string())),
        );
    }
    urls
}
