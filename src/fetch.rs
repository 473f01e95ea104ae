//! HTTP fetch layer shared by every scraper.
//!
//! Government sites in this pipeline intermittently reject unfamiliar
//! clients, so the fetcher carries two identities: a browser-like client
//! used first, and a self-declaring fallback client used after an
//! access-denial response. Transient failures are retried with exponential
//! backoff and jitter.
//!
//! The core text pipeline never touches the network; everything blocking
//! lives here and runs strictly before segmentation and synthesis.

use rand::{rng, Rng};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::error::Error;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DECLARED_USER_AGENT: &str = "Mozilla/5.0 (compatible; CivicNewsDigest/0.1)";

const MAX_RETRIES: usize = 3;
const BASE_DELAY: Duration = Duration::from_secs(1);
const MAX_DELAY: Duration = Duration::from_secs(30);

/// Delay inserted between successive article fetches from one site.
const POLITE_DELAY: Duration = Duration::from_secs(1);

/// Exponential backoff with a hard cap; jitter is added separately.
fn backoff_delay(attempt: usize) -> Duration {
    let mut delay = BASE_DELAY.saturating_mul(1 << (attempt.saturating_sub(1)) as u32);
    if delay > MAX_DELAY {
        delay = MAX_DELAY;
    }
    delay
}

/// Dual-identity HTTP fetcher with retry semantics.
pub struct Fetcher {
    browser: Client,
    declared: Client,
}

impl Fetcher {
    /// Build both clients with their fixed header sets.
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let browser = Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;
        let declared = Client::builder()
            .user_agent(DECLARED_USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { browser, declared })
    }

    /// Fetch a page body as text.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.get_with_retry(url).await?;
        Ok(response.text().await?)
    }

    /// Fetch a raw body plus its `Content-Type` header, for PDF downloads.
    #[instrument(level = "debug", skip(self))]
    pub async fn get_bytes(&self, url: &str) -> Result<(Vec<u8>, Option<String>), Box<dyn Error>> {
        let response = self.get_with_retry(url).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();
        Ok((bytes, content_type))
    }

    /// Sleep briefly between requests to the same site.
    pub async fn polite_pause(&self) {
        sleep(POLITE_DELAY).await;
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response, Box<dyn Error>> {
        let mut attempt = 0usize;
        let mut switched_identity = false;

        loop {
            let client = if switched_identity {
                &self.declared
            } else {
                &self.browser
            };
            let outcome = client.get(url).send().await;

            let error: Box<dyn Error> = match outcome {
                Ok(response) if response.status() == StatusCode::FORBIDDEN && !switched_identity => {
                    warn!(%url, "Access denied; retrying with declared identity");
                    switched_identity = true;
                    continue;
                }
                Ok(response) => match response.error_for_status() {
                    Ok(response) => {
                        debug!(%url, "Fetched");
                        return Ok(response);
                    }
                    Err(e) => Box::new(e),
                },
                Err(e) => Box::new(e),
            };

            attempt += 1;
            if attempt > MAX_RETRIES {
                warn!(%url, attempt, error = %error, "Fetch exhausted retries");
                return Err(error);
            }

            let jitter_ms: u64 = rng().random_range(0..=250);
            let delay = backoff_delay(attempt) + Duration::from_millis(jitter_ms);
            warn!(%url, attempt, ?delay, error = %error, "Fetch failed; backing off");
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_then_caps() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(2), Duration::from_secs(2));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(10), Duration::from_secs(30));
    }

    #[test]
    fn fetcher_builds_both_clients() {
        assert!(Fetcher::new().is_ok());
    }
}
