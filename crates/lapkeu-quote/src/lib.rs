#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/lapkeu/lapkeu/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Google Finance quote provider.
//!
//! This crate provides a [`QuoteProvider`] implementation that scrapes the
//! latest price from the Google Finance quote page of an IDX-listed
//! entity.
//!
//! # Example
//!
//! ```no_run
//! use lapkeu_quote::GoogleFinanceProvider;
//! use lapkeu_core::QuoteProvider;
//!
//! # async fn example() -> lapkeu_core::Result<()> {
//! let provider = GoogleFinanceProvider::new();
//! let price = provider.fetch_quote(&"BBCA".parse()?).await?;
//! println!("BBCA closed at {price}");
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use scraper::{Html, Selector};
use tokio::time::sleep;
use tracing::debug;

use lapkeu_core::{EntityCode, LapkeuError, QuoteProvider, Result};

/// Google Finance quote page base URL.
const QUOTE_URL: &str = "https://www.google.com/finance/quote";

/// Exchange suffix appended to every IDX entity code.
const EXCHANGE: &str = "IDX";

/// CSS class of the price-bearing element on the quote page. Brittle by
/// nature: upstream markup changes surface as parse errors, never as
/// wrong prices.
const PRICE_MARKER_CLASS: &str = "AHmHk";

/// Prices are rendered with two implied decimal digits; integer division
/// recovers the whole-rupiah price.
const PRICE_SCALE: i64 = 100;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Default rate limit delay in milliseconds.
const DEFAULT_RATE_LIMIT_MS: u64 = 1000;

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Google Finance quote provider.
///
/// Implements [`QuoteProvider`] with built-in rate limiting (1 request per
/// second by default) and a bounded per-request timeout.
#[derive(Debug)]
pub struct GoogleFinanceProvider {
    client: reqwest::Client,
    base_url: String,
    rate_limit_ms: u64,
    last_request_time: AtomicU64,
}

impl GoogleFinanceProvider {
    /// Create a new provider with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rate_limit(Duration::from_millis(DEFAULT_RATE_LIMIT_MS))
    }

    /// Create a new provider with custom rate limiting.
    #[must_use]
    pub fn with_rate_limit(rate_limit: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: QUOTE_URL.to_string(),
            rate_limit_ms: rate_limit.as_millis() as u64,
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Create a new provider with a custom HTTP client. Rate limiting is
    /// still applied.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: QUOTE_URL.to_string(),
            rate_limit_ms: DEFAULT_RATE_LIMIT_MS,
            last_request_time: AtomicU64::new(0),
        }
    }

    /// Override the quote page base URL (used to point tests at a local
    /// server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Apply rate limiting before making a request.
    async fn apply_rate_limit(&self) {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        let last = self.last_request_time.load(Ordering::Relaxed);
        let elapsed = now.saturating_sub(last);

        if elapsed < self.rate_limit_ms {
            let wait_time = self.rate_limit_ms - elapsed;
            debug!("Rate limiting: waiting {}ms", wait_time);
            sleep(Duration::from_millis(wait_time)).await;
        }

        self.last_request_time.store(
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
            Ordering::Relaxed,
        );
    }

    /// Build the quote page URL for an entity.
    fn build_quote_url(&self, entity: &EntityCode) -> String {
        format!("{}/{}:{}?hl=en", self.base_url, entity, EXCHANGE)
    }
}

impl Default for GoogleFinanceProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the price from a quote page body.
///
/// Locates the price element by its CSS class marker, strips everything
/// but digits, and interprets the remainder as a fixed-point price with
/// two implied decimals.
fn parse_price(body: &str) -> Result<i64> {
    let document = Html::parse_document(body);
    let selector = Selector::parse(&format!("div.{PRICE_MARKER_CLASS}"))
        .map_err(|e| LapkeuError::Parse(e.to_string()))?;

    let element = document
        .select(&selector)
        .next()
        .ok_or_else(|| LapkeuError::Parse("price marker not found in page".to_string()))?;

    let text: String = element.text().collect();
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(LapkeuError::Parse(format!(
            "price element carries no digits: {text:?}"
        )));
    }

    let scaled: i64 = digits
        .parse()
        .map_err(|_| LapkeuError::Parse(format!("price out of range: {digits:?}")))?;
    Ok(scaled / PRICE_SCALE)
}

#[async_trait]
impl QuoteProvider for GoogleFinanceProvider {
    fn name(&self) -> &str {
        "Google Finance"
    }

    async fn fetch_quote(&self, entity: &EntityCode) -> Result<i64> {
        self.apply_rate_limit().await;

        let url = self.build_quote_url(entity);
        debug!("Fetching quote: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LapkeuError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(LapkeuError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                entity
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| LapkeuError::Network(e.to_string()))?;

        parse_price(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn quote_page(price_text: &str) -> String {
        format!(
            r#"<html><body><main><div class="{PRICE_MARKER_CLASS}">{price_text}</div></main></body></html>"#
        )
    }

    #[test]
    fn test_build_quote_url() {
        let provider = GoogleFinanceProvider::new();
        let entity: EntityCode = "BBCA".parse().unwrap();

        let url = provider.build_quote_url(&entity);

        assert_eq!(url, "https://www.google.com/finance/quote/BBCA:IDX?hl=en");
    }

    #[test]
    fn parse_price_strips_formatting_and_scales() {
        let body = quote_page("Rp 4,560.00");
        assert_eq!(parse_price(&body).unwrap(), 4560);
    }

    #[test]
    fn parse_price_without_marker_fails() {
        let err = parse_price("<html><body><div>no price here</div></body></html>").unwrap_err();
        assert!(matches!(err, LapkeuError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn parse_price_without_digits_fails() {
        let body = quote_page("—");
        let err = parse_price(&body).unwrap_err();
        assert!(matches!(err, LapkeuError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_provider_info() {
        let provider = GoogleFinanceProvider::default();
        assert_eq!(provider.name(), "Google Finance");
    }

    #[tokio::test]
    async fn fetch_quote_parses_served_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/BBCA:IDX"))
            .respond_with(ResponseTemplate::new(200).set_body_string(quote_page("Rp 4,560.00")))
            .mount(&server)
            .await;

        let provider = GoogleFinanceProvider::with_rate_limit(Duration::ZERO)
            .with_base_url(server.uri());
        let price = provider.fetch_quote(&"BBCA".parse().unwrap()).await.unwrap();
        assert_eq!(price, 4560);
    }

    #[tokio::test]
    async fn fetch_quote_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let provider = GoogleFinanceProvider::with_rate_limit(Duration::ZERO)
            .with_base_url(server.uri());
        let err = provider
            .fetch_quote(&"XXXX".parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, LapkeuError::Network(_)), "got {err:?}");
    }
}
