use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use log::debug;
use reqwest::{Client, Url};
use scraper::{ElementRef, Html};
use std::num::NonZeroU32;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// HTTP GET + HTML parse, throttled by a shared rate limiter.
pub struct Fetcher {
    client: Client,
    limiter: DefaultDirectRateLimiter,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(|source| Error::Network {
                url: settings.base_url.clone(),
                source,
            })?;
        let rps = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        Ok(Fetcher {
            client,
            limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    /// Raw body of `url`; non-2xx statuses are errors.
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        self.limiter.until_ready().await;
        debug!("GET {url}");
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };
        self.client
            .get(url)
            .send()
            .await
            .map_err(network)?
            .error_for_status()
            .map_err(network)?
            .text()
            .await
            .map_err(network)
    }

    pub async fn fetch(&self, url: &str) -> Result<Html> {
        let page = self.fetch_text(url).await?;
        if page.trim().is_empty() {
            return Err(Error::parse(format!("empty body from {url}")));
        }
        Ok(Html::parse_document(&page))
    }
}

/// Resolve `href` the way a browser would against the page it was found on.
pub fn absolute(base: &str, href: &str) -> Result<String> {
    let base = Url::parse(base).map_err(|e| Error::parse(format!("{base}: {e}")))?;
    let url = base
        .join(href)
        .map_err(|e| Error::parse(format!("{href}: {e}")))?;
    Ok(url.into())
}

/// Element text with runs of whitespace collapsed, like a browser's `innerText` for inline content.
pub fn squashed_text(element: ElementRef) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
