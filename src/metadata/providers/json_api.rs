//! Provider backed by a remote JSON metadata endpoint.
//!
//! The endpoint serves records that were already parsed upstream:
//!
//! - `GET {base}/search?q={key}` returns `{"results": [video, ...]}`
//! - `GET {base}/videos/{key}` returns one video, or 404
//!
//! Features:
//! - Token-bucket rate limiting via [`governor`].
//! - Automatic retry on HTTP 429 with `Retry-After` header support (max 3 retries).
//! - Requests abort as soon as the caller's cancellation token fires.

use std::num::NonZeroU32;
use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use governor::{Quota, RateLimiter};
use javscraper_common::VideoRecord;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Instrument};

use crate::config::JsonApiConfig;
use crate::metadata::provider::MetadataProvider;

const MAX_RETRIES: u32 = 3;

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<ApiVideo>,
}

#[derive(Debug, Deserialize)]
struct ApiVideo {
    /// Endpoint-specific id, used for `/videos/{id}` when present.
    id: Option<String>,
    num: String,
    #[serde(default)]
    title: String,
    plot: Option<String>,
    release_date: Option<String>,
    cover: Option<String>,
    #[serde(default)]
    genres: Vec<String>,
    #[serde(default)]
    actors: Vec<String>,
    director: Option<String>,
    studio: Option<String>,
    maker: Option<String>,
    series: Option<String>,
}

impl ApiVideo {
    fn into_record(self, provider: &str) -> VideoRecord {
        let key = self.id.filter(|id| !id.is_empty() && *id != self.num);
        VideoRecord {
            title: self.title,
            plot: self.plot,
            date: self.release_date,
            cover: self.cover,
            genres: self.genres,
            actors: self.actors,
            director: self.director,
            studio: self.studio,
            maker: self.maker,
            set: self.series,
            key,
            ..VideoRecord::new(self.num, provider)
        }
    }
}

// ---------------------------------------------------------------------------
// Provider implementation
// ---------------------------------------------------------------------------

/// JSON endpoint provider.
///
/// # Examples
///
/// ```no_run
/// use javscraper::config::JsonApiConfig;
/// use javscraper::metadata::providers::JsonApiProvider;
///
/// let config = JsonApiConfig {
///     name: "javbus".into(),
///     base_url: "http://127.0.0.1:9000".into(),
///     api_key: None,
///     requests_per_second: 4,
/// };
/// let provider =
///     JsonApiProvider::new(&config, reqwest::Client::new(), tracing::Span::none()).unwrap();
/// ```
pub struct JsonApiProvider {
    name: String,
    base: Url,
    api_key: Option<String>,
    client: reqwest::Client,
    span: tracing::Span,
    rate_limiter: governor::RateLimiter<
        governor::state::NotKeyed,
        governor::state::InMemoryState,
        governor::clock::DefaultClock,
    >,
}

impl JsonApiProvider {
    pub fn new(
        config: &JsonApiConfig,
        client: reqwest::Client,
        span: tracing::Span,
    ) -> anyhow::Result<Self> {
        let base = Url::parse(&config.base_url)
            .with_context(|| format!("Invalid base_url for provider '{}'", config.name))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("base_url for provider '{}' cannot carry paths", config.name);
        }
        let rps = NonZeroU32::new(config.requests_per_second)
            .with_context(|| format!("requests_per_second for '{}' must be > 0", config.name))?;

        Ok(Self {
            name: config.name.clone(),
            base,
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            client,
            span,
            rate_limiter: RateLimiter::direct(Quota::per_second(rps)),
        })
    }

    fn url(&self, segments: &[&str], params: &[(&str, &str)]) -> anyhow::Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("base_url cannot carry paths"))?
            .pop_if_empty()
            .extend(segments);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    /// Execute a GET request with rate limiting and 429-retry logic.
    ///
    /// Returns `Ok(None)` on 404.
    async fn get<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<Option<T>> {
        let mut retries = 0u32;
        loop {
            self.rate_limiter.until_ready().await;

            let mut request = self.client.get(url.clone());
            if let Some(key) = &self.api_key {
                request = request.bearer_auth(key);
            }
            let resp = request
                .send()
                .await
                .with_context(|| format!("{} request failed: {url}", self.name))?;

            if resp.status() == StatusCode::TOO_MANY_REQUESTS && retries < MAX_RETRIES {
                retries += 1;
                let wait = resp
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                warn!(
                    provider = %self.name,
                    retry = retries,
                    wait_secs = wait,
                    "Endpoint returned 429, backing off"
                );
                tokio::time::sleep(Duration::from_secs(wait)).await;
                continue;
            }

            if resp.status() == StatusCode::NOT_FOUND {
                return Ok(None);
            }

            let resp = resp
                .error_for_status()
                .with_context(|| format!("{} request returned error: {url}", self.name))?;
            let body = resp
                .json::<T>()
                .await
                .with_context(|| format!("{} returned malformed JSON: {url}", self.name))?;
            return Ok(Some(body));
        }
    }

    async fn cancellable<T>(
        &self,
        cancel: &CancellationToken,
        fut: impl std::future::Future<Output = anyhow::Result<T>>,
    ) -> anyhow::Result<T> {
        tokio::select! {
            _ = cancel.cancelled() => anyhow::bail!("{} request cancelled", self.name),
            result = fut.instrument(self.span.clone()) => result,
        }
    }
}

#[async_trait]
impl MetadataProvider for JsonApiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<VideoRecord>> {
        let url = self.url(&["search"], &[("q", key)])?;
        let response: Option<SearchResponse> = self.cancellable(cancel, self.get(url)).await?;
        let records: Vec<VideoRecord> = response
            .map(|r| r.results)
            .unwrap_or_default()
            .into_iter()
            .map(|v| v.into_record(&self.name))
            .collect();
        debug!(parent: &self.span, provider = %self.name, key, results = records.len(), "Search complete");
        Ok(records)
    }

    async fn fetch(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Option<VideoRecord>> {
        let url = self.url(&["videos", key], &[])?;
        let video: Option<ApiVideo> = self.cancellable(cancel, self.get(url)).await?;
        Ok(video.map(|v| v.into_record(&self.name)))
    }
}
