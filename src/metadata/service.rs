//! Lookup orchestration for the host catalog.
//!
//! The [`MetadataService`] ties the pieces together: identifier recognition,
//! provider dispatch, token resolution, normalization and caching. It answers
//! the two requests a catalog makes: "which titles could this be" and "give me
//! the full record for this one".

use std::sync::Arc;

use chrono::NaiveDate;
use javscraper_common::VideoRecord;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::cache::ResultCache;
use super::dispatch::{dispatch, DispatchOptions, DispatchReport};
use super::normalize::{normalize, NormalizedRecord};
use super::providers::{builtin_factories, shared_deps};
use super::registry::{ProviderRegistry, SkippedProvider};
use super::token::{resolve, ReferenceToken, Resolution};
use crate::config::Config;
use crate::images;

/// A lookup request from the catalog.
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    /// Free text, usually derived from a file or folder name.
    pub name: String,
    /// Token from an earlier lookup, when the catalog has one.
    pub token: Option<ReferenceToken>,
}

/// Full-record requests carry the same information as searches.
pub type MetadataRequest = SearchRequest;

impl SearchRequest {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: None,
        }
    }

    pub fn by_token(token: ReferenceToken) -> Self {
        Self {
            name: String::new(),
            token: Some(token),
        }
    }
}

/// One candidate offered to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// `"<num> <title>"`
    pub name: String,
    pub num: String,
    pub provider: String,
    pub production_year: Option<i32>,
    pub premiere_date: Option<NaiveDate>,
    pub image_url: Option<String>,
    pub token: ReferenceToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonKind {
    Actor,
    Director,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub name: String,
    pub kind: PersonKind,
}

/// The finished record handed to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetadataResult {
    pub name: String,
    pub overview: Option<String>,
    pub production_year: Option<i32>,
    pub premiere_date: Option<NaiveDate>,
    pub original_title: String,
    pub genres: Vec<String>,
    pub collection_name: Option<String>,
    pub sort_name: String,
    pub external_id: String,
    pub studios: Vec<String>,
    pub people: Vec<Person>,
    pub image_url: Option<String>,
    pub provider: String,
    pub token: ReferenceToken,
    /// The record came from the caller's token rather than a fresh search.
    pub queried_by_id: bool,
}

impl MetadataResult {
    fn build(normalized: NormalizedRecord, token: ReferenceToken, image_url: Option<String>, queried_by_id: bool) -> Self {
        let name = normalized.display_name().to_string();
        let production_year = normalized.production_year();
        let premiere_date = normalized.premiere_date();
        let record = normalized.into_record();

        let mut people = Vec::with_capacity(record.actors.len() + 1);
        if let Some(director) = non_blank(record.director.as_deref()) {
            people.push(Person {
                name: director.to_string(),
                kind: PersonKind::Director,
            });
        }
        people.extend(
            record
                .actors
                .iter()
                .filter(|a| !a.trim().is_empty())
                .map(|a| Person {
                    name: a.clone(),
                    kind: PersonKind::Actor,
                }),
        );

        Self {
            name,
            overview: record.plot,
            production_year,
            premiere_date,
            original_title: record.title,
            genres: record.genres,
            collection_name: record.set,
            sort_name: record.num.clone(),
            external_id: record.num,
            studios: non_blank(record.studio.as_deref())
                .map(|s| vec![s.to_string()])
                .unwrap_or_default(),
            people,
            image_url,
            provider: record.provider,
            token,
            queried_by_id,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Entry point for catalog lookups.
pub struct MetadataService {
    registry: Arc<ProviderRegistry>,
    config: Arc<Config>,
    cache: Option<Arc<ResultCache>>,
}

impl MetadataService {
    /// Create a service. The cache is enabled per `config.cache`.
    pub fn new(registry: Arc<ProviderRegistry>, config: Arc<Config>) -> Self {
        let cache = config
            .cache
            .enabled
            .then(|| Arc::new(ResultCache::new(config.cache.path.clone())));
        Self {
            registry,
            config,
            cache,
        }
    }

    /// Discover the built-in providers for `config` and build a service.
    ///
    /// Also returns the providers that could not be constructed.
    pub fn from_config(config: Config) -> anyhow::Result<(Self, Vec<SkippedProvider>)> {
        let deps = shared_deps(config.providers.timeout())?;
        let discovery = ProviderRegistry::discover(builtin_factories(&config.providers), &deps);
        let service = Self::new(Arc::new(discovery.registry), Arc::new(config));
        Ok((service, discovery.skipped))
    }

    /// Builder: replace the cache, or disable it with `None`.
    pub fn with_cache(mut self, cache: Option<ResultCache>) -> Self {
        self.cache = cache.map(Arc::new);
        self
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> Option<&ResultCache> {
        self.cache.as_deref()
    }

    /// Relay URL for an upstream image.
    pub fn image_url(&self, url: &str) -> String {
        images::build_proxy_url(&self.config.image_proxy, url)
    }

    fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            enabled: self.config.providers.enabled.clone(),
            timeout: self.config.providers.timeout(),
        }
    }

    /// Candidates for a catalog item.
    ///
    /// A token that still resolves yields exactly that record. Otherwise the
    /// name is searched; names that are neither a recognizable identifier nor
    /// a plausible raw key return nothing without querying any provider.
    pub async fn search(&self, request: &SearchRequest, cancel: &CancellationToken) -> Vec<SearchHit> {
        if let Some(token) = &request.token {
            if let Resolution::Found(record) = self.resolve_token(token, cancel).await {
                return vec![self.search_hit(record)];
            }
        }

        match self.search_report(&request.name, cancel).await {
            Some(report) => report.records.into_iter().map(|r| self.search_hit(r)).collect(),
            None => Vec::new(),
        }
    }

    /// Dispatch a free-text search and return the full per-provider report.
    ///
    /// Returns `None` when `name` yields no search key.
    pub async fn search_report(&self, name: &str, cancel: &CancellationToken) -> Option<DispatchReport> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let recognized = javscraper_parser::parse(name);
        let Some(key) = javscraper_parser::search_key(name) else {
            debug!(name, "Input is not a plausible identifier, skipping search");
            return None;
        };

        let report = dispatch(&key, &self.registry, &self.dispatch_options(), cancel).await;
        info!(
            name,
            id = recognized.as_ref().map(|id| id.id.as_str()),
            key = %key,
            count = report.records.len(),
            "Search complete"
        );
        Some(report)
    }

    /// The full, normalized record for a catalog item.
    ///
    /// Resolves the request's token when present. Without a token, or when it
    /// no longer resolves, the first search hit is resolved instead.
    pub async fn get_metadata(
        &self,
        request: &MetadataRequest,
        cancel: &CancellationToken,
    ) -> Option<MetadataResult> {
        let mut resolved = None;

        if let Some(token) = &request.token {
            match self.resolve_token(token, cancel).await {
                Resolution::Found(record) => resolved = Some((record, token.clone(), true)),
                other => info!(
                    provider = %token.provider,
                    key = %token.key,
                    outcome = ?other,
                    "Token did not resolve, falling back to search"
                ),
            }
        }

        if resolved.is_none() {
            let hits = self.search(&SearchRequest::by_name(&request.name), cancel).await;
            let Some(first) = hits.into_iter().next() else {
                info!(name = %request.name, "No metadata found");
                return None;
            };
            match self.resolve_token(&first.token, cancel).await {
                Resolution::Found(record) => resolved = Some((record, first.token, false)),
                other => {
                    info!(name = %request.name, outcome = ?other, "Top search hit did not resolve");
                    return None;
                }
            }
        }

        let (record, token, queried_by_id) = resolved?;
        let input_name = if request.name.trim().is_empty() {
            token.num.clone().unwrap_or_default()
        } else {
            request.name.clone()
        };
        let normalized = normalize(record, &input_name, &self.config.metadata);
        self.store(normalized.record()).await;

        let image_url = normalized.record().cover.as_deref().map(|c| self.image_url(c));
        Some(MetadataResult::build(normalized, token, image_url, queried_by_id))
    }

    async fn resolve_token(&self, token: &ReferenceToken, cancel: &CancellationToken) -> Resolution {
        let child = cancel.child_token();
        let timeout = self.config.providers.timeout();
        tokio::select! {
            _ = cancel.cancelled() => Resolution::Missing,
            result = tokio::time::timeout(timeout, resolve(token, &self.registry, &child)) => {
                result.unwrap_or_else(|_| {
                    child.cancel();
                    warn!(provider = %token.provider, key = %token.key, "Token resolution timed out");
                    Resolution::Missing
                })
            }
        }
    }

    async fn store(&self, record: &VideoRecord) {
        let Some(cache) = &self.cache else {
            return;
        };
        let cache = Arc::clone(cache);
        let record = record.clone();
        let stored = tokio::task::spawn_blocking(move || {
            cache.store(&record.provider, &record.num, &record);
        })
        .await;
        if let Err(e) = stored {
            warn!(error = %e, "Cache write task failed");
        }
    }

    /// Present `record` as a search candidate.
    pub fn search_hit(&self, record: VideoRecord) -> SearchHit {
        SearchHit {
            name: format!("{} {}", record.num, record.title).trim().to_string(),
            production_year: record.year(),
            premiere_date: record.release_date(),
            image_url: record.cover.as_deref().map(|c| self.image_url(c)),
            token: ReferenceToken::attach(&record),
            num: record.num,
            provider: record.provider,
        }
    }
}
