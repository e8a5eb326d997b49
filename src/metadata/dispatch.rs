//! Concurrent fan-out of one search key to every enabled provider.
//!
//! Each provider runs in its own task with a child [`CancellationToken`] and
//! a hard deadline, so one slow or failing provider never blocks or corrupts
//! the others. The dispatcher waits for every task before merging.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use javscraper_common::VideoRecord;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::merge::merge;
use super::provider::MetadataProvider;
use super::registry::ProviderRegistry;

/// Default hard deadline for a single provider query.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-dispatch settings.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Provider allow-list. Empty queries every registered provider.
    pub enabled: Vec<String>,
    /// Hard deadline per provider, enforced regardless of cooperation.
    pub timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            enabled: Vec::new(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }
}

/// How one provider's query ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderOutcome {
    /// Returned this many records.
    Found(usize),
    Empty,
    Failed(String),
    TimedOut,
    Cancelled,
}

impl fmt::Display for ProviderOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(n) => write!(f, "found {n}"),
            Self::Empty => f.write_str("empty"),
            Self::Failed(e) => write!(f, "failed: {e}"),
            Self::TimedOut => f.write_str("timed out"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderReport {
    pub provider: String,
    pub outcome: ProviderOutcome,
}

/// Result of a dispatch round.
///
/// `records` is the merged list in provider priority order; `providers`
/// reports each queried provider's outcome in the same order.
#[derive(Debug, Clone, Default)]
pub struct DispatchReport {
    pub records: Vec<VideoRecord>,
    pub providers: Vec<ProviderReport>,
}

impl DispatchReport {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn outcome(&self, provider: &str) -> Option<&ProviderOutcome> {
        self.providers
            .iter()
            .find(|r| r.provider == provider)
            .map(|r| &r.outcome)
    }
}

/// Query every enabled provider for `key` concurrently and merge the results.
///
/// Never fails: provider errors, timeouts and cancellation are recorded in
/// the report and contribute zero records.
pub async fn dispatch(
    key: &str,
    registry: &ProviderRegistry,
    options: &DispatchOptions,
    cancel: &CancellationToken,
) -> DispatchReport {
    let providers = registry.enabled(&options.enabled);
    if providers.is_empty() {
        debug!(key, "No enabled providers to query");
        return DispatchReport::default();
    }

    let mut tasks = JoinSet::new();
    for (index, provider) in providers.iter().enumerate() {
        let provider = Arc::clone(provider);
        let key = key.to_string();
        let child = cancel.child_token();
        let timeout = options.timeout;
        tasks.spawn(async move {
            let result = query_one(provider.as_ref(), &key, timeout, &child).await;
            (index, result)
        });
    }

    let mut slots: Vec<Option<Result<Vec<VideoRecord>, ProviderOutcome>>> =
        vec![None; providers.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => slots[index] = Some(result),
            Err(e) => warn!(error = %e, "Provider task aborted"),
        }
    }

    let mut per_provider = HashMap::with_capacity(providers.len());
    let mut reports = Vec::with_capacity(providers.len());
    for (provider, slot) in providers.iter().zip(slots) {
        let name = provider.name().to_string();
        let slot = slot.unwrap_or_else(|| Err(ProviderOutcome::Failed("task aborted".into())));
        let outcome = match slot {
            Ok(mut records) => {
                for record in records.iter_mut() {
                    record.provider.clone_from(&name);
                }
                let outcome = if records.is_empty() {
                    ProviderOutcome::Empty
                } else {
                    ProviderOutcome::Found(records.len())
                };
                per_provider.insert(name.clone(), records);
                outcome
            }
            Err(outcome) => {
                warn!(provider = %name, key, outcome = %outcome, "Provider contributed no results");
                outcome
            }
        };
        reports.push(ProviderReport {
            provider: name,
            outcome,
        });
    }

    let order: Vec<&str> = providers.iter().map(|p| p.name()).collect();
    let records = merge(&order, per_provider);
    debug!(key, results = records.len(), "Dispatch complete");

    DispatchReport {
        records,
        providers: reports,
    }
}

async fn query_one(
    provider: &dyn MetadataProvider,
    key: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> Result<Vec<VideoRecord>, ProviderOutcome> {
    tokio::select! {
        _ = cancel.cancelled() => Err(ProviderOutcome::Cancelled),
        result = tokio::time::timeout(timeout, provider.search(key, cancel)) => match result {
            Ok(Ok(records)) => Ok(records),
            Ok(Err(e)) => Err(ProviderOutcome::Failed(format!("{e:#}"))),
            Err(_) => {
                // Let a cooperative provider release what it holds.
                cancel.cancel();
                Err(ProviderOutcome::TimedOut)
            }
        },
    }
}
