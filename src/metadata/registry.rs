//! Provider discovery and lookup.
//!
//! Providers compiled into the binary are described by [`ProviderFactory`]
//! values. Each factory declares which shared dependencies it needs from the
//! closed set in [`Dependency`]; [`ProviderRegistry::discover`] builds every
//! factory whose needs can be met and records why the others were skipped.
//! The resulting registry is read-only for the rest of the process lifetime
//! and its order defines provider priority when results are merged.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::provider::MetadataProvider;

/// A shared dependency a provider may require at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    /// The shared HTTP client.
    Transport,
    /// The tracing span provider logs are recorded under.
    Logger,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => f.write_str("transport"),
            Self::Logger => f.write_str("logger"),
        }
    }
}

/// Dependencies available to provider constructors.
#[derive(Debug, Clone, Default)]
pub struct SharedDeps {
    pub transport: Option<reqwest::Client>,
    pub logger: Option<tracing::Span>,
}

impl SharedDeps {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: provide the HTTP transport.
    pub fn with_transport(mut self, client: reqwest::Client) -> Self {
        self.transport = Some(client);
        self
    }

    /// Builder: provide the logging span.
    pub fn with_logger(mut self, span: tracing::Span) -> Self {
        self.logger = Some(span);
        self
    }

    fn provides(&self, dependency: Dependency) -> bool {
        match dependency {
            Dependency::Transport => self.transport.is_some(),
            Dependency::Logger => self.logger.is_some(),
        }
    }

    /// Returns the first dependency in `required` that is not available.
    pub fn missing(&self, required: &[Dependency]) -> Option<Dependency> {
        required.iter().copied().find(|d| !self.provides(*d))
    }
}

type BuildFn = dyn Fn(&SharedDeps) -> anyhow::Result<Arc<dyn MetadataProvider>> + Send + Sync;

/// Constructor for one provider instance.
pub struct ProviderFactory {
    kind: &'static str,
    name: String,
    requires: &'static [Dependency],
    build: Box<BuildFn>,
}

impl ProviderFactory {
    /// Create a factory.
    ///
    /// `build` is only invoked once every dependency in `requires` is
    /// present, so it may rely on them being `Some`.
    pub fn new(
        kind: &'static str,
        name: impl Into<String>,
        requires: &'static [Dependency],
        build: impl Fn(&SharedDeps) -> anyhow::Result<Arc<dyn MetadataProvider>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            requires,
            build: Box::new(build),
        }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requires(&self) -> &'static [Dependency] {
        self.requires
    }
}

impl fmt::Debug for ProviderFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderFactory")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("requires", &self.requires)
            .finish_non_exhaustive()
    }
}

/// Why a provider candidate did not make it into the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    MissingDependency(Dependency),
    ConstructionFailed(String),
    /// Another provider already registered this name; the first one wins.
    DuplicateName,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDependency(d) => write!(f, "missing dependency: {d}"),
            Self::ConstructionFailed(e) => write!(f, "construction failed: {e}"),
            Self::DuplicateName => f.write_str("duplicate provider name"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProvider {
    pub name: String,
    pub kind: &'static str,
    pub reason: SkipReason,
}

/// Outcome of [`ProviderRegistry::discover`].
pub struct Discovery {
    pub registry: ProviderRegistry,
    pub skipped: Vec<SkippedProvider>,
}

/// Ordered set of constructed providers.
///
/// Registration order is provider priority: earlier providers' results come
/// first in merged output.
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MetadataProvider>>,
}

impl ProviderRegistry {
    /// Create an empty registry with no providers.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Build every factory in order, skipping the ones that cannot be built.
    ///
    /// Discovery never fails as a whole; each skipped candidate is logged and
    /// reported in [`Discovery::skipped`].
    pub fn discover(factories: Vec<ProviderFactory>, deps: &SharedDeps) -> Discovery {
        let mut registry = Self::new();
        let mut skipped = Vec::new();

        for factory in factories {
            let reason = if let Some(missing) = deps.missing(factory.requires) {
                Some(SkipReason::MissingDependency(missing))
            } else {
                match (factory.build)(deps) {
                    Ok(provider) => {
                        if registry.register(provider) {
                            debug!(provider = factory.name(), kind = factory.kind, "Registered provider");
                            None
                        } else {
                            Some(SkipReason::DuplicateName)
                        }
                    }
                    Err(e) => Some(SkipReason::ConstructionFailed(format!("{e:#}"))),
                }
            };

            if let Some(reason) = reason {
                warn!(
                    provider = factory.name(),
                    kind = factory.kind,
                    reason = %reason,
                    "Skipping provider"
                );
                skipped.push(SkippedProvider {
                    name: factory.name,
                    kind: factory.kind,
                    reason,
                });
            }
        }

        info!(
            registered = registry.len(),
            skipped = skipped.len(),
            "Provider discovery complete"
        );

        Discovery { registry, skipped }
    }

    /// Register a provider.
    ///
    /// Returns `false` and drops `provider` if its name is already taken.
    pub fn register(&mut self, provider: Arc<dyn MetadataProvider>) -> bool {
        if self.get(provider.name()).is_some() {
            return false;
        }
        self.providers.push(provider);
        true
    }

    /// Look up a provider by its [`MetadataProvider::name`].
    pub fn get(&self, name: &str) -> Option<&Arc<dyn MetadataProvider>> {
        self.providers.iter().find(|p| p.name() == name)
    }

    /// All providers in priority order.
    pub fn providers(&self) -> &[Arc<dyn MetadataProvider>] {
        &self.providers
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Providers to query given an allow-list.
    ///
    /// An empty allow-list selects every provider. Order is always registry
    /// order, never allow-list order.
    pub fn enabled(&self, allow: &[String]) -> Vec<Arc<dyn MetadataProvider>> {
        self.providers
            .iter()
            .filter(|p| allow.is_empty() || allow.iter().any(|n| n == p.name()))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
