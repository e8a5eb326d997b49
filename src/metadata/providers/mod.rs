//! Built-in metadata provider implementations.
//!
//! Each submodule implements the [`MetadataProvider`](super::MetadataProvider)
//! trait for one kind of data source. [`builtin_factories`] turns the
//! configured instances into factories for
//! [`ProviderRegistry::discover`](super::ProviderRegistry::discover).

pub mod json_api;
pub mod local;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

pub use json_api::JsonApiProvider;
pub use local::LocalProvider;

use super::provider::MetadataProvider;
use super::registry::{Dependency, ProviderFactory, SharedDeps};
use crate::config::ProvidersConfig;

const USER_AGENT: &str = concat!("javscraper/", env!("CARGO_PKG_VERSION"));

/// Factories for every configured provider, remote endpoints first.
pub fn builtin_factories(config: &ProvidersConfig) -> Vec<ProviderFactory> {
    let mut factories = Vec::with_capacity(config.json_api.len() + config.local.len());

    for api in &config.json_api {
        let api = api.clone();
        factories.push(ProviderFactory::new(
            "json_api",
            api.name.clone(),
            &[Dependency::Transport, Dependency::Logger],
            move |deps| {
                let client = deps.transport.clone().context("transport not provided")?;
                let span = deps.logger.clone().context("logger not provided")?;
                let provider = JsonApiProvider::new(&api, client, span)?;
                Ok(Arc::new(provider) as Arc<dyn MetadataProvider>)
            },
        ));
    }

    for local in &config.local {
        let local = local.clone();
        factories.push(ProviderFactory::new(
            "local",
            local.name.clone(),
            &[Dependency::Logger],
            move |deps| {
                let span = deps.logger.clone().context("logger not provided")?;
                if !local.path.is_dir() {
                    anyhow::bail!("{} is not a directory", local.path.display());
                }
                let provider = LocalProvider::new(local.name.clone(), local.path.clone(), span);
                Ok(Arc::new(provider) as Arc<dyn MetadataProvider>)
            },
        ));
    }

    factories
}

/// Shared dependencies for the built-in providers.
///
/// `request_timeout` bounds each HTTP request made through the transport.
pub fn shared_deps(request_timeout: Duration) -> anyhow::Result<SharedDeps> {
    let client = reqwest::Client::builder()
        .timeout(request_timeout)
        .user_agent(USER_AGENT)
        .build()
        .context("Failed to build HTTP client")?;
    Ok(SharedDeps::new()
        .with_transport(client)
        .with_logger(tracing::info_span!("provider")))
}
