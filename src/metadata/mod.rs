//! Provider aggregation core.
//!
//! This module discovers metadata providers, fans searches out to them,
//! merges their results and turns the chosen record into what the catalog
//! shows.
//!
//! # Module layout
//!
//! - [`provider`] -- Trait every data source implements.
//! - [`registry`] -- Provider discovery and priority order.
//! - [`providers`] -- Built-in providers (JSON endpoint, local directory).
//! - [`dispatch`] -- Concurrent fan-out with per-provider deadlines.
//! - [`merge`] -- Priority-ordered fan-in.
//! - [`token`] -- Reference tokens for exact re-fetching.
//! - [`normalize`] -- Genre filtering, title cleanup and display names.
//! - [`cache`] -- Advisory on-disk record cache.
//! - [`service`] -- Search and full-record lookups for the catalog.

pub mod cache;
pub mod dispatch;
pub mod merge;
pub mod normalize;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod service;
pub mod template;
pub mod token;

#[cfg(test)]
mod test_fixtures;

pub use cache::ResultCache;
pub use dispatch::{dispatch, DispatchOptions, DispatchReport, ProviderOutcome, ProviderReport};
pub use merge::merge;
pub use normalize::{normalize, NormalizedRecord};
pub use provider::MetadataProvider;
pub use registry::{
    Dependency, Discovery, ProviderFactory, ProviderRegistry, SharedDeps, SkipReason,
    SkippedProvider,
};
pub use service::{
    MetadataRequest, MetadataResult, MetadataService, Person, PersonKind, SearchHit,
    SearchRequest,
};
pub use template::TitleTemplate;
pub use token::{resolve, ReferenceToken, Resolution};
