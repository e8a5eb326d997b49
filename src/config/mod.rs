mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    expand_paths(&mut config);

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./javscraper.toml",
        "~/.config/javscraper/config.toml",
        "/etc/javscraper/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    // Return default config if no file found
    let mut config = Config::default();
    expand_paths(&mut config);
    Ok(config)
}

fn expand_paths(config: &mut Config) {
    config.cache.path = expand(&config.cache.path);
    for local in config.providers.local.iter_mut() {
        local.path = expand(&local.path);
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).as_ref())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.providers.timeout_secs == 0 {
        anyhow::bail!("Provider timeout cannot be 0");
    }

    // Provider names must be unique across kinds
    let mut names = HashSet::new();
    let configured = config
        .providers
        .json_api
        .iter()
        .map(|p| p.name.as_str())
        .chain(config.providers.local.iter().map(|p| p.name.as_str()));
    for name in configured {
        if name.trim().is_empty() {
            anyhow::bail!("Provider name cannot be empty");
        }
        if !names.insert(name) {
            anyhow::bail!("Provider '{}' is configured more than once", name);
        }
    }

    for api in &config.providers.json_api {
        reqwest::Url::parse(&api.base_url)
            .with_context(|| format!("Provider '{}' has an invalid base_url", api.name))?;
        if api.requests_per_second == 0 {
            anyhow::bail!("Provider '{}' requests_per_second cannot be 0", api.name);
        }
    }

    for local in &config.providers.local {
        if !local.path.exists() {
            tracing::warn!("Local provider path does not exist: {:?}", local.path);
        }
    }

    for name in &config.providers.enabled {
        if !names.contains(name.as_str()) {
            tracing::warn!("Enabled provider '{}' is not configured", name);
        }
    }

    if config.image_proxy.enabled {
        let base = config
            .image_proxy
            .base_url
            .as_deref()
            .context("Image proxy is enabled but has no base_url")?;
        reqwest::Url::parse(base).context("Image proxy base_url is invalid")?;
    }

    Ok(())
}
