use reqwest::Url;
use tracing::warn;

use crate::config::ImageProxyConfig;

/// Rewrite `url` to go through the configured image relay.
///
/// Returns `{base_url}/image?url=<encoded>` when the relay is enabled, and
/// `url` unchanged otherwise (or when the relay URL cannot be built).
pub fn build_proxy_url(config: &ImageProxyConfig, url: &str) -> String {
    let base = match (config.enabled, config.base_url.as_deref()) {
        (true, Some(base)) if !base.trim().is_empty() => base.trim().trim_end_matches('/'),
        _ => return url.to_string(),
    };

    match Url::parse_with_params(&format!("{base}/image"), &[("url", url)]) {
        Ok(proxied) => proxied.to_string(),
        Err(e) => {
            warn!(base_url = base, error = %e, "Invalid image proxy base URL; using upstream URL");
            url.to_string()
        }
    }
}
