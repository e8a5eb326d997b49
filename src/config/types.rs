use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub image_proxy: ImageProxyConfig,
}

/// Rules applied when turning a provider record into a catalog record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Genres dropped from every record (case-insensitive)
    #[serde(default)]
    pub ignore_genres: Vec<String>,

    /// Also drop genres that are really actor names
    #[serde(default)]
    pub genre_ignore_actor: bool,

    /// Remove actor names appended to the end of titles
    #[serde(default = "default_true")]
    pub strip_actor_from_title: bool,

    /// Tag subtitled releases with `subtitle_genre`
    #[serde(default)]
    pub add_subtitle_genre: bool,

    #[serde(default = "default_subtitle_genre")]
    pub subtitle_genre: String,

    /// Input name suffixes that mark a subtitled release
    #[serde(default = "default_subtitle_suffixes")]
    pub subtitle_suffixes: Vec<String>,

    /// Display name template, e.g. `"%num% %title%"`. Empty means `"<num> <title>"`.
    #[serde(default)]
    pub title_format: String,

    /// Substituted for placeholders whose value is missing
    #[serde(default)]
    pub title_format_empty_value: String,
}

fn default_true() -> bool {
    true
}

fn default_subtitle_genre() -> String {
    "中文字幕".to_string()
}

fn default_subtitle_suffixes() -> Vec<String> {
    vec!["-C".to_string(), "-C2".to_string()]
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            ignore_genres: Vec::new(),
            genre_ignore_actor: false,
            strip_actor_from_title: default_true(),
            add_subtitle_genre: false,
            subtitle_genre: default_subtitle_genre(),
            subtitle_suffixes: default_subtitle_suffixes(),
            title_format: String::new(),
            title_format_empty_value: String::new(),
        }
    }
}

impl MetadataConfig {
    /// Returns `true` if `genre` is in the ignore list.
    pub fn is_ignored_genre(&self, genre: &str) -> bool {
        let genre = genre.trim();
        self.ignore_genres
            .iter()
            .any(|g| g.trim().eq_ignore_ascii_case(genre))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    /// Provider names to query. Empty queries every registered provider.
    #[serde(default)]
    pub enabled: Vec<String>,

    /// Hard per-provider deadline for one query
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub json_api: Vec<JsonApiConfig>,

    #[serde(default)]
    pub local: Vec<LocalProviderConfig>,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            enabled: Vec::new(),
            timeout_secs: default_timeout_secs(),
            json_api: Vec::new(),
            local: Vec::new(),
        }
    }
}

impl ProvidersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// A remote endpoint serving pre-parsed records as JSON.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonApiConfig {
    pub name: String,

    pub base_url: String,

    /// Sent as `Authorization: Bearer <key>` when set
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
}

fn default_requests_per_second() -> u32 {
    4
}

/// A directory of `*.json` records.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocalProviderConfig {
    pub name: String,

    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("~/.cache/javscraper")
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_cache_path(),
        }
    }
}

/// Image relay that cover URLs are rewritten to go through.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ImageProxyConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub base_url: Option<String>,
}
