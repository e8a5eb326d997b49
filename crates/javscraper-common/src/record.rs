//! The raw per-provider video record.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date layouts providers are known to emit.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y%m%d"];

/// A provider's unnormalized result for one title.
///
/// `num` together with `provider` uniquely identifies a record within one
/// provider. `key` is the provider-specific lookup key used for direct
/// re-fetching; providers that look records up by `num` leave it unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Identifying code, e.g. `ABC-123`.
    pub num: String,
    /// Display title as returned by the provider.
    #[serde(default)]
    pub title: String,
    /// Plot summary.
    #[serde(default)]
    pub plot: Option<String>,
    /// Release date as free text. May not be parseable.
    #[serde(default)]
    pub date: Option<String>,
    /// Cover image URL.
    #[serde(default)]
    pub cover: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub actors: Vec<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub studio: Option<String>,
    #[serde(default)]
    pub maker: Option<String>,
    /// Collection or series name.
    #[serde(default)]
    pub set: Option<String>,
    /// Name of the provider that produced this record.
    #[serde(default)]
    pub provider: String,
    /// Provider-specific lookup key, when it differs from `num`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl VideoRecord {
    /// Create a record with just an identifying code and owning provider.
    pub fn new(num: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            num: num.into(),
            provider: provider.into(),
            ..Default::default()
        }
    }

    /// Key to hand back to the owning provider for a direct fetch.
    pub fn lookup_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.num)
    }

    /// Parse the free-text release date.
    ///
    /// Only the first whitespace-separated token is considered so values
    /// like `2020-01-02 10:00` still parse.
    pub fn release_date(&self) -> Option<NaiveDate> {
        let raw = self.date.as_deref()?.split_whitespace().next()?;
        DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
    }

    /// Release year, falling back to the first plausible 4-digit year in the
    /// date text when the full date cannot be parsed.
    pub fn year(&self) -> Option<i32> {
        if let Some(date) = self.release_date() {
            return Some(date.year());
        }
        self.date.as_deref().and_then(find_year)
    }

    /// Release month (1-12), only available when the full date parses.
    pub fn month(&self) -> Option<u32> {
        self.release_date().map(|d| d.month())
    }
}

fn find_year(text: &str) -> Option<i32> {
    let bytes = text.as_bytes();
    bytes.windows(4).enumerate().find_map(|(i, w)| {
        let before_ok = i == 0 || !bytes[i - 1].is_ascii_digit();
        let after_ok = bytes.get(i + 4).map_or(true, |b| !b.is_ascii_digit());
        if !(before_ok && after_ok && w.iter().all(u8::is_ascii_digit)) {
            return None;
        }
        let year: i32 = std::str::from_utf8(w).ok()?.parse().ok()?;
        (1900..=2100).contains(&year).then_some(year)
    })
}
