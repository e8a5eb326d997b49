//! Reference tokens: stable pointers from a surfaced result back to the
//! provider that produced it.
//!
//! A token is encoded as a small JSON object, e.g.
//! `{"provider":"javbus","key":"ABC-123","num":"ABC-123"}`, so any consumer
//! holding only the string can recover the provider and key. Tokens are
//! stored by callers indefinitely and must keep decoding across releases.

use std::fmt;
use std::str::FromStr;

use javscraper_common::{Error, VideoRecord};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::registry::ProviderRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceToken {
    pub provider: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num: Option<String>,
}

impl ReferenceToken {
    /// Build the token pointing back at `record`.
    pub fn attach(record: &VideoRecord) -> Self {
        Self {
            provider: record.provider.clone(),
            key: record.lookup_key().to_string(),
            num: (!record.num.is_empty()).then(|| record.num.clone()),
        }
    }

    pub fn encode(&self) -> String {
        self.to_string()
    }

    pub fn decode(encoded: &str) -> Result<Self, Error> {
        encoded.parse()
    }
}

impl fmt::Display for ReferenceToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl FromStr for ReferenceToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token: Self = serde_json::from_str(s.trim())
            .map_err(|e| Error::invalid_token(format!("{e}")))?;
        if token.provider.trim().is_empty() {
            return Err(Error::invalid_token("missing provider"));
        }
        if token.key.trim().is_empty() {
            return Err(Error::invalid_token("missing key"));
        }
        Ok(token)
    }
}

/// Outcome of resolving a [`ReferenceToken`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(VideoRecord),
    /// The provider no longer has the record, or failed to answer.
    Missing,
    /// No provider with the token's name is registered.
    ProviderUnavailable,
}

impl Resolution {
    pub fn into_record(self) -> Option<VideoRecord> {
        match self {
            Self::Found(record) => Some(record),
            _ => None,
        }
    }
}

/// Fetch the record a token points at directly from its provider.
pub async fn resolve(
    token: &ReferenceToken,
    registry: &ProviderRegistry,
    cancel: &CancellationToken,
) -> Resolution {
    let Some(provider) = registry.get(&token.provider) else {
        debug!(provider = %token.provider, "Token provider not registered");
        return Resolution::ProviderUnavailable;
    };

    match provider.fetch(&token.key, cancel).await {
        Ok(Some(mut record)) => {
            record.provider.clone_from(&token.provider);
            Resolution::Found(record)
        }
        Ok(None) => {
            debug!(provider = %token.provider, key = %token.key, "Token target no longer exists");
            Resolution::Missing
        }
        Err(e) => {
            warn!(
                provider = %token.provider,
                key = %token.key,
                error = %format!("{e:#}"),
                "Token resolution failed"
            );
            Resolution::Missing
        }
    }
}
