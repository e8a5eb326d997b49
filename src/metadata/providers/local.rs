//! Provider reading pre-parsed records from a directory.
//!
//! Every `*.json` file in the directory holds one [`VideoRecord`]. The file
//! stem is the record's lookup key.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use javscraper_common::VideoRecord;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::metadata::provider::MetadataProvider;

pub struct LocalProvider {
    name: String,
    dir: PathBuf,
    span: tracing::Span,
}

impl LocalProvider {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, span: tracing::Span) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            span,
        }
    }

    async fn read_record(&self, path: &Path, stem: &str) -> anyhow::Result<VideoRecord> {
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut record: VideoRecord = serde_json::from_slice(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        record.provider.clone_from(&self.name);
        if record.num.is_empty() {
            record.num = stem.to_string();
        }
        if record.lookup_key() != stem {
            record.key = Some(stem.to_string());
        }
        Ok(record)
    }
}

fn json_stem(path: &Path) -> Option<&str> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if !is_json {
        return None;
    }
    path.file_stem()?.to_str()
}

#[async_trait]
impl MetadataProvider for LocalProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<VideoRecord>> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("Failed to read directory {}", self.dir.display()))?;

        let mut records = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if cancel.is_cancelled() {
                anyhow::bail!("{} search cancelled", self.name);
            }
            let path = entry.path();
            let Some(stem) = json_stem(&path) else {
                continue;
            };
            match self.read_record(&path, stem).await {
                Ok(record) => {
                    if stem.eq_ignore_ascii_case(key) || record.num.eq_ignore_ascii_case(key) {
                        records.push(record);
                    }
                }
                Err(e) => {
                    warn!(parent: &self.span, provider = %self.name, error = %format!("{e:#}"), "Skipping unreadable record");
                }
            }
        }

        // Directory order is unspecified.
        records.sort_by(|a, b| a.num.cmp(&b.num).then_with(|| a.lookup_key().cmp(b.lookup_key())));
        debug!(parent: &self.span, provider = %self.name, key, results = records.len(), "Search complete");
        Ok(records)
    }

    async fn fetch(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> anyhow::Result<Option<VideoRecord>> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            anyhow::bail!("Invalid record key: {key:?}");
        }
        if cancel.is_cancelled() {
            anyhow::bail!("{} fetch cancelled", self.name);
        }

        let path = self.dir.join(format!("{key}.json"));
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        self.read_record(&path, key).await.map(Some)
    }
}
