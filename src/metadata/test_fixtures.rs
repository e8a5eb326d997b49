use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use javscraper_common::VideoRecord;
use tokio_util::sync::CancellationToken;

use super::provider::MetadataProvider;

/// How a [`StubProvider`] behaves when queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubMode {
    Ok,
    Fail,
    /// Never completes and ignores cancellation.
    Hang,
}

/// Scriptable in-memory provider used across metadata tests.
pub struct StubProvider {
    name: String,
    records: Vec<VideoRecord>,
    delay: Duration,
    mode: StubMode,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    pub fn new(name: &str, records: Vec<VideoRecord>) -> Self {
        Self {
            name: name.to_string(),
            records,
            delay: Duration::ZERO,
            mode: StubMode::Ok,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(name: &str) -> Self {
        Self {
            mode: StubMode::Fail,
            ..Self::new(name, Vec::new())
        }
    }

    pub fn hanging(name: &str) -> Self {
        Self {
            mode: StubMode::Hang,
            ..Self::new(name, Vec::new())
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Shared counter of search + fetch calls.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    async fn behave(&self) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match self.mode {
            StubMode::Ok => Ok(()),
            StubMode::Fail => anyhow::bail!("{} is down", self.name),
            StubMode::Hang => {
                std::future::pending::<()>().await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl MetadataProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(
        &self,
        _key: &str,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Vec<VideoRecord>> {
        self.behave().await?;
        Ok(self.records.clone())
    }

    async fn fetch(
        &self,
        key: &str,
        _cancel: &CancellationToken,
    ) -> anyhow::Result<Option<VideoRecord>> {
        self.behave().await?;
        Ok(self.records.iter().find(|r| r.lookup_key() == key).cloned())
    }
}

pub fn make_record(num: &str, provider: &str, title: &str) -> VideoRecord {
    VideoRecord {
        title: title.to_string(),
        ..VideoRecord::new(num, provider)
    }
}
