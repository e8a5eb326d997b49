//! Advisory on-disk copy of every record returned to the catalog.
//!
//! Layout: `{root}/{provider}/{num}.json`. The cache is never read during a
//! lookup; [`ResultCache::load`] exists for operators inspecting what a
//! provider returned.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use javscraper_common::VideoRecord;
use parking_lot::Mutex;
use tracing::{debug, warn};

pub struct ResultCache {
    root: PathBuf,
    // Serializes writers within this process; across processes the atomic
    // rename makes the last writer win.
    lock: Mutex<()>,
}

impl ResultCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the slot for `(provider, num)`.
    pub fn slot_path(&self, provider: &str, num: &str) -> PathBuf {
        self.root
            .join(sanitize(provider))
            .join(format!("{}.json", sanitize(num)))
    }

    /// Persist `record`. Failures are logged and otherwise ignored.
    pub fn store(&self, provider: &str, num: &str, record: &VideoRecord) {
        match self.try_store(provider, num, record) {
            Ok(path) => debug!(provider, num, path = %path.display(), "Cached record"),
            Err(e) => warn!(provider, num, error = %format!("{e:#}"), "Failed to cache record"),
        }
    }

    fn try_store(&self, provider: &str, num: &str, record: &VideoRecord) -> anyhow::Result<PathBuf> {
        let path = self.slot_path(provider, num);
        let dir = path
            .parent()
            .context("cache slot has no parent directory")?;
        let json = serde_json::to_vec_pretty(record).context("Failed to serialize record")?;

        let _guard = self.lock.lock();
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create cache directory: {}", dir.display()))?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        tmp.write_all(&json).context("Failed to write cache file")?;
        tmp.persist(&path)
            .with_context(|| format!("Failed to move cache file into {}", path.display()))?;

        Ok(path)
    }

    /// Read back a cached record, if one exists.
    pub fn load(&self, provider: &str, num: &str) -> javscraper_common::Result<Option<VideoRecord>> {
        let content = match std::fs::read(self.slot_path(provider, num)) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }
}

/// Make `name` safe as a single path component.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" => "_".to_string(),
        "." | ".." => cleaned.replace('.', "_"),
        _ => cleaned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use javscraper_common::Error;

    fn record() -> VideoRecord {
        VideoRecord {
            title: "Foo".to_string(),
            genres: vec!["Drama".to_string()],
            ..VideoRecord::new("ABC-123", "javbus")
        }
    }

    #[test]
    fn test_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());

        cache.store("javbus", "ABC-123", &record());

        assert!(dir.path().join("javbus").join("ABC-123.json").is_file());
        assert_eq!(cache.load("javbus", "ABC-123").unwrap(), Some(record()));
    }

    #[test]
    fn test_last_writer_wins() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());

        cache.store("javbus", "ABC-123", &record());
        let updated = VideoRecord {
            title: "Bar".to_string(),
            ..record()
        };
        cache.store("javbus", "ABC-123", &updated);

        assert_eq!(cache.load("javbus", "ABC-123").unwrap(), Some(updated));
        let entries = std::fs::read_dir(dir.path().join("javbus")).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        assert_eq!(cache.load("javbus", "NOPE-1").unwrap(), None);
    }

    #[test]
    fn test_store_failure_is_swallowed() {
        let file = tempfile::NamedTempFile::new().unwrap();
        // Root is a regular file, so no directory can be created under it.
        let cache = ResultCache::new(file.path());

        let r = record();
        cache.store("javbus", "ABC-123", &r);

        assert_eq!(r, record());
        assert_matches!(cache.load("javbus", "ABC-123"), Err(Error::Io(_)));
    }

    #[test]
    fn test_load_corrupt_slot_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResultCache::new(dir.path());
        let path = cache.slot_path("javbus", "ABC-123");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();

        assert_matches!(cache.load("javbus", "ABC-123"), Err(Error::Serialization(_)));
    }

    #[test]
    fn test_names_are_sanitized() {
        let cache = ResultCache::new("/cache");
        assert_eq!(
            cache.slot_path("../evil", "A/B"),
            PathBuf::from("/cache/.._evil/A_B.json")
        );
        assert_eq!(cache.slot_path("..", ""), PathBuf::from("/cache/__/_.json"));
    }

    #[test]
    fn test_concurrent_stores() {
        let dir = tempfile::tempdir().unwrap();
        let cache = std::sync::Arc::new(ResultCache::new(dir.path()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    let r = VideoRecord {
                        title: format!("t{i}"),
                        ..record()
                    };
                    cache.store("javbus", "ABC-123", &r);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let loaded = cache.load("javbus", "ABC-123").unwrap().unwrap();
        assert!(loaded.title.starts_with('t'));
    }
}
