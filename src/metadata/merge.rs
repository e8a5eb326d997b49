use std::collections::HashMap;

use javscraper_common::VideoRecord;

/// Concatenate per-provider results in provider priority order.
///
/// `order` is the registry order of the providers that were queried. Each
/// provider's records keep the order the provider returned them in. Entries
/// in `per_provider` whose provider is not in `order` are dropped.
pub fn merge(order: &[&str], mut per_provider: HashMap<String, Vec<VideoRecord>>) -> Vec<VideoRecord> {
    let mut merged = Vec::with_capacity(per_provider.values().map(Vec::len).sum());
    for name in order {
        if let Some(records) = per_provider.remove(*name) {
            merged.extend(records);
        }
    }
    merged
}
