// src/dashboard/mod.rs
//! Read side of the pipeline: load the clean dataset through a cache and
//! compute the statistics the report shows.

pub mod cache;
pub mod summary;
pub mod table;

pub use cache::DatasetCache;
pub use summary::{Count, Summary};
pub use table::JobTable;

use crate::app_log;
use crate::config::ConfigManager;
use crate::normalizer::Normalizer;
use crate::storage;
use std::path::Path;
use std::time::Duration;

const LAST_UPDATED_FORMAT: &str = "%d %b %Y";

/// Run the normalizer and return its output. When that yields nothing, fall
/// back to whatever clean file is already on disk.
pub fn load_dataset(normalizer: &Normalizer) -> JobTable {
    let records = normalizer.normalize();
    if !records.is_empty() {
        return JobTable::from_records(&records);
    }

    let clean_path = normalizer.clean_path();
    if !clean_path.exists() {
        return JobTable::default();
    }
    match storage::read_table(clean_path) {
        Ok((headers, rows)) => {
            app_log!(info, "Loaded {} rows from {}", rows.len(), clean_path.display());
            JobTable::new(headers, rows)
        }
        Err(e) => {
            app_log!(error, "Failed to read {}: {}", clean_path.display(), e);
            JobTable::default()
        }
    }
}

/// Modification date of the clean file, e.g. `07 Mar 2025`.
pub fn last_updated(path: &Path) -> Option<String> {
    storage::modified_at(path).map(|t| t.format(LAST_UPDATED_FORMAT).to_string())
}

pub struct Dashboard {
    normalizer: Normalizer,
    cache: DatasetCache<JobTable>,
}

impl Dashboard {
    pub fn new(normalizer: Normalizer, ttl: Duration) -> Self {
        Self {
            normalizer,
            cache: DatasetCache::new(ttl),
        }
    }

    pub fn from_config(config: &ConfigManager) -> Self {
        Self::new(Normalizer::from_config(config), config.cache_ttl())
    }

    /// The dataset, loaded at most once per TTL window.
    pub fn dataset(&mut self) -> &JobTable {
        let normalizer = &self.normalizer;
        self.cache.get_or_load(|| load_dataset(normalizer))
    }

    /// Drop the cached dataset so the next read reloads it.
    pub fn refresh(&mut self) {
        self.cache.invalidate();
    }

    pub fn summary(&mut self) -> Summary {
        Summary::from_table(self.dataset())
    }

    pub fn search(&mut self, term: &str) -> JobTable {
        self.dataset().search(term)
    }

    pub fn last_updated(&self) -> Option<String> {
        last_updated(self.normalizer.clean_path())
    }
}
