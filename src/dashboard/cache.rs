// src/dashboard/cache.rs
use crate::app_log;
use std::time::{Duration, Instant};

/// Memoizes one loaded value until `expires_at`, or until invalidated.
#[derive(Debug)]
pub struct DatasetCache<T> {
    ttl: Duration,
    entry: Option<CacheEntry<T>>,
}

#[derive(Debug)]
struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

impl<T> DatasetCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    /// Expiry of the cached value, if one is held.
    pub fn expires_at(&self) -> Option<Instant> {
        self.entry.as_ref().map(|e| e.expires_at)
    }

    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            app_log!(debug, "Dataset cache invalidated");
        }
    }

    /// Cached value if still fresh at `now`.
    pub fn get_at(&self, now: Instant) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|e| now < e.expires_at)
            .map(|e| &e.value)
    }

    pub fn get_or_load<F>(&mut self, load: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.get_or_load_at(Instant::now(), load)
    }

    /// Return the cached value, reloading first when it is missing or stale at `now`.
    pub fn get_or_load_at<F>(&mut self, now: Instant, load: F) -> &T
    where
        F: FnOnce() -> T,
    {
        if self.get_at(now).is_none() {
            self.entry = None;
        }
        let expires_at = now + self.ttl;
        let entry = self.entry.get_or_insert_with(|| {
            app_log!(debug, "Dataset cache miss, loading");
            CacheEntry {
                value: load(),
                expires_at,
            }
        });
        &entry.value
    }
}
