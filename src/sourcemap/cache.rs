use super::consumer::SourceMapConsumer;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Source maps keyed by map URL.
pub type SourceMapCache = SingleFlightCache<SourceMapConsumer>;

/// Original source texts keyed by source URL.
pub type SourceTextCache = SingleFlightCache<str>;

/// Resolution state of one URL as seen by a caller.
pub enum CacheState<T: ?Sized> {
    Absent,
    /// Another caller owns the fetch; wait on the handle.
    Pending(PendingFetch),
    Resolved(Arc<T>),
    Failed,
}

impl<T: ?Sized> fmt::Debug for CacheState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheState::Absent => f.write_str("Absent"),
            CacheState::Pending(_) => f.write_str("Pending"),
            CacheState::Resolved(_) => f.write_str("Resolved"),
            CacheState::Failed => f.write_str("Failed"),
        }
    }
}

enum Entry<T: ?Sized> {
    Pending(watch::Sender<bool>),
    Resolved(Arc<T>),
    Failed,
}

/// Handle shared by every caller waiting on the same in-flight fetch.
#[derive(Debug, Clone)]
pub struct PendingFetch {
    done: watch::Receiver<bool>,
}

impl PendingFetch {
    /// Resolves once the owning fetch settles the entry.
    pub async fn wait(mut self) {
        // A closed channel also means the entry has moved on.
        let _ = self.done.wait_for(|done| *done).await;
    }
}

/// Process-lifetime map from URL to resolution state, fetched at most once.
///
/// Entries move `Absent -> Pending -> Resolved | Failed` and never go back.
/// Nothing is evicted.
pub struct SingleFlightCache<T: ?Sized> {
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T: ?Sized> Default for SingleFlightCache<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<T: ?Sized> fmt::Debug for SingleFlightCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleFlightCache")
            .field("entries", &self.len())
            .finish()
    }
}

impl<T: ?Sized> SingleFlightCache<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry<T>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self, url: &str) -> CacheState<T> {
        match self.entries().get(url) {
            None => CacheState::Absent,
            Some(Entry::Pending(tx)) => CacheState::Pending(PendingFetch {
                done: tx.subscribe(),
            }),
            Some(Entry::Resolved(value)) => CacheState::Resolved(Arc::clone(value)),
            Some(Entry::Failed) => CacheState::Failed,
        }
    }

    /// Claim the fetch for `url`. Only succeeds while the entry is absent, so
    /// exactly one caller ends up owning it.
    ///
    /// Dropping the returned guard without settling it marks the entry failed.
    pub fn mark_pending(&self, url: &str) -> Option<PendingGuard<'_, T>> {
        let mut entries = self.entries();
        if entries.contains_key(url) {
            return None;
        }
        let (tx, _) = watch::channel(false);
        entries.insert(url.to_string(), Entry::Pending(tx));
        Some(PendingGuard {
            cache: self,
            url: url.to_string(),
            settled: false,
        })
    }

    /// Settle a pending entry with its value. Returns `false` (and changes
    /// nothing) unless the entry was pending.
    pub fn mark_resolved(&self, url: &str, value: Arc<T>) -> bool {
        self.settle(url, Entry::Resolved(value))
    }

    /// Settle a pending entry as permanently failed. Returns `false` (and
    /// changes nothing) unless the entry was pending.
    pub fn mark_failed(&self, url: &str) -> bool {
        self.settle(url, Entry::Failed)
    }

    fn settle(&self, url: &str, next: Entry<T>) -> bool {
        let previous = {
            let mut entries = self.entries();
            if matches!(entries.get(url), Some(Entry::Pending(_))) {
                entries.insert(url.to_string(), next)
            } else {
                None
            }
        };

        match previous {
            Some(Entry::Pending(waiters)) => {
                waiters.send_replace(true);
                true
            }
            _ => {
                tracing::warn!(url, "Ignoring settle of a cache entry that is not pending");
                false
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

/// Ownership of one in-flight fetch, obtained from [`SingleFlightCache::mark_pending`].
pub struct PendingGuard<'a, T: ?Sized> {
    cache: &'a SingleFlightCache<T>,
    url: String,
    settled: bool,
}

impl<T: ?Sized> PendingGuard<'_, T> {
    pub fn resolve(mut self, value: Arc<T>) {
        self.settled = true;
        self.cache.mark_resolved(&self.url, value);
    }

    pub fn fail(mut self) {
        self.settled = true;
        self.cache.mark_failed(&self.url);
    }
}

impl<T: ?Sized> Drop for PendingGuard<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            self.cache.mark_failed(&self.url);
        }
    }
}
