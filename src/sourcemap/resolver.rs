use super::cache::{CacheState, SingleFlightCache, SourceMapCache, SourceTextCache};
use super::consumer::{OriginalPosition, SourceMapConsumer};
use super::fetch::MapFetcher;
use crate::logging;
use std::future::Future;
use std::sync::{Arc, OnceLock};

/// Fetches, parses and queries source maps, fetching each map at most once.
pub struct SourceMapResolver {
    cache: SourceMapCache,
    fetcher: Arc<dyn MapFetcher>,
    /// Original sources fetched because the map embedded no content
    sources: SourceTextCache,
    mappings_location: String,
    engine: OnceLock<String>,
}

impl SourceMapResolver {
    pub fn new(fetcher: Arc<dyn MapFetcher>, mappings_location: impl Into<String>) -> Self {
        Self {
            cache: SourceMapCache::new(),
            fetcher,
            sources: SourceTextCache::new(),
            mappings_location: mappings_location.into(),
            engine: OnceLock::new(),
        }
    }

    /// One-time engine setup. Later calls are no-ops.
    pub fn initialize(&self) -> &str {
        self.engine.get_or_init(|| {
            if let Err(e) = reqwest::Url::parse(&self.mappings_location) {
                tracing::warn!(
                    location = %self.mappings_location,
                    error = %e,
                    "Mapping engine support location is not a valid URL"
                );
            }
            logging::log_engine_initialized(&self.mappings_location);
            self.mappings_location.clone()
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.engine.get().is_some()
    }

    pub fn cache(&self) -> &SourceMapCache {
        &self.cache
    }

    /// Original sources fetched separately from their maps.
    pub fn source_cache(&self) -> &SourceTextCache {
        &self.sources
    }

    /// Map a generated position through the map at `map_url`.
    pub async fn resolve_original_position(
        &self,
        map_url: &str,
        line: u32,
        column: u32,
    ) -> Option<OriginalPosition> {
        let consumer = self.consumer(map_url).await?;
        let position = consumer.original_position_for(line, column);
        if position.is_none() {
            logging::log_position_unmapped(map_url, line, column);
        }
        position
    }

    /// The 1-based `line` of `source`, left-trimmed.
    pub async fn resolve_source_content(
        &self,
        map_url: &str,
        source: &str,
        line: u32,
    ) -> Option<String> {
        let consumer = self.consumer(map_url).await?;
        let index = line.checked_sub(1)? as usize;

        match consumer.source_content_for(source) {
            Some(text) => nth_line(text, index),
            None => {
                let fetched = self.fetch_original_source(map_url, source).await?;
                nth_line(&fetched, index)
            }
        }
    }

    async fn consumer(&self, map_url: &str) -> Option<Arc<SourceMapConsumer>> {
        self.initialize();

        single_flight(&self.cache, map_url, move || async move {
            logging::log_map_fetch_start(map_url);
            let parsed = self
                .fetcher
                .fetch_text(map_url)
                .await
                .and_then(|text| SourceMapConsumer::from_json(&text));

            match parsed {
                Ok(consumer) => {
                    logging::log_map_resolved(map_url, consumer.sources().len());
                    Some(Arc::new(consumer))
                }
                Err(e) => {
                    logging::log_map_failed(map_url, &e.to_string());
                    None
                }
            }
        })
        .await
    }

    async fn fetch_original_source(&self, map_url: &str, source: &str) -> Option<Arc<str>> {
        let source_url = reqwest::Url::parse(map_url)
            .and_then(|base| base.join(source))
            .ok()?
            .to_string();
        let url = source_url.as_str();

        single_flight(&self.sources, url, move || async move {
            logging::log_source_fetch(url);
            match self.fetcher.fetch_text(url).await {
                Ok(text) => Some(Arc::<str>::from(text)),
                Err(e) => {
                    tracing::debug!(url = %url, error = %e, "Original source unavailable");
                    None
                }
            }
        })
        .await
    }
}

/// Look `key` up in `cache`, running `load` only if no other caller has
/// claimed it. Waiters share the owner's outcome, failures included.
async fn single_flight<T, F, Fut>(cache: &SingleFlightCache<T>, key: &str, load: F) -> Option<Arc<T>>
where
    T: ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Option<Arc<T>>>,
{
    loop {
        match cache.get(key) {
            CacheState::Resolved(value) => return Some(value),
            CacheState::Failed => return None,
            CacheState::Pending(pending) => {
                logging::log_waiting_for_fetch(key);
                pending.wait().await;
            }
            CacheState::Absent => {
                // Lost the race to claim it; go round and wait instead.
                let Some(guard) = cache.mark_pending(key) else {
                    continue;
                };

                return match load().await {
                    Some(value) => {
                        guard.resolve(Arc::clone(&value));
                        Some(value)
                    }
                    None => {
                        guard.fail();
                        None
                    }
                };
            }
        }
    }
}

fn nth_line(text: &str, index: usize) -> Option<String> {
    text.split('\n')
        .nth(index)
        .map(|line| line.trim_end_matches('\r').trim_start().to_string())
}
