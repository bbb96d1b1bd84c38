pub mod cache;
pub mod consumer;
pub mod fetch;
pub mod resolver;
pub mod vlq;

pub use cache::{CacheState, PendingFetch, PendingGuard, SingleFlightCache, SourceMapCache, SourceTextCache};
pub use consumer::{OriginalPosition, SourceMapConsumer};
pub use fetch::{HttpFetcher, MapFetcher};
pub use resolver::SourceMapResolver;
