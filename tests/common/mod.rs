#![allow(dead_code)]
//! Shared fixtures for the integration tests.
//!
//! The app map sends generated `main.js:10:5` to `src/App.ts:42:3`, whose
//! line 42 declares `count` through the state hook.

use async_trait::async_trait;
use state_tracer::config::TraceConfig;
use state_tracer::sourcemap::{MapFetcher, SourceMapResolver};
use state_tracer::trace::V8TraceParser;
use state_tracer::TracerError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const BUNDLE: &str = "http://localhost:3000/static/js/main.js";
pub const BUNDLE_MAP: &str = "http://localhost:3000/static/js/main.js.map";
pub const VENDOR_MAP: &str = "http://localhost:3000/static/js/vendor.js.map";
pub const PREVIEW: &str = "const [count, setCount] = useDebuggableState(0);";

/// `main.js` line 10, column 5 -> `src/App.ts` line 42, column 3
pub const APP_MAPPINGS: &str = ";;;;;;;;;KAyCG";

pub fn app_source() -> String {
    let mut lines: Vec<String> = (1..=41).map(|i| format!("// line {}", i)).collect();
    lines.push(format!("    {}", PREVIEW));
    lines.push("    return <button onClick={() => setCount(count + 1)}>{count}</button>;".to_string());
    lines.join("\n")
}

pub fn app_map_json() -> String {
    serde_json::json!({
        "version": 3,
        "file": "main.js",
        "sources": ["src/App.ts"],
        "sourcesContent": [app_source()],
        "names": [],
        "mappings": APP_MAPPINGS,
    })
    .to_string()
}

/// Same mapping, but the original source must be fetched separately
pub fn app_map_without_content_json() -> String {
    serde_json::json!({
        "version": 3,
        "sources": ["src/App.ts"],
        "names": [],
        "mappings": APP_MAPPINGS,
    })
    .to_string()
}

/// A raw V8 trace from inside the state hook, as the runtime reports it
pub fn counter_trace() -> String {
    [
        "Error".to_string(),
        format!("    at useDebuggableState ({}:5:10)", BUNDLE),
        format!("    at Counter ({}:10:5)", BUNDLE),
        "    at renderWithHooks (http://localhost:3000/static/js/vendor.js:14803:18)".to_string(),
        "    at updateFunctionComponent (http://localhost:3000/static/js/vendor.js:17034:20)"
            .to_string(),
        "    at dispatchAction (http://localhost:3000/static/js/vendor.js:15696:9)".to_string(),
        format!("    at onClick ({}:12:40)", BUNDLE),
        "    at HTMLUnknownElement.callCallback (http://localhost:3000/static/js/vendor.js:3945:14)"
            .to_string(),
    ]
    .join("\n")
}

pub fn parser() -> V8TraceParser {
    V8TraceParser::from_config(&TraceConfig::default()).unwrap()
}

/// In-memory fetcher that records every request. Unknown URLs answer like a
/// 404.
#[derive(Default)]
pub struct MockFetcher {
    responses: HashMap<String, String>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app_map() -> Self {
        Self::new().respond(BUNDLE_MAP, app_map_json())
    }

    pub fn respond(mut self, url: &str, body: impl Into<String>) -> Self {
        self.responses.insert(url.to_string(), body.into());
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl MapFetcher for MockFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, TracerError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(delay) = self.delays.get(url) {
            tokio::time::sleep(*delay).await;
        }
        self.responses.get(url).cloned().ok_or_else(|| {
            TracerError::MapFetchError(format!("{} returned HTTP 404 Not Found", url))
        })
    }
}

pub fn resolver(fetcher: &Arc<MockFetcher>) -> SourceMapResolver {
    SourceMapResolver::new(
        Arc::clone(fetcher) as Arc<dyn MapFetcher>,
        TraceConfig::default().mappings_location,
    )
}
