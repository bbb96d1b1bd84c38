use super::record::{StateChangeRecord, StateValue};
use super::stack::StackTraceSource;
use crate::config::TraceConfig;
use crate::logging;
use crate::sourcemap::{HttpFetcher, MapFetcher, SourceMapResolver};
use crate::trace::{TraceLineAnnotator, TraceLineParser, TraceTrimmer, V8TraceParser};
use crate::{Result, TracerError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// First line of a trace as produced by the runtime, replaced by the event header
const RUNTIME_HEADER: &str = "Error";

/// Flags read by every capture attempt.
#[derive(Debug, Default)]
pub struct CaptureState {
    capturing: AtomicBool,
    initialized: AtomicBool,
}

impl CaptureState {
    pub fn is_capturing(&self) -> bool {
        self.capturing.load(Ordering::Acquire)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }
}

/// Captures state transitions into an append-only, in-memory log.
pub struct ChangeRecorder {
    config: TraceConfig,
    resolver: SourceMapResolver,
    parser: Box<dyn TraceLineParser>,
    stack_source: Box<dyn StackTraceSource>,
    state: CaptureState,
    changes: RwLock<Vec<StateChangeRecord>>,
}

impl ChangeRecorder {
    pub fn new<S>(config: TraceConfig, fetcher: Arc<dyn MapFetcher>, stack_source: S) -> Result<Self>
    where
        S: StackTraceSource + 'static,
    {
        let parser = V8TraceParser::from_config(&config).map_err(|e| {
            TracerError::ConfigError(format!("Invalid frame name in trace config: {}", e))
        })?;

        Ok(Self {
            resolver: SourceMapResolver::new(fetcher, config.mappings_location.clone()),
            config,
            parser: Box::new(parser),
            stack_source: Box::new(stack_source),
            state: CaptureState::default(),
            changes: RwLock::new(Vec::new()),
        })
    }

    /// Recorder that fetches source maps over HTTP.
    pub fn http<S>(config: TraceConfig, stack_source: S) -> Result<Self>
    where
        S: StackTraceSource + 'static,
    {
        Self::new(config, Arc::new(HttpFetcher::new()), stack_source)
    }

    /// Swap in a parser for a different trace dialect.
    pub fn with_parser<P>(mut self, parser: P) -> Self
    where
        P: TraceLineParser + 'static,
    {
        self.parser = Box::new(parser);
        self
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn resolver(&self) -> &SourceMapResolver {
        &self.resolver
    }

    pub fn state(&self) -> &CaptureState {
        &self.state
    }

    pub fn start_capture(&self) {
        self.state.capturing.store(true, Ordering::Release);
        logging::log_capture_toggled(true);
    }

    pub fn stop_capture(&self) {
        self.state.capturing.store(false, Ordering::Release);
        logging::log_capture_toggled(false);
    }

    pub fn is_capturing(&self) -> bool {
        self.state.is_capturing()
    }

    /// Record a transition using the trace from the configured stack source.
    /// Does nothing while capture is off.
    pub async fn capture(&self, from_value: StateValue, to_value: StateValue) {
        if !self.is_capturing() {
            return;
        }
        let raw_trace = self.stack_source.stack_trace();
        self.record(from_value, to_value, &raw_trace).await;
    }

    /// Record a transition for a trace the caller already holds.
    /// Does nothing while capture is off.
    pub async fn capture_with_trace(
        &self,
        from_value: StateValue,
        to_value: StateValue,
        raw_trace: &str,
    ) {
        if !self.is_capturing() {
            return;
        }
        self.record(from_value, to_value, raw_trace).await;
    }

    async fn record(&self, from_value: StateValue, to_value: StateValue, raw_trace: &str) {
        if !self.state.initialized.swap(true, Ordering::AcqRel) {
            self.resolver.initialize();
        }

        let full_trace = with_event_header(raw_trace, &from_value, &to_value);
        let annotator = TraceLineAnnotator::new(&self.resolver, self.parser.as_ref());
        let trimmer = TraceTrimmer::new(
            annotator,
            self.parser.as_ref(),
            &self.config.default_prop_name,
        );
        let trimmed = trimmer
            .trim(full_trace.lines(), from_value.is_unset())
            .await;

        let record = StateChangeRecord {
            from_value,
            to_value,
            annotated_trace: trimmed.text(),
            property_name: trimmed.property_name,
            full_trace,
            source_line_preview: trimmed.preview,
        };

        let mut changes = self.changes.write().unwrap_or_else(PoisonError::into_inner);
        logging::log_change_recorded(&record.property_name, changes.len() + 1);
        changes.push(record);
    }

    /// The last `count` records, oldest first.
    pub fn last_n(&self, count: usize) -> Vec<StateChangeRecord> {
        let changes = self.changes.read().unwrap_or_else(PoisonError::into_inner);
        let start = changes.len().saturating_sub(count);
        changes[start..].to_vec()
    }

    /// The most recent record, as a one-element (or empty) sequence.
    pub fn last(&self) -> Vec<StateChangeRecord> {
        self.last_n(1)
    }

    pub fn len(&self) -> usize {
        self.changes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn with_event_header(raw_trace: &str, from_value: &StateValue, to_value: &StateValue) -> String {
    let header = format!(
        "StateChangeEvent (from: {}, to: {})",
        from_value, to_value
    );

    if raw_trace.starts_with(RUNTIME_HEADER) {
        raw_trace.replacen(RUNTIME_HEADER, &header, 1)
    } else if raw_trace.is_empty() {
        header
    } else {
        format!("{}\n{}", header, raw_trace)
    }
}
