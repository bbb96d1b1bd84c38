use std::fmt::Write;

/// Supplies the raw stack trace at the point a change is reported.
///
/// The trace should start at the caller of the capture entry point, with the
/// capture machinery itself already removed.
pub trait StackTraceSource: Send + Sync {
    fn stack_trace(&self) -> String;
}

impl<F> StackTraceSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn stack_trace(&self) -> String {
        self()
    }
}

/// Always reports the same trace. Useful for replaying a trace captured
/// elsewhere.
#[derive(Debug, Clone, Default)]
pub struct StaticTrace(pub String);

impl StaticTrace {
    pub fn new(trace: impl Into<String>) -> Self {
        Self(trace.into())
    }
}

impl StackTraceSource for StaticTrace {
    fn stack_trace(&self) -> String {
        self.0.clone()
    }
}

/// Frames that belong to the capture machinery rather than the caller.
const INTERNAL_FRAMES: &[&str] = &[
    "_Unwind_",
    "backtrace::",
    "std::backtrace",
    "state_tracer::recorder::stack::",
    "state_tracer::recorder::change_recorder::",
];

/// Upper bound on frames kept from one capture
const MAX_FRAMES: usize = 64;

/// Captures the live call stack of the thread reporting the change.
///
/// Frames are rendered in the V8 shape `at <symbol> (<file>:<line>:<col>)`
/// under an `Error` header, so [`crate::trace::V8TraceParser`] reads them
/// like a browser trace. Leading frames from the capture machinery are
/// dropped; integrations can list their own wrapper frames with
/// [`CallSiteTrace::skipping`].
#[derive(Debug, Clone)]
pub struct CallSiteTrace {
    skipped: Vec<String>,
}

impl Default for CallSiteTrace {
    fn default() -> Self {
        Self {
            skipped: INTERNAL_FRAMES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl CallSiteTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also drop leading frames whose symbol starts with `prefix`.
    pub fn skipping(mut self, prefix: impl Into<String>) -> Self {
        self.skipped.push(prefix.into());
        self
    }

    fn is_skipped(&self, symbol: &str) -> bool {
        let symbol = symbol.trim_start_matches('<');
        self.skipped.iter().any(|prefix| symbol.starts_with(prefix.as_str()))
    }
}

impl StackTraceSource for CallSiteTrace {
    fn stack_trace(&self) -> String {
        let backtrace = backtrace::Backtrace::new();
        let mut trace = String::from("Error");
        let mut at_top = true;
        let mut kept = 0;

        let symbols = backtrace.frames().iter().flat_map(|frame| frame.symbols());
        for symbol in symbols {
            let Some(name) = symbol.name() else {
                continue;
            };
            let name = format!("{:#}", name);
            if at_top && self.is_skipped(&name) {
                continue;
            }
            at_top = false;

            if kept == MAX_FRAMES {
                break;
            }
            kept += 1;

            let _ = write!(trace, "\n    at {}", name);
            if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                let column = symbol.colno().unwrap_or(0);
                let _ = write!(trace, " ({}:{}:{})", file.display(), line, column);
            }
        }

        trace
    }
}
