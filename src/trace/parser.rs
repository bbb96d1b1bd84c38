use crate::config::TraceConfig;
use regex::Regex;
use std::ops::Range;

/// A reference to a position in generated (bundled) output found in a trace line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLocation {
    pub url: String,
    pub line: u32,
    pub column: u32,
    /// Byte range of the reference in the line, parentheses included
    pub span: Range<usize>,
}

impl GeneratedLocation {
    /// Where the source map for this bundle is expected to live
    pub fn map_url(&self) -> String {
        format!("{}.map", self.url)
    }
}

/// Reads one stack-trace dialect. Best-effort: lines the parser does not
/// understand are simply never annotated or matched.
pub trait TraceLineParser: Send + Sync {
    fn generated_location(&self, line: &str) -> Option<GeneratedLocation>;

    /// The frame of the function that reports state changes
    fn is_entry_frame(&self, line: &str) -> bool;

    /// The framework frame after which user frames start again
    fn is_dispatch_frame(&self, line: &str) -> bool;

    /// Name bound by `const [name, setName] = ...`, if the line has that shape
    fn destructured_name(&self, line: &str) -> Option<String>;
}

/// V8-style traces (`at fn (https://host/bundle.js:10:5)`) from React apps.
#[derive(Debug, Clone)]
pub struct V8TraceParser {
    location: Regex,
    entry: Regex,
    dispatch: Regex,
    destructure: Regex,
}

impl V8TraceParser {
    pub fn new(entry_frame: &str, dispatch_frame: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            location: Regex::new(r"\(?([^\s(]+\.js):(\d+):(\d+)\)?$")?,
            entry: Regex::new(&format!(r"at {}\b", regex::escape(entry_frame)))?,
            dispatch: Regex::new(&format!(r"^at {}\b", regex::escape(dispatch_frame)))?,
            // Two plain identifiers only; longer or nested patterns are unsupported.
            destructure: Regex::new(
                r"const\s+\[\s*([A-Za-z_$][\w$]*)\s*,\s*([A-Za-z_$][\w$]*)\s*\]",
            )?,
        })
    }

    pub fn from_config(config: &TraceConfig) -> Result<Self, regex::Error> {
        Self::new(&config.entry_frame, &config.dispatch_frame)
    }
}

impl TraceLineParser for V8TraceParser {
    fn generated_location(&self, line: &str) -> Option<GeneratedLocation> {
        let caps = self.location.captures(line)?;
        let whole = caps.get(0)?;
        Some(GeneratedLocation {
            url: caps[1].to_string(),
            line: caps[2].parse().ok()?,
            column: caps[3].parse().ok()?,
            span: whole.range(),
        })
    }

    fn is_entry_frame(&self, line: &str) -> bool {
        self.entry.is_match(line)
    }

    fn is_dispatch_frame(&self, line: &str) -> bool {
        self.dispatch.is_match(line)
    }

    fn destructured_name(&self, line: &str) -> Option<String> {
        self.destructure
            .captures(line)
            .map(|caps| caps[1].to_string())
    }
}
