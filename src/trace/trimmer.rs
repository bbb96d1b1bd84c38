use super::annotator::TraceLineAnnotator;
use super::parser::TraceLineParser;

/// Line standing in for the frames dropped after the mutation site
pub const ELLIPSIS: &str = "...";

/// How much of the trace is currently being kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureLevel {
    /// Annotate and keep every line
    Full,
    /// Keep lines until one names the mutated binding
    Half,
    /// Skip lines until the framework dispatch frame
    Stopped,
}

impl CaptureLevel {
    fn lowered(self) -> Self {
        match self {
            CaptureLevel::Full => CaptureLevel::Half,
            CaptureLevel::Half | CaptureLevel::Stopped => CaptureLevel::Stopped,
        }
    }

    pub fn is_capturing(self) -> bool {
        self != CaptureLevel::Stopped
    }
}

/// Output of [`TraceTrimmer::trim`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrimmedTrace {
    pub lines: Vec<String>,
    pub property_name: String,
    /// Preview of the last kept line that mapped to an original position,
    /// empty if none did or its source text was unavailable
    pub preview: String,
}

impl TrimmedTrace {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Cuts a raw trace down to the frames around the mutation site.
pub struct TraceTrimmer<'a> {
    annotator: TraceLineAnnotator<'a>,
    parser: &'a dyn TraceLineParser,
    fallback_name: &'a str,
}

impl<'a> TraceTrimmer<'a> {
    pub fn new(
        annotator: TraceLineAnnotator<'a>,
        parser: &'a dyn TraceLineParser,
        fallback_name: &'a str,
    ) -> Self {
        Self {
            annotator,
            parser,
            fallback_name,
        }
    }

    /// Walk `lines` in order, annotating the ones that are kept.
    ///
    /// Reaching the entry frame stops capture right away for updates. For an
    /// initial value the next frame (the component declaring the state) is
    /// kept too, and capture stops once a line names the binding.
    pub async fn trim<'l, I>(&self, lines: I, is_initial_value: bool) -> TrimmedTrace
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut level = CaptureLevel::Full;
        let mut kept = Vec::new();
        let mut property_name = None;
        let mut preview = String::new();

        for line in lines {
            let line = line.trim_start();

            if !level.is_capturing() {
                if self.parser.is_dispatch_frame(line) {
                    level = CaptureLevel::Full;
                }
                continue;
            }

            let annotated = self.annotator.annotate(line).await;
            if let Some(resolved) = &annotated.preview {
                preview.clone_from(resolved);
            }

            if self.parser.is_entry_frame(line) {
                level = if is_initial_value {
                    level.lowered()
                } else {
                    CaptureLevel::Stopped
                };
            } else if level == CaptureLevel::Half {
                if let Some(name) = self.parser.destructured_name(&annotated.text) {
                    property_name = Some(name);
                    level = CaptureLevel::Stopped;
                }
            }

            kept.push(annotated.text);
            if !level.is_capturing() {
                kept.push(ELLIPSIS.to_string());
            }
        }

        TrimmedTrace {
            lines: kept,
            property_name: property_name.unwrap_or_else(|| self.fallback_name.to_string()),
            preview,
        }
    }
}
