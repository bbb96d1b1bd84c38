pub mod annotator;
pub mod parser;
pub mod trimmer;

pub use annotator::{AnnotatedLine, TraceLineAnnotator};
pub use parser::{GeneratedLocation, TraceLineParser, V8TraceParser};
pub use trimmer::{CaptureLevel, TraceTrimmer, TrimmedTrace, ELLIPSIS};
