use super::parser::TraceLineParser;
use crate::sourcemap::SourceMapResolver;

/// Marker introducing the source preview under an annotated frame
pub const BRANCH_MARKER: &str = "└";
pub const INDENT: &str = "  ";

/// A trace line after source mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub text: String,
    /// The original source line for a mapped line, empty when its source
    /// text is unavailable. `None` when the position was not mapped.
    pub preview: Option<String>,
}

impl AnnotatedLine {
    fn unchanged(line: &str) -> Self {
        Self {
            text: line.to_string(),
            preview: None,
        }
    }
}

/// Rewrites generated positions in trace lines to original ones.
pub struct TraceLineAnnotator<'a> {
    resolver: &'a SourceMapResolver,
    parser: &'a dyn TraceLineParser,
}

impl<'a> TraceLineAnnotator<'a> {
    pub fn new(resolver: &'a SourceMapResolver, parser: &'a dyn TraceLineParser) -> Self {
        Self { resolver, parser }
    }

    /// Annotate one raw line. Never fails: anything that cannot be resolved
    /// keeps its generated coordinates.
    ///
    /// A mapped line always gets the preview continuation, even when the
    /// original source text cannot be found.
    pub async fn annotate(&self, raw_line: &str) -> AnnotatedLine {
        let Some(location) = self.parser.generated_location(raw_line) else {
            return AnnotatedLine::unchanged(raw_line);
        };

        let map_url = location.map_url();
        let Some(original) = self
            .resolver
            .resolve_original_position(&map_url, location.line, location.column)
            .await
        else {
            return AnnotatedLine::unchanged(raw_line);
        };

        let mut text = String::with_capacity(raw_line.len() + 32);
        text.push_str(&raw_line[..location.span.start]);
        text.push_str(&format!(
            "({}:{}:{})",
            original.source, original.line, original.column
        ));
        text.push_str(&raw_line[location.span.end..]);

        let preview = self
            .resolver
            .resolve_source_content(&map_url, &original.source, original.line)
            .await
            .unwrap_or_default();
        text.push('\n');
        text.push_str(BRANCH_MARKER);
        text.push_str(INDENT);
        text.push_str(&preview);

        AnnotatedLine {
            text,
            preview: Some(preview),
        }
    }
}
