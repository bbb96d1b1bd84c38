use super::vlq;
use crate::TracerError;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Raw revision 3 source map document as served next to a bundle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSourceMap {
    pub version: u32,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub source_root: Option<String>,
    #[serde(default)]
    pub sources: Vec<Option<String>>,
    #[serde(default)]
    pub sources_content: Vec<Option<String>>,
    #[serde(default)]
    pub names: Vec<String>,
    pub mappings: String,
}

/// A location in pre-build source
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OriginalPosition {
    pub source: String,
    /// 1-based
    pub line: u32,
    /// 0-based
    pub column: u32,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy)]
struct Mapping {
    source: u32,
    line: u32,
    column: u32,
    name: Option<u32>,
}

/// Parsed source map answering position and content queries.
#[derive(Debug)]
pub struct SourceMapConsumer {
    /// Indexed by 0-based generated line, then generated column
    lines: Vec<BTreeMap<u32, Option<Mapping>>>,
    sources: Vec<String>,
    sources_content: Vec<Option<String>>,
    names: Vec<String>,
}

impl SourceMapConsumer {
    /// Parse a source map from its JSON text
    pub fn from_json(text: &str) -> Result<Self, TracerError> {
        let raw: RawSourceMap = serde_json::from_str(text)
            .map_err(|e| TracerError::MapParseError(format!("invalid JSON: {}", e)))?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawSourceMap) -> Result<Self, TracerError> {
        if raw.version != 3 {
            return Err(TracerError::MapParseError(format!(
                "unsupported source map version {}",
                raw.version
            )));
        }

        let root = raw
            .source_root
            .as_deref()
            .map(|r| r.trim_end_matches('/'))
            .filter(|r| !r.is_empty());
        let sources = raw
            .sources
            .iter()
            .map(|s| {
                let s = s.as_deref().unwrap_or_default();
                match root {
                    Some(root) => format!("{}/{}", root, s),
                    None => s.to_string(),
                }
            })
            .collect();

        Ok(Self {
            lines: decode_mappings(&raw.mappings)?,
            sources,
            sources_content: raw.sources_content,
            names: raw.names,
        })
    }

    /// Map a generated position (1-based line) to its original position.
    ///
    /// Picks the segment on the same line with the greatest column not past
    /// `column`. Returns `None` when nothing maps there.
    pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition> {
        let segments = self.lines.get(line.checked_sub(1)? as usize)?;
        let (_, mapping) = segments.range(..=column).next_back()?;
        let mapping = (*mapping)?;

        Some(OriginalPosition {
            source: self.sources.get(mapping.source as usize)?.clone(),
            line: mapping.line + 1,
            column: mapping.column,
            name: mapping
                .name
                .and_then(|n| self.names.get(n as usize))
                .cloned(),
        })
    }

    /// Embedded original source text for a (root-joined) source name
    pub fn source_content_for(&self, source: &str) -> Option<&str> {
        let index = self.sources.iter().position(|s| s == source)?;
        self.sources_content.get(index)?.as_deref()
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

fn decode_mappings(mappings: &str) -> Result<Vec<BTreeMap<u32, Option<Mapping>>>, TracerError> {
    let invalid = |line: usize, segment: &str| {
        TracerError::MapParseError(format!(
            "invalid mapping segment {:?} on generated line {}",
            segment,
            line + 1
        ))
    };

    let mut lines = Vec::new();
    let (mut source, mut original_line, mut original_column, mut name) = (0i64, 0i64, 0i64, 0i64);

    for (line_index, line) in mappings.split(';').enumerate() {
        let mut segments = BTreeMap::new();
        let mut generated_column = 0i64;

        for segment in line.split(',').filter(|s| !s.is_empty()) {
            let fields = vlq::decode_segment(segment).ok_or_else(|| invalid(line_index, segment))?;

            generated_column += fields[0];
            let mapping = match fields.len() {
                1 => None,
                4 | 5 => {
                    source += fields[1];
                    original_line += fields[2];
                    original_column += fields[3];
                    let name_index = fields.get(4).map(|delta| {
                        name += delta;
                        name
                    });
                    Some(Mapping {
                        source: to_index(source).ok_or_else(|| invalid(line_index, segment))?,
                        line: to_index(original_line).ok_or_else(|| invalid(line_index, segment))?,
                        column: to_index(original_column)
                            .ok_or_else(|| invalid(line_index, segment))?,
                        name: name_index.and_then(to_index),
                    })
                }
                _ => return Err(invalid(line_index, segment)),
            };

            let column = to_index(generated_column).ok_or_else(|| invalid(line_index, segment))?;
            segments.insert(column, mapping);
        }

        lines.push(segments);
    }

    Ok(lines)
}

fn to_index(value: i64) -> Option<u32> {
    u32::try_from(value).ok()
}
