//! Reading existing source maps

use super::{join_source_root, vlq, RawSourceMap, SourceMapError};

/// One decoded mapping; lines are 1-based, columns 0-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    gen_line: usize,
    gen_col: usize,
    source: Option<usize>,
    orig_line: usize,
    orig_col: usize,
    name: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
    /// Source name with the map's `sourceRoot` applied
    pub source: String,
    pub line: usize,
    pub column: usize,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedPosition {
    pub line: usize,
    pub column: usize,
}

/// A parsed version 3 source map
#[derive(Debug, Clone)]
pub struct SourceMapConsumer {
    sources: Vec<String>,
    names: Vec<String>,
    sources_content: Vec<Option<String>>,
    file: Option<String>,
    /// Sorted by generated position
    entries: Vec<Entry>,
    /// Indices into `entries` sorted by original position
    by_original: Vec<usize>,
}

impl SourceMapConsumer {
    pub fn from_json(text: &str) -> Result<Self, SourceMapError> {
        let raw: RawSourceMap = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    pub fn from_raw(raw: RawSourceMap) -> Result<Self, SourceMapError> {
        if raw.version != 3 {
            return Err(SourceMapError::UnsupportedVersion(raw.version));
        }
        let root = raw.source_root.as_deref().unwrap_or("");
        let sources: Vec<String> = raw.sources.iter().map(|s| join_source_root(root, s)).collect();
        let entries = decode_mappings(&raw.mappings, sources.len(), raw.names.len())?;

        let mut by_original: Vec<usize> = (0..entries.len())
            .filter(|&i| entries[i].source.is_some())
            .collect();
        by_original.sort_by_key(|&i| {
            let e = &entries[i];
            (e.source, e.orig_line, e.orig_col, e.gen_line, e.gen_col)
        });

        Ok(Self {
            sources_content: raw
                .sources_content
                .unwrap_or_default()
                .into_iter()
                .chain(std::iter::repeat(None))
                .take(sources.len())
                .collect(),
            sources,
            names: raw.names,
            file: raw.file,
            entries,
            by_original,
        })
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn file(&self) -> Option<&str> {
        self.file.as_deref()
    }

    /// Embedded text of `source`, when the map carries it
    pub fn source_content(
        &self,
        source: &str,
    ) -> Option<&str> {
        let index = self.sources.iter().position(|s| s == source)?;
        self.sources_content.get(index)?.as_deref()
    }

    pub fn mapping_count(&self) -> usize {
        self.entries.len()
    }

    /// Original position of the nearest mapping at or before `column` on
    /// generated `line`
    pub fn original_position_for(
        &self,
        line: usize,
        column: usize,
    ) -> Option<OriginalPosition> {
        let end = self
            .entries
            .partition_point(|e| (e.gen_line, e.gen_col) <= (line, column));
        let entry = self.entries[..end]
            .iter()
            .rev()
            .take_while(|e| e.gen_line == line)
            .find(|e| e.source.is_some())?;
        Some(OriginalPosition {
            source: self.sources.get(entry.source?)?.clone(),
            line: entry.orig_line,
            column: entry.orig_col,
            name: entry.name.and_then(|n| self.names.get(n).cloned()),
        })
    }

    /// Generated position of the nearest mapping at or before `column` on
    /// original `line` of `source`
    pub fn generated_position_for(
        &self,
        source: &str,
        line: usize,
        column: usize,
    ) -> Option<GeneratedPosition> {
        let source = self.sources.iter().position(|s| s == source)?;
        let end = self.by_original.partition_point(|&i| {
            let e = &self.entries[i];
            (e.source, e.orig_line, e.orig_col) <= (Some(source), line, column)
        });
        let entry = self.by_original[..end]
            .iter()
            .rev()
            .map(|&i| &self.entries[i])
            .find(|e| e.source == Some(source) && e.orig_line == line)?;
        Some(GeneratedPosition {
            line: entry.gen_line,
            column: entry.gen_col,
        })
    }
}

fn decode_mappings(
    mappings: &str,
    source_count: usize,
    name_count: usize,
) -> Result<Vec<Entry>, SourceMapError> {
    let mut entries = Vec::new();
    let mut source: i64 = 0;
    let mut orig_line: i64 = 0;
    let mut orig_col: i64 = 0;
    let mut name: i64 = 0;

    for (line_index, line) in mappings.split(';').enumerate() {
        let mut gen_col: i64 = 0;
        for segment in line.split(',').filter(|s| !s.is_empty()) {
            let values = vlq::decode(segment)?;
            add_delta(&mut gen_col, values[0])?;
            let mut entry = Entry {
                gen_line: line_index + 1,
                gen_col: non_negative(gen_col)?,
                source: None,
                orig_line: 0,
                orig_col: 0,
                name: None,
            };
            match values.len() {
                1 => {}
                4 | 5 => {
                    add_delta(&mut source, values[1])?;
                    add_delta(&mut orig_line, values[2])?;
                    add_delta(&mut orig_col, values[3])?;
                    let index = non_negative(source)?;
                    if index >= source_count {
                        return Err(SourceMapError::Mappings {
                            message: format!("source index {} out of range", index),
                        });
                    }
                    entry.source = Some(index);
                    entry.orig_line = non_negative(orig_line)? + 1;
                    entry.orig_col = non_negative(orig_col)?;
                    if values.len() == 5 {
                        add_delta(&mut name, values[4])?;
                        let index = non_negative(name)?;
                        if index < name_count {
                            entry.name = Some(index);
                        }
                    }
                }
                n => {
                    return Err(SourceMapError::Mappings {
                        message: format!("segment with {} fields", n),
                    })
                }
            }
            entries.push(entry);
        }
    }

    entries.sort_by_key(|e| (e.gen_line, e.gen_col));
    Ok(entries)
}

/// Apply a relative field to its running total
fn add_delta(
    total: &mut i64,
    delta: i64,
) -> Result<(), SourceMapError> {
    *total = total.checked_add(delta).ok_or_else(|| SourceMapError::Mappings {
        message: "field value overflows".to_string(),
    })?;
    Ok(())
}

fn non_negative(value: i64) -> Result<usize, SourceMapError> {
    usize::try_from(value).map_err(|_| SourceMapError::Mappings {
        message: format!("negative position {}", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = r#"{
        "version": 3,
        "file": "min.js",
        "sourceRoot": "http://localhost/",
        "sources": ["a.js"],
        "names": ["foo"],
        "mappings": "AAAA,IAAIA;AACA"
    }"#;

    #[test]
    fn test_original_lookup() {
        let map = SourceMapConsumer::from_json(MAP).unwrap();
        assert_eq!(map.sources(), &["http://localhost/a.js".to_string()]);
        assert_eq!(map.file(), Some("min.js"));

        let exact = map.original_position_for(1, 4).unwrap();
        assert_eq!((exact.line, exact.column), (1, 4));
        assert_eq!(exact.name.as_deref(), Some("foo"));

        let nearest = map.original_position_for(1, 2).unwrap();
        assert_eq!((nearest.line, nearest.column), (1, 0));

        let second_line = map.original_position_for(2, 10).unwrap();
        assert_eq!((second_line.line, second_line.column), (2, 4));
    }

    #[test]
    fn test_no_mapping_on_line() {
        let map = SourceMapConsumer::from_json(MAP).unwrap();
        assert!(map.original_position_for(3, 0).is_none());
    }

    #[test]
    fn test_generated_lookup() {
        let map = SourceMapConsumer::from_json(MAP).unwrap();
        let generated = map.generated_position_for("http://localhost/a.js", 1, 5).unwrap();
        assert_eq!((generated.line, generated.column), (1, 4));
        assert!(map.generated_position_for("other.js", 1, 0).is_none());
    }

    #[test]
    fn test_rejects_other_versions() {
        let err = SourceMapConsumer::from_json(r#"{"version":2,"sources":[],"names":[],"mappings":""}"#)
            .unwrap_err();
        assert!(matches!(err, SourceMapError::UnsupportedVersion(2)));
    }

    #[test]
    fn test_overflowing_fields_rejected() {
        let mut huge = String::new();
        vlq::encode(i64::MAX >> 1, &mut huge);
        let mappings = [huge.as_str(); 3].join(",");
        let json = format!(r#"{{"version":3,"sources":["a.js"],"names":[],"mappings":"{}"}}"#, mappings);
        let err = SourceMapConsumer::from_json(&json).unwrap_err();
        assert!(matches!(err, SourceMapError::Mappings { .. }), "{:?}", err);
    }
}
