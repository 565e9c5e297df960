use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use geo_types::Geometry;
use log::{debug, info, warn};
use wkt::TryFromWkt;

use crate::error::{DecodeError, ParseError};
use crate::feature::{FeatureCollection, FeatureSchema, GeometryRecord};

/// Decodes one line of text into a geometry, must be deterministic and free of side effects.
pub trait GeometryDecoder: Send + Sync {
    fn decode(&self, line: &str) -> Result<Geometry<f64>, DecodeError>;
}

/// Decodes well-known text, e.g. `POINT (1 2)`, `LINESTRING (0 0, 1 1)`, `POLYGON ((0 0, 1 0, 1 1, 0 0))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct WktDecoder;

impl GeometryDecoder for WktDecoder {
    /// Exactly one geometry per line, text after the geometry is rejected.
    fn decode(&self, line: &str) -> Result<Geometry<f64>, DecodeError> {
        let geometry = Geometry::<f64>::try_from_wkt_str(line).map_err(|error| DecodeError::new(error.to_string()))?;

        let trailing = trailing_text(line).trim();
        if !trailing.is_empty() {
            return Err(DecodeError::new(format!("unexpected text after geometry: '{}'", trailing)));
        }

        Ok(geometry)
    }
}

/// The text after the end of the first geometry, i.e. after its outermost closing parenthesis or `EMPTY` keyword.
fn trailing_text(line: &str) -> &str {
    let body_start = line.find('(');
    let empty_end = empty_keyword_end(line);

    match (body_start, empty_end) {
        (Some(start), Some(end)) if end <= start => &line[end..],
        (None, Some(end)) => &line[end..],
        (Some(start), _) => after_closing_parenthesis(&line[start..]),
        (None, None) => "",
    }
}

fn empty_keyword_end(line: &str) -> Option<usize> {
    const KEYWORD: &str = "EMPTY";

    let upper = line.to_ascii_uppercase();
    let bytes = upper.as_bytes();
    let is_word_byte = |index: usize| bytes.get(index).is_some_and(|byte| byte.is_ascii_alphanumeric());

    upper
        .match_indices(KEYWORD)
        .map(|(start, _)| (start, start + KEYWORD.len()))
        .find(|(start, end)| (*start == 0 || !is_word_byte(start - 1)) && !is_word_byte(*end))
        .map(|(_, end)| end)
}

fn after_closing_parenthesis(body: &str) -> &str {
    let mut depth = 0_usize;
    for (index, character) in body.char_indices() {
        match character {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &body[index + 1..];
                }
            }
            _ => {}
        }
    }
    ""
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserConfig {
    /// Required file extension, compared case-sensitively and without the leading dot.
    pub extension: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            extension: "txt".to_string(),
        }
    }
}

/// Outcome of a parse pass, successful records and failed lines each in file order.
#[derive(Debug, Clone)]
pub struct ParseReport {
    schema: Arc<FeatureSchema>,
    records: Vec<GeometryRecord>,
    failed_lines: Vec<String>,
}

impl ParseReport {
    pub fn success_records(&self) -> &[GeometryRecord] {
        &self.records
    }

    /// The raw text of each line which could not be decoded.
    pub fn failed_lines(&self) -> &[String] {
        &self.failed_lines
    }

    pub fn success_count(&self) -> usize {
        self.records.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failed_lines.len()
    }

    /// Number of non-empty lines processed.
    pub fn lines_processed(&self) -> usize {
        self.success_count() + self.failure_count()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_lines.is_empty()
    }

    pub fn into_parts(self) -> (FeatureCollection, Vec<String>) {
        (FeatureCollection::new(self.schema, self.records), self.failed_lines)
    }
}

pub struct LineGeometryParser<D = WktDecoder> {
    decoder: D,
    config: ParserConfig,
    schema: Arc<FeatureSchema>,
}

impl LineGeometryParser<WktDecoder> {
    pub fn new(config: ParserConfig) -> Self {
        Self::with_decoder(WktDecoder, config)
    }
}

impl Default for LineGeometryParser<WktDecoder> {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}

impl<D: GeometryDecoder> LineGeometryParser<D> {
    pub fn with_decoder(decoder: D, config: ParserConfig) -> Self {
        Self {
            decoder,
            config,
            schema: Arc::new(FeatureSchema::wkt_geometry()),
        }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Checks the extension, then that the path is a file, nothing is read.
    pub fn validate_file(&self, path: &Path) -> Result<(), ParseError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str());

        if extension != Some(self.config.extension.as_str()) {
            return Err(ParseError::InvalidInput {
                path: path.to_path_buf(),
                reason: format!("File selected is not an {} file", self.config.extension),
            });
        }

        if !path.is_file() {
            return Err(ParseError::InvalidInput {
                path: path.to_path_buf(),
                reason: "File does not exist".to_string(),
            });
        }

        Ok(())
    }

    #[profiling::function]
    pub fn parse(&self, path: &Path) -> Result<ParseReport, ParseError> {
        self.validate_file(path)?;

        let file = File::open(path).map_err(|error| ParseError::InvalidInput {
            path: path.to_path_buf(),
            reason: format!("Unable to open file: {}", error),
        })?;

        self.parse_reader(BufReader::new(file), path)
    }

    /// Reads lines until the reader is exhausted, `path` is only used for error context and logging.
    ///
    /// Empty lines are skipped. Lines which fail to decode, including whitespace-only lines and those which are not
    /// valid UTF-8, are recorded in the report and processing continues.
    pub fn parse_reader<R: BufRead>(&self, mut reader: R, path: &Path) -> Result<ParseReport, ParseError> {
        let mut records = Vec::new();
        let mut failed_lines = Vec::new();

        let mut buffer = Vec::new();
        let mut line_number = 0_usize;

        loop {
            buffer.clear();
            let bytes_read = reader
                .read_until(b'\n', &mut buffer)
                .map_err(|error| ParseError::Io {
                    path: PathBuf::from(path),
                    source: error,
                })?;
            if bytes_read == 0 {
                break;
            }
            line_number += 1;

            let line = match std::str::from_utf8(strip_line_ending(&buffer)) {
                Ok(line) => line,
                Err(_) => {
                    let line = String::from_utf8_lossy(strip_line_ending(&buffer)).into_owned();
                    debug!("Line {} is not valid UTF-8. line: {:?}", line_number, line);
                    failed_lines.push(line);
                    continue;
                }
            };

            if line.is_empty() {
                continue;
            }

            match self.decoder.decode(line) {
                Ok(geometry) => records.push(GeometryRecord::new(geometry, self.schema.clone())),
                Err(error) => {
                    debug!("Line {} rejected. line: {:?}, error: {}", line_number, line, error);
                    failed_lines.push(line.to_string());
                }
            }
        }

        info!(
            "Parsed '{}'. geometries: {}, invalid lines: {}",
            path.display(),
            records.len(),
            failed_lines.len()
        );
        if !failed_lines.is_empty() {
            warn!("Number of invalid lines: {}", failed_lines.len());
        }

        Ok(ParseReport {
            schema: self.schema.clone(),
            records,
            failed_lines,
        })
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
