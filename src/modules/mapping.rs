//! ISSN to ISSN-L mapping extraction
//!
//! Input is the NDJSON metadata dump of the ISSN portal (see `issnlister -m`),
//! one JSON-LD document per line. Every document yields at most one mapping row.

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::io::Write;

const ISSNL_PREFIX: &str = "resource/ISSN-L/";
const ISSN_PREFIX: &str = "resource/ISSN/";

/// Log directive that keeps skipped-line diagnostics visible whatever
/// `RUST_LOG` says.
pub const MAPPING_DIAGNOSTICS: &str = "issnlister::modules::mapping=warn";

/// A single output row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssnMapping {
    pub issn: String,
    /// Empty when the record carries no ISSN-L node
    pub issnl: String,
}

/// Why a line produced no row.
#[derive(Debug)]
pub enum Skipped {
    /// Line is not valid JSON
    Parse { line: usize, error: serde_json::Error },
    /// Parsed value has no `@graph` key
    MissingGraph(Value),
    /// No node of the graph denotes an ISSN resource
    MissingIssn(Value),
}

impl fmt::Display for Skipped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skipped::Parse { line, error } => write!(f, "line {}: {}", line, error),
            Skipped::MissingGraph(doc) => write!(f, "{}", doc),
            Skipped::MissingIssn(doc) => write!(f, "no ISSN node: {}", doc),
        }
    }
}

/// Extracts the mapping from one line. `line_no` is only used for diagnostics.
pub fn extract_record(line: &str, line_no: usize) -> Result<IssnMapping, Skipped> {
    let doc: Value = serde_json::from_str(line.trim()).map_err(|error| Skipped::Parse {
        line: line_no,
        error,
    })?;

    let Some(graph) = doc.get("@graph") else {
        return Err(Skipped::MissingGraph(doc));
    };

    let mut issn = None;
    let mut issnl = None;

    for node in graph.as_array().map(Vec::as_slice).unwrap_or_default() {
        let Some(id) = node.get("@id").and_then(Value::as_str) else {
            continue;
        };
        if id.starts_with(ISSNL_PREFIX) {
            issnl = Some(last_segment(id));
        }
        if id.starts_with(ISSN_PREFIX) {
            let resource = id.split('#').next().unwrap_or(id);
            issn = Some(last_segment(resource));
        }
    }

    match issn {
        Some(issn) => Ok(IssnMapping {
            issn: issn.to_string(),
            issnl: issnl.unwrap_or_default().to_string(),
        }),
        None => Err(Skipped::MissingIssn(doc)),
    }
}

fn last_segment(s: &str) -> &str {
    s.rsplit('/').next().unwrap_or(s)
}

/// Lazily maps lines to outcomes, in input order.
pub fn extract<I, S>(lines: I) -> impl Iterator<Item = Result<IssnMapping, Skipped>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .map(|(i, line)| extract_record(line.as_ref(), i + 1))
}

/// Writes mappings as tab separated rows without header or quoting.
pub struct TsvWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(out: W) -> Self {
        let inner = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .quote_style(csv::QuoteStyle::Never)
            .from_writer(out);
        Self { inner }
    }

    pub fn write(&mut self, mapping: &IssnMapping) -> Result<(), String> {
        self.inner
            .serialize(mapping)
            .map_err(|e| format!("Failed to write row: {}", e))
    }

    pub fn into_inner(self) -> Result<W, String> {
        self.inner
            .into_inner()
            .map_err(|e| format!("Failed to flush output: {}", e.error()))
    }
}

/// Counts of a full extraction run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExtractStats {
    pub written: usize,
    pub skipped: usize,
}

/// Runs the extraction over `lines`, writing rows to `out` and reporting
/// skipped lines through `tracing`.
pub fn write_mappings<I, S, W>(lines: I, out: W) -> Result<ExtractStats, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    W: Write,
{
    let mut writer = TsvWriter::new(out);
    let mut stats = ExtractStats::default();

    for outcome in extract(lines) {
        match outcome {
            Ok(mapping) => {
                writer.write(&mapping)?;
                stats.written += 1;
            }
            Err(skipped) => {
                tracing::warn!("{}", skipped);
                stats.skipped += 1;
            }
        }
    }

    writer.into_inner()?;
    Ok(stats)
}
