//! Benchmark metric extraction from run log lines.
//!
//! A run log line carries a metric if it contains the `csv,` marker
//! (case-insensitive) and splits into exactly three comma separated fields:
//!
//! ```text
//! CSV, latency_ms, 12.3
//! ```
//!
//! The second field is the metric name, the third its value. Everything else
//! in the log is ignored.

use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;
use serde_json::Value;

use crate::utils::find_index;

pub const PROGRAM_UNKNOWN: &str = "unknown";
pub const PROGRAM_TYPE: &str = "nuclei_ai";
pub const SUBTYPE: &str = "ai_ops";

const MARKER: &str = "csv,";

/// Metric name to (unconverted) value, in order of first appearance.
pub type Metrics = IndexMap<String, String>;

/// One metric extracted from a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Record<'a> {
    pub fn from_line(line: &'a str) -> Option<Record<'a>> {
        let stripped = line.trim();
        if !stripped.to_lowercase().contains(MARKER) {
            return None;
        }

        // lines with more or fewer fields are skipped, not reported
        let mut fields = stripped.split(',');
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(_), Some(key), Some(value), None) => Some(Record {
                key: key.trim(),
                value: value.trim(),
            }),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Benchmark {
    pub program_type: &'static str,
    pub subtype: &'static str,
    pub metrics: Option<Metrics>,
}

impl Benchmark {
    pub fn unknown() -> Benchmark {
        Benchmark {
            program_type: PROGRAM_UNKNOWN,
            subtype: PROGRAM_UNKNOWN,
            metrics: None,
        }
    }

    /// Classifies a set of metrics. An empty set is the unknown result.
    pub fn from_metrics(metrics: Metrics) -> Benchmark {
        if metrics.is_empty() {
            return Benchmark::unknown();
        }
        Benchmark {
            program_type: PROGRAM_TYPE,
            subtype: SUBTYPE,
            metrics: Some(metrics),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.metrics.is_none()
    }

    pub fn into_tuple(self) -> (&'static str, &'static str, Option<Metrics>) {
        (self.program_type, self.subtype, self.metrics)
    }

    /// Keeps only the metrics named in `keys`, ordered like `keys`.
    pub fn select(&self, keys: &[String]) -> Benchmark {
        let Some(metrics) = &self.metrics else {
            return Benchmark::unknown();
        };

        let selected = metrics
            .iter()
            .filter_map(|(key, value)| {
                find_index(key.as_str(), keys).map(|pos| (pos, key, value))
            })
            .sorted_by_key(|(pos, _, _)| *pos)
            .map(|(_, key, value)| (key.clone(), value.clone()))
            .collect::<Metrics>();

        Benchmark::from_metrics(selected)
    }
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "program type: {}", self.program_type)?;
        writeln!(f, "subtype:      {}", self.subtype)?;
        match &self.metrics {
            None => write!(f, "metrics:      none"),
            Some(metrics) => {
                let width = metrics.keys().map(|k| k.len() + 1).max().unwrap_or(0);
                let lines = metrics
                    .iter()
                    .map(|(k, v)| format!("  {:<width$} {v}", format!("{k}:")))
                    .join("\n");
                write!(f, "metrics:\n{lines}")
            }
        }
    }
}

/// Extracts benchmark metrics from run log lines.
///
/// `None` stands for input that is not a sequence of lines at all and yields
/// the unknown result, as does a sequence without a single metric line.
/// `log_label` only shows up in diagnostics.
pub fn parse_benchmark<S: AsRef<str>>(lines: Option<&[S]>, log_label: &str) -> Benchmark {
    match lines {
        Some(lines) => parse_lines(lines, log_label),
        None => {
            tracing::debug!(log = log_label, "input is not a sequence of lines");
            Benchmark::unknown()
        }
    }
}

pub fn parse_lines<I>(lines: I, log_label: &str) -> Benchmark
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut metrics = Metrics::new();
    for line in lines {
        if let Some(record) = Record::from_line(line.as_ref()) {
            // last one wins
            metrics.insert(record.key.to_string(), record.value.to_string());
        }
    }

    tracing::debug!(log = log_label, records = metrics.len(), "parsed benchmark");

    Benchmark::from_metrics(metrics)
}

/// Like [`parse_benchmark`], for dynamically typed input.
///
/// Only an array of strings counts as a sequence of lines.
pub fn parse_benchmark_value(value: &Value, log_label: &str) -> Benchmark {
    let lines: Option<Vec<&str>> = value
        .as_array()
        .and_then(|array| array.iter().map(Value::as_str).collect());

    parse_benchmark(lines.as_deref(), log_label)
}
