// file: src/pipeline/aggregator.rs
// description: merges classified indicators into deduplicated, sorted per-type collections
// reference: set-based dedup with deterministic ordering for reproducible reports

use crate::extractor::{DocumentExtraction, LineOutcome};
use crate::models::{IndicatorEntry, IndicatorType};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Header line written above unrecognized lines in the error artifact.
pub fn error_artifact_header(source_name: &str) -> String {
    format!(
        "Unable to detect the type of these IOCs from the input file {}",
        source_name
    )
}

/// Accumulates one run's indicators. Created per run, consumed by [`Aggregator::finish`].
#[derive(Debug, Default)]
pub struct Aggregator {
    indicators: BTreeMap<IndicatorType, BTreeSet<String>>,
    title_tokens: BTreeSet<String>,
    error_lines: Vec<String>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the (type, value) pair was already present.
    pub fn add_entry(&mut self, entry: IndicatorEntry) -> bool {
        self.indicators
            .entry(entry.indicator_type)
            .or_default()
            .insert(entry.value)
    }

    pub fn add_title_token(&mut self, token: impl Into<String>) {
        self.title_tokens.insert(token.into());
    }

    pub fn add_error_line(&mut self, line: impl Into<String>) {
        self.error_lines.push(line.into());
    }

    pub fn add_extraction(&mut self, extraction: DocumentExtraction) {
        self.add_title_token(extraction.title_token);
        for entry in extraction.entries {
            self.add_entry(entry);
        }
    }

    pub fn add_line_outcome(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Indicator(entry) => {
                self.add_entry(entry);
            }
            LineOutcome::Unrecognized(line) => self.add_error_line(line),
            LineOutcome::Blank => {}
        }
    }

    pub fn indicator_count(&self) -> usize {
        self.indicators.values().map(BTreeSet::len).sum()
    }

    pub fn has_errors(&self) -> bool {
        !self.error_lines.is_empty()
    }

    pub fn finish(self) -> AggregatedReport {
        let mut indicators = self.indicators;
        let collections = IndicatorType::PRIORITY
            .iter()
            .map(|t| {
                let values = indicators.remove(t).unwrap_or_default();
                (*t, values.into_iter().collect())
            })
            .collect();

        AggregatedReport {
            indicators: collections,
            title_tokens: self.title_tokens.into_iter().collect(),
            error_lines: self.error_lines,
        }
    }
}

/// Final, sorted output handed to report rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregatedReport {
    /// All eight types are present; each sequence ascending and distinct.
    pub indicators: BTreeMap<IndicatorType, Vec<String>>,
    pub title_tokens: Vec<String>,
    /// Unrecognized lines in original order.
    pub error_lines: Vec<String>,
}

impl AggregatedReport {
    pub fn values(&self, indicator_type: IndicatorType) -> &[String] {
        self.indicators
            .get(&indicator_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn total_indicators(&self) -> usize {
        self.indicators.values().map(Vec::len).sum()
    }

    /// Header plus one unrecognized line per line, or `None` for a clean run.
    pub fn error_artifact(&self, source_name: &str) -> Option<String> {
        if self.error_lines.is_empty() {
            return None;
        }

        let mut artifact = error_artifact_header(source_name);
        artifact.push('\n');
        for line in &self.error_lines {
            artifact.push_str(line);
            artifact.push('\n');
        }
        Some(artifact)
    }
}
