// file: src/extractor/line.rs
// description: classifies freeform indicator lines against the pattern registry
// reference: first-match-wins ordered classification

use crate::extractor::patterns::PatternRegistry;
use crate::models::IndicatorEntry;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Indicator(IndicatorEntry),
    /// Stripped text of a line no pattern accepted.
    Unrecognized(String),
    Blank,
}

pub struct LineClassifier<'a> {
    registry: &'a PatternRegistry,
}

impl<'a> LineClassifier<'a> {
    pub fn new(registry: &'a PatternRegistry) -> Self {
        Self { registry }
    }

    pub fn classify(&self, line: &str) -> LineOutcome {
        let value = line.trim();
        if value.is_empty() {
            return LineOutcome::Blank;
        }

        match self.registry.classify(value) {
            Some(indicator_type) => {
                debug!("Classified {} as {}", value, indicator_type);
                LineOutcome::Indicator(IndicatorEntry::new(indicator_type, value))
            }
            None => {
                warn!("Error processing IOC: {}", value);
                LineOutcome::Unrecognized(value.to_string())
            }
        }
    }
}
