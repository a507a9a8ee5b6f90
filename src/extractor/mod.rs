// file: src/extractor/mod.rs
// description: indicator extraction module exports
// reference: internal module structure

pub mod line;
pub mod observable;
pub mod patterns;

pub use line::{LineClassifier, LineOutcome};
pub use observable::{DocumentExtraction, ObservableMapper};
pub use patterns::PatternRegistry;
