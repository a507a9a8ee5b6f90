// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod input;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use config::{Config, PathsConfig, PatternConfig};
pub use error::{PipelineError, Result};
pub use exporter::{JsonExporter, ReportWriter};
pub use extractor::{
    DocumentExtraction, LineClassifier, LineOutcome, ObservableMapper, PatternRegistry,
};
pub use input::{InputScanner, InputSet};
pub use models::{IndicatorEntry, IndicatorType, StructuredDocument, StructuredObservable};
pub use parser::{DocumentFormat, StixParser};
pub use pipeline::{
    AggregatedReport, Aggregator, DocumentFailure, IocPipeline, RunOptions, RunStats,
    RunSummary, run_report,
};
pub use utils::{ReportContext, ReportDates, ReportTemplate, Validator};
