// file: src/pipeline/mod.rs
// description: classification run orchestration module exports
// reference: internal module structure

pub mod aggregator;
pub mod orchestrator;
pub mod progress;

pub use aggregator::{AggregatedReport, Aggregator};
pub use orchestrator::{DocumentFailure, IocPipeline, RunOptions, RunSummary, run_report};
pub use progress::{ProgressTracker, RunStats};
