// file: src/exporter/mod.rs
// description: report output module exports
// reference: internal module structure

pub mod json;
pub mod report;

pub use json::{IndicatorExport, JsonExporter};
pub use report::ReportWriter;
