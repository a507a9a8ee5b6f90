// file: src/exporter/json.rs
// description: json export of the aggregated indicator collections

use crate::error::{PipelineError, Result};
use crate::pipeline::aggregator::AggregatedReport;
use crate::pipeline::progress::RunStats;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const EXPORT_FILE_NAME: &str = "indicators.json";

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct IndicatorExport<'a> {
    pub exported_at: String,
    pub total_indicators: usize,
    pub stats: &'a RunStats,
    #[serde(flatten)]
    pub report: &'a AggregatedReport,
}

impl JsonExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn export(
        &self,
        report: &AggregatedReport,
        stats: &RunStats,
        pretty: bool,
    ) -> Result<PathBuf> {
        let export = IndicatorExport {
            exported_at: Utc::now().to_rfc3339(),
            total_indicators: report.total_indicators(),
            stats,
            report,
        };

        let body = if pretty {
            serde_json::to_string_pretty(&export)?
        } else {
            serde_json::to_string(&export)?
        };

        let path = self.output_dir.join(EXPORT_FILE_NAME);
        write_file(&path, &body)?;

        info!(
            "JSON export complete: {} indicators written to {}",
            export.total_indicators,
            path.display()
        );
        Ok(path)
    }
}

fn write_file(path: &Path, body: &str) -> Result<()> {
    fs::write(path, body).map_err(|source| PipelineError::FileOperation {
        path: path.to_path_buf(),
        source,
    })
}
