// file: src/pipeline/orchestrator.rs
// description: coordinates input discovery, classification, aggregation, and report output
// reference: single-threaded run over structured documents then the freeform ioc file

use crate::config::Config;
use crate::error::{PipelineError, Result};
use crate::exporter::{JsonExporter, ReportWriter};
use crate::extractor::{DocumentExtraction, LineClassifier, LineOutcome, ObservableMapper, PatternRegistry};
use crate::input::InputScanner;
use crate::parser::StixParser;
use crate::pipeline::aggregator::{AggregatedReport, Aggregator};
use crate::pipeline::progress::{ProgressTracker, RunStats};
use crate::utils::{ReportContext, ReportDates, Validator};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub today: NaiveDate,
    pub export_json: bool,
    pub show_progress: bool,
}

impl RunOptions {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            export_json: false,
            show_progress: false,
        }
    }
}

/// A structured document that was skipped, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentFailure {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub rendered: Vec<PathBuf>,
    pub error_artifact: Option<PathBuf>,
    pub json_export: Option<PathBuf>,
    pub failures: Vec<DocumentFailure>,
    pub stats: RunStats,
    pub report: AggregatedReport,
}

pub struct IocPipeline {
    config: Config,
    registry: PatternRegistry,
    parser: StixParser,
    mapper: ObservableMapper,
}

impl IocPipeline {
    /// Fails before any input is touched when the pattern set is unusable.
    pub fn new(config: Config) -> Result<Self> {
        let registry = PatternRegistry::from_config(&config.patterns)?;

        Ok(Self {
            config,
            registry,
            parser: StixParser::new(),
            mapper: ObservableMapper::new(),
        })
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    pub fn process_document(&self, path: &Path) -> Result<DocumentExtraction> {
        let document = self.parser.parse_file(path)?;
        self.mapper.map_document(&document)
    }

    /// Document-scoped failures are collected; anything else aborts the run.
    pub fn process_documents(
        &self,
        paths: &[PathBuf],
        aggregator: &mut Aggregator,
        stats: &mut RunStats,
        progress: &ProgressTracker,
    ) -> Result<Vec<DocumentFailure>> {
        let mut failures = Vec::new();

        for path in paths {
            info!("Processing input file: {}", path.display());
            progress.start_document(&path.display().to_string());

            match self.process_document(path) {
                Ok(extraction) => {
                    stats.documents_processed += 1;
                    stats.structured_entries += extraction.entries.len();
                    aggregator.add_extraction(extraction);
                }
                Err(e) if e.is_document_scoped() => {
                    error!(
                        "Skipping {}: {}",
                        path.display(),
                        Validator::truncate_text(&e.to_string(), 300)
                    );
                    stats.documents_failed += 1;
                    failures.push(DocumentFailure {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }

            progress.finish_document();
        }

        Ok(failures)
    }

    /// Classifies every line of `reader` in order. Invalid UTF-8 is replaced, not rejected.
    pub fn process_lines<R: BufRead>(
        &self,
        mut reader: R,
        aggregator: &mut Aggregator,
        stats: &mut RunStats,
    ) -> std::io::Result<()> {
        let classifier = LineClassifier::new(&self.registry);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            let outcome = classifier.classify(&line);
            match &outcome {
                LineOutcome::Indicator(_) => stats.lines_classified += 1,
                LineOutcome::Unrecognized(_) => stats.lines_unrecognized += 1,
                LineOutcome::Blank => stats.lines_blank += 1,
            }
            aggregator.add_line_outcome(outcome);
        }

        Ok(())
    }

    pub fn run(&self, options: &RunOptions) -> Result<RunSummary> {
        let paths = &self.config.paths;
        for dir in [&paths.input_dir, &paths.template_dir] {
            Validator::validate_directory(dir).map_err(|e| PipelineError::Config(e.to_string()))?;
        }

        let output_dir = self.config.output_dir_for(options.today)?;
        let writer = ReportWriter::new(&output_dir)?;

        let inputs = InputScanner::new(paths.clone()).scan()?;
        let mut aggregator = Aggregator::new();
        let mut stats = RunStats::new();
        let progress = ProgressTracker::new(inputs.documents.len(), options.show_progress);

        let failures =
            self.process_documents(&inputs.documents, &mut aggregator, &mut stats, &progress)?;
        progress.finish();

        match &inputs.ioc_file {
            Some(ioc_path) => {
                info!("Processing ioc file: {}", ioc_path.display());
                let file_error = |source| PipelineError::FileOperation {
                    path: ioc_path.clone(),
                    source,
                };
                let file = File::open(ioc_path).map_err(file_error)?;
                self.process_lines(BufReader::new(file), &mut aggregator, &mut stats)
                    .map_err(file_error)?;
            }
            None => info!(
                "No ioc file found at {}",
                self.config.ioc_input_path().display()
            ),
        }

        info!(
            "Aggregated {} distinct indicators",
            aggregator.indicator_count()
        );
        if aggregator.has_errors() {
            warn!(
                "{} IOC lines could not be classified",
                stats.lines_unrecognized
            );
        }
        let report = aggregator.finish();

        let error_artifact = match report.error_artifact(&paths.ioc_input_filename) {
            Some(artifact) => {
                Some(writer.write_error_artifact(&paths.ioc_error_filename, &artifact)?)
            }
            None => None,
        };

        let context = ReportContext::from_report(&report, &ReportDates::new(options.today));
        let rendered = writer.render_templates(&paths.template_dir, &context)?;

        stats.duration_ms = progress.elapsed_ms();

        let json_export = if options.export_json {
            Some(JsonExporter::new(&output_dir).export(&report, &stats, true)?)
        } else {
            None
        };

        stats.log_summary();

        Ok(RunSummary {
            output_dir,
            rendered,
            error_artifact,
            json_export,
            failures,
            stats,
            report,
        })
    }
}

/// Builds the pipeline from `config` and performs one full run.
pub fn run_report(config: Config, options: &RunOptions) -> Result<RunSummary> {
    IocPipeline::new(config)?.run(options)
}
