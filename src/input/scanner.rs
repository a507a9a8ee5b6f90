// file: src/input/scanner.rs
// description: Input directory discovery for STIX xml/json documents and the freeform ioc file
// reference: https://docs.rs/walkdir

use crate::config::PathsConfig;
use crate::error::{PipelineError, Result};
use crate::parser::stix::DocumentFormat;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

pub struct InputScanner {
    config: PathsConfig,
}

#[derive(Debug, Clone, Default)]
pub struct InputSet {
    /// Structured documents in sorted path order.
    pub documents: Vec<PathBuf>,
    pub ioc_file: Option<PathBuf>,
}

impl InputScanner {
    pub fn new(config: PathsConfig) -> Self {
        Self { config }
    }

    pub fn scan(&self) -> Result<InputSet> {
        let root = &self.config.input_dir;
        info!("Scanning input directory: {}", root.display());

        let ioc_path = root.join(&self.config.ioc_input_filename);
        let mut documents = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).max_depth(1).follow_links(true) {
            let entry = entry.map_err(|e| {
                PipelineError::Validation(format!("Cannot read {}: {}", root.display(), e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if path == ioc_path {
                continue;
            }
            if DocumentFormat::from_path(path).is_some() {
                documents.push(path.to_path_buf());
            } else {
                debug!("Ignoring non-document file: {}", path.display());
            }
        }

        documents.sort();

        let ioc_file = ioc_path.is_file().then_some(ioc_path);

        info!(
            "Found {} structured documents{}",
            documents.len(),
            if ioc_file.is_some() { " and an ioc file" } else { "" }
        );

        Ok(InputSet {
            documents,
            ioc_file,
        })
    }
}
