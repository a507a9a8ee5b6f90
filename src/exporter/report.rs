// file: src/exporter/report.rs
// description: writes rendered report templates and the error artifact into the dated output directory

use crate::error::{PipelineError, Result};
use crate::utils::template::{ReportContext, ReportTemplate};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::FileOperation {
            path: output_dir.clone(),
            source,
        })?;
        Ok(Self { output_dir })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Renders every regular file in `template_dir` to a same-named output file.
    pub fn render_templates(
        &self,
        template_dir: &Path,
        context: &ReportContext,
    ) -> Result<Vec<PathBuf>> {
        let mut templates = Vec::new();
        for entry in WalkDir::new(template_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                PipelineError::Validation(format!(
                    "Cannot read template directory {}: {}",
                    template_dir.display(),
                    e
                ))
            })?;
            if entry.file_type().is_file() {
                templates.push(entry.into_path());
            }
        }

        let mut written = Vec::with_capacity(templates.len());
        for path in templates {
            let template = ReportTemplate::load(&path)?;
            let rendered = template.render(context)?;
            let target = self.write(template.name(), &rendered)?;
            debug!("Rendered {} -> {}", path.display(), target.display());
            written.push(target);
        }

        info!("Rendered {} report templates", written.len());
        Ok(written)
    }

    pub fn write_error_artifact(&self, file_name: &str, artifact: &str) -> Result<PathBuf> {
        let path = self.write(file_name, artifact)?;
        info!("Wrote unrecognized IOCs to {}", path.display());
        Ok(path)
    }

    fn write(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        fs::write(&path, content).map_err(|source| PipelineError::FileOperation {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
