// file: src/utils/validation.rs
// description: path and configuration value validation helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::{Component, Path};

pub struct Validator;

impl Validator {
    pub fn validate_directory(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::Validation(format!(
                "Directory does not exist: {}",
                path.display()
            )));
        }

        if !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path is not a directory: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// Accepts a bare file name only, so outputs stay inside their directory.
    pub fn validate_file_name(name: &str) -> Result<()> {
        let mut components = Path::new(name).components();

        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(()),
            _ => Err(PipelineError::Validation(format!(
                "Expected a plain file name, got: {}",
                name
            ))),
        }
    }

    pub fn truncate_text(text: &str, max_chars: usize) -> String {
        match text.char_indices().nth(max_chars) {
            Some((byte_index, _)) => format!("{}...", &text[..byte_index]),
            None => text.to_string(),
        }
    }
}
