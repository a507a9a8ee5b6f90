// file: src/utils/template.rs
// description: Report template rendering with scalar and per-line list placeholders
// reference: Internal report template format

use crate::error::{PipelineError, Result};
use crate::models::IndicatorType;
use crate::pipeline::aggregator::AggregatedReport;
use crate::utils::dates::ReportDates;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

lazy_static! {
    static ref PLACEHOLDER: Regex =
        Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("PLACEHOLDER regex is valid");
}

/// List name for bulletin title tokens.
pub const TITLE_TOKENS_KEY: &str = "ib";
/// Alternate name for [`TITLE_TOKENS_KEY`].
pub const TITLE_TOKENS_ALIAS: &str = "titles";

/// Values available to report templates.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    scalars: BTreeMap<String, String>,
    lists: BTreeMap<String, Vec<String>>,
}

impl ReportContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_report(report: &AggregatedReport, dates: &ReportDates) -> Self {
        let mut context = Self::new();

        for (name, value) in dates.named() {
            context.insert_scalar(name, value);
        }

        context.insert_list(TITLE_TOKENS_KEY, report.title_tokens.clone());
        context.insert_list(TITLE_TOKENS_ALIAS, report.title_tokens.clone());
        for indicator_type in IndicatorType::PRIORITY {
            context.insert_list(
                indicator_type.template_key(),
                report.values(indicator_type).to_vec(),
            );
        }

        context
    }

    pub fn insert_scalar(&mut self, name: &str, value: impl Into<String>) {
        self.scalars.insert(name.to_string(), value.into());
    }

    pub fn insert_list(&mut self, name: &str, values: Vec<String>) {
        self.lists.insert(name.to_string(), values);
    }
}

pub struct ReportTemplate {
    name: String,
    source: String,
}

impl ReportTemplate {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, source))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A line holding a list placeholder is repeated once per list element.
    pub fn render(&self, context: &ReportContext) -> Result<String> {
        let mut output = String::with_capacity(self.source.len());

        for (index, line) in self.source.split_inclusive('\n').enumerate() {
            let mut list_keys = BTreeSet::new();

            for caps in PLACEHOLDER.captures_iter(line) {
                let key = &caps[1];
                if context.lists.contains_key(key) {
                    list_keys.insert(key.to_string());
                } else if !context.scalars.contains_key(key) {
                    return Err(self.error(index, format!("unknown placeholder '{}'", key)));
                }
            }

            match list_keys.len() {
                0 => output.push_str(&substitute(line, context, None)),
                1 => {
                    let key = list_keys.iter().next().map(String::as_str).unwrap_or_default();
                    for item in &context.lists[key] {
                        output.push_str(&substitute(line, context, Some((key, item))));
                    }
                }
                _ => {
                    return Err(self.error(
                        index,
                        format!(
                            "a line may reference only one list, found {}",
                            list_keys.into_iter().collect::<Vec<_>>().join(", ")
                        ),
                    ));
                }
            }
        }

        Ok(output)
    }

    fn error(&self, index: usize, message: String) -> PipelineError {
        PipelineError::Template {
            file: self.name.clone(),
            message: format!("line {}: {}", index + 1, message),
        }
    }
}

fn substitute(line: &str, context: &ReportContext, item: Option<(&str, &str)>) -> String {
    PLACEHOLDER
        .replace_all(line, |caps: &Captures| {
            let key = &caps[1];
            match item {
                Some((list_key, value)) if list_key == key => value.to_string(),
                _ => context.scalars.get(key).cloned().unwrap_or_default(),
            }
        })
        .into_owned()
}
