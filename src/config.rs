// file: src/config.rs
// description: application configuration management with yaml/toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::models::IndicatorType;
use crate::utils::Validator;
use chrono::NaiveDate;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub patterns: PatternConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub template_dir: PathBuf,
    pub output_dir: PathBuf,
    pub ioc_input_filename: String,
    pub ioc_error_filename: String,
    #[serde(default = "default_date_format")]
    pub output_dir_date_format: String,
}

/// Full-match patterns, one per indicator type.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternConfig {
    pub md5: String,
    pub sha1: String,
    pub sha256: String,
    pub ipv4: String,
    pub ipv6: String,
    pub email: String,
    pub url: String,
    pub domain: String,
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

impl PatternConfig {
    pub fn pattern_for(&self, indicator_type: IndicatorType) -> &str {
        match indicator_type {
            IndicatorType::Md5 => &self.md5,
            IndicatorType::Sha1 => &self.sha1,
            IndicatorType::Sha256 => &self.sha256,
            IndicatorType::Ipv4 => &self.ipv4,
            IndicatorType::Ipv6 => &self.ipv6,
            IndicatorType::Email => &self.email,
            IndicatorType::Url => &self.url,
            IndicatorType::Domain => &self.domain,
        }
    }
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            md5: r"[a-fA-F0-9]{32}".to_string(),
            sha1: r"[a-fA-F0-9]{40}".to_string(),
            sha256: r"[a-fA-F0-9]{64}".to_string(),
            ipv4: r"(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)".to_string(),
            ipv6: concat!(
                r"(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}",
                r"|(?:[0-9a-fA-F]{1,4}:){1,7}:",
                r"|(?:[0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}",
                r"|(?:[0-9a-fA-F]{1,4}:){1,5}(?::[0-9a-fA-F]{1,4}){1,2}",
                r"|(?:[0-9a-fA-F]{1,4}:){1,4}(?::[0-9a-fA-F]{1,4}){1,3}",
                r"|(?:[0-9a-fA-F]{1,4}:){1,3}(?::[0-9a-fA-F]{1,4}){1,4}",
                r"|(?:[0-9a-fA-F]{1,4}:){1,2}(?::[0-9a-fA-F]{1,4}){1,5}",
                r"|[0-9a-fA-F]{1,4}:(?::[0-9a-fA-F]{1,4}){1,6}",
                r"|:(?:(?::[0-9a-fA-F]{1,4}){1,7}|:)"
            )
            .to_string(),
            email: r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}".to_string(),
            url: r"[A-Za-z][A-Za-z0-9+.-]*://\S+".to_string(),
            domain: r"(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}"
                .to_string(),
        }
    }
}

impl Config {
    /// The file is required; a missing file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        dotenv().ok();

        if !path.is_file() {
            return Err(PipelineError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let builder = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("IOC_REPORT")
                    .separator("__")
                    .try_parsing(false),
            );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            paths: PathsConfig {
                input_dir: PathBuf::from("input"),
                template_dir: PathBuf::from("templates"),
                output_dir: PathBuf::from("output"),
                ioc_input_filename: "ioc.txt".to_string(),
                ioc_error_filename: "ioc_errors.txt".to_string(),
                output_dir_date_format: default_date_format(),
            },
            patterns: PatternConfig::default(),
        }
    }

    /// Path of the optional freeform indicator file.
    pub fn ioc_input_path(&self) -> PathBuf {
        self.paths.input_dir.join(&self.paths.ioc_input_filename)
    }

    /// Dated output directory for a run on `today`.
    pub fn output_dir_for(&self, today: NaiveDate) -> Result<PathBuf> {
        let mut dated = String::new();
        write!(dated, "{}", today.format(&self.paths.output_dir_date_format)).map_err(|_| {
            PipelineError::Config(format!(
                "output_dir_date_format is not a valid date format: {}",
                self.paths.output_dir_date_format
            ))
        })?;
        Ok(self.paths.output_dir.join(dated))
    }

    pub fn validate(&self) -> Result<()> {
        for (key, name) in [
            ("ioc_input_filename", &self.paths.ioc_input_filename),
            ("ioc_error_filename", &self.paths.ioc_error_filename),
        ] {
            Validator::validate_file_name(name)
                .map_err(|e| PipelineError::Config(format!("{}: {}", key, e)))?;
        }

        for indicator_type in IndicatorType::PRIORITY {
            if self.patterns.pattern_for(indicator_type).trim().is_empty() {
                return Err(PipelineError::Config(format!(
                    "pattern for {} must not be empty",
                    indicator_type
                )));
            }
        }

        let sample_date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
        let dated = self.output_dir_for(sample_date)?;
        if dated == self.paths.output_dir {
            return Err(PipelineError::Config(
                "output_dir_date_format must render a non-empty directory name".to_string(),
            ));
        }

        Ok(())
    }
}
