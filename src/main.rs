// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use ioc_report::utils::logging::{
    format_banner, format_error, format_info, format_success, init_logger,
};
use ioc_report::{
    Config, InputScanner, IocPipeline, PatternRegistry, ReportDates, RunOptions, Validator,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "ioc_report")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Normalize STIX observables and freeform IOC lists into indicator reports", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "IOC_REPORT_CONFIG",
        default_value = ioc_report::config::DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify all inputs and render the report templates
    Process {
        /// Run date used for the output directory and report dates (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        /// Also write indicators.json next to the rendered reports
        #[arg(long)]
        json: bool,

        #[arg(long)]
        no_progress: bool,
    },

    /// Classify values with the configured patterns and print their types
    Classify {
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Check configuration, patterns, and directories without processing
    Verify,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    colored::control::set_override(cli.color);
    init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());

    let config = Config::load(&cli.config).with_context(|| {
        format!("Failed to load configuration from {}", cli.config.display())
    })?;

    match cli.command {
        Commands::Process {
            date,
            json,
            no_progress,
        } => cmd_process(config, date, json, !no_progress),
        Commands::Classify { values } => cmd_classify(&config, &values),
        Commands::Verify => cmd_verify(&config),
    }
}

fn cmd_process(
    config: Config,
    date: Option<NaiveDate>,
    export_json: bool,
    show_progress: bool,
) -> Result<()> {
    let ioc_file_name = config.paths.ioc_input_filename.clone();
    let options = RunOptions {
        today: date.unwrap_or_else(|| ReportDates::local_today().today),
        export_json,
        show_progress,
    };

    let pipeline = IocPipeline::new(config).context("Invalid indicator patterns")?;
    let summary = pipeline.run(&options).context("Report run failed")?;

    for failure in &summary.failures {
        eprintln!(
            "{}",
            format_error(&format!(
                "Skipped {}: {}",
                failure.path.display(),
                Validator::truncate_text(&failure.reason, 200)
            ))
        );
    }

    println!();
    println!(
        "{}",
        format_success(&format!(
            "Completed processing the files, the output was written to: {}",
            summary.output_dir.display()
        ))
    );

    if let Some(path) = &summary.json_export {
        println!("{}", format_info(&format!("JSON export: {}", path.display())));
    }

    if let Some(path) = &summary.error_artifact {
        println!();
        println!(
            "{}",
            format_banner(&format!(
                "Errors were found in the {} input file and logged to {}",
                ioc_file_name,
                path.display()
            ))
        );
    }

    Ok(())
}

fn cmd_classify(config: &Config, values: &[String]) -> Result<()> {
    let registry =
        PatternRegistry::from_config(&config.patterns).context("Invalid indicator patterns")?;

    for value in values {
        let trimmed = value.trim();
        let Some(indicator_type) = registry.classify(trimmed) else {
            println!("unrecognized\t{}", trimmed);
            continue;
        };

        let shadowed: Vec<String> = registry
            .order()
            .filter(|t| *t != indicator_type && registry.matches(*t, trimmed))
            .map(|t| t.to_string())
            .collect();
        if shadowed.is_empty() {
            println!("{}\t{}", indicator_type, trimmed);
        } else {
            println!(
                "{}\t{}\t(also matches {})",
                indicator_type,
                trimmed,
                shadowed.join(", ")
            );
        }
    }

    Ok(())
}

fn cmd_verify(config: &Config) -> Result<()> {
    config.validate().context("Configuration is invalid")?;

    let registry =
        PatternRegistry::from_config(&config.patterns).context("Invalid indicator patterns")?;
    let order: Vec<String> = registry.order().map(|t| t.to_string()).collect();
    println!(
        "{}",
        format_success(&format!("Patterns compiled in order: {}", order.join(" → ")))
    );

    Validator::validate_directory(&config.paths.input_dir).context("Input directory")?;
    Validator::validate_directory(&config.paths.template_dir).context("Template directory")?;

    let inputs = InputScanner::new(config.paths.clone())
        .scan()
        .context("Failed to scan input directory")?;
    println!(
        "{}",
        format_info(&format!(
            "{} structured documents, ioc file {}",
            inputs.documents.len(),
            match &inputs.ioc_file {
                Some(path) => path.display().to_string(),
                None => "not present".to_string(),
            }
        ))
    );

    Ok(())
}
