use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::Table;
use mediagantt_core::config::{RawConfig, ThresholdInput};
use mediagantt_core::diagram::GanttDocument;
use mediagantt_core::export::{export_table, ExportTable};
use mediagantt_core::ingestion::load_and_enrich;
use mediagantt_core::{EnrichedTable, PipelineConfig};
use serde_json::{Map, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn media production task sheets into Mermaid Gantt charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a Mermaid Gantt script from a task table
    Generate(GenerateArgs),
    /// Export the filtered, enriched task table (.xlsx, .tsv, .txt, .csv or .parquet)
    Export(ExportArgs),
    /// Print the filtered, enriched task table
    Preview(PreviewArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Tab- or comma-separated task table
    input: PathBuf,
    /// Write the script here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct ExportArgs {
    input: PathBuf,
    output: PathBuf,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    input: PathBuf,
    /// Print records as JSON instead of a table
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug, Default)]
struct ConfigArgs {
    /// TOML configuration file (defaults to $MEDIAGANTT_CONFIG when set)
    #[arg(long)]
    config: Option<PathBuf>,
    /// End date for open-ended timelines (YYYY/M or YYYY/M/D)
    #[arg(long)]
    default_end: Option<String>,
    /// Pipe-delimited category keywords, in match order
    #[arg(long)]
    categories: Option<String>,
    /// Pipe-delimited milestone keywords
    #[arg(long)]
    milestones: Option<String>,
    #[arg(long)]
    crit: Option<String>,
    #[arg(long)]
    active: Option<String>,
    #[arg(long)]
    done: Option<String>,
    /// Emit the custom Mermaid theme directive
    #[arg(long)]
    custom_theme: bool,
    /// Do not append the raw timeline to task labels
    #[arg(long)]
    no_year_month: bool,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<PipelineConfig> {
        let config_path = self
            .config
            .clone()
            .or_else(|| env::var_os("MEDIAGANTT_CONFIG").map(PathBuf::from));

        let mut raw = match &config_path {
            Some(path) => RawConfig::from_path(path)?,
            None => RawConfig::default(),
        };

        if let Some(value) = &self.default_end {
            raw.default_end_date = value.clone();
        }
        if let Some(value) = &self.categories {
            raw.category_keywords = value.clone();
        }
        if let Some(value) = &self.milestones {
            raw.milestone_keywords = value.clone();
        }
        if let Some(value) = &self.crit {
            raw.thresholds.crit = ThresholdInput::from(value.as_str());
        }
        if let Some(value) = &self.active {
            raw.thresholds.active = ThresholdInput::from(value.as_str());
        }
        if let Some(value) = &self.done {
            raw.thresholds.done = ThresholdInput::from(value.as_str());
        }
        if self.custom_theme {
            raw.custom_theme = true;
        }
        if self.no_year_month {
            raw.append_timeline = false;
        }

        let config = raw.validate().context("invalid configuration")?;
        info!(
            config_file = ?config_path,
            categories = config.categorizer.len(),
            milestones = config.milestone_keywords.len(),
            "configuration resolved"
        );
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => handle_generate(args),
        Command::Export(args) => handle_export(args),
        Command::Preview(args) => handle_preview(args),
    }
}

fn load(input: &Path, config: &PipelineConfig) -> Result<EnrichedTable> {
    let table = load_and_enrich(input, config)
        .with_context(|| format!("failed to import {}", input.display()))?;
    if table.summary.invalid_timelines > 0 {
        warn!(
            invalid = table.summary.invalid_timelines,
            "some timelines could not be parsed and are marked Invalid Format"
        );
    }
    Ok(table)
}

fn handle_generate(args: GenerateArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let table = load(&args.input, &config)?;
    let document = GanttDocument::build(&table.records, &config)?;
    let script = document.to_string();

    match &args.output {
        Some(path) => {
            std::fs::write(path, &script)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(
                path = %path.display(),
                sections = document.sections.len(),
                tasks = document.task_count(),
                "gantt script written"
            );
        }
        None => print!("{script}"),
    }
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let table = load(&args.input, &config)?;
    let rows = export_table(&table, &config, &args.output)?;
    println!(
        "Exported {} of {} records to {}",
        rows,
        table.len(),
        args.output.display()
    );
    Ok(())
}

fn handle_preview(args: PreviewArgs) -> Result<()> {
    let config = args.config.resolve()?;
    let table = load(&args.input, &config)?;
    let export = ExportTable::build(&table, &config);

    if args.json {
        let headers: Vec<&str> = export.headers().collect();
        let rows: Vec<Value> = export
            .rows()
            .map(|row| {
                let object: Map<String, Value> = headers
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| {
                        (name.to_string(), cell.map(Value::String).unwrap_or(Value::Null))
                    })
                    .collect();
                Value::Object(object)
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    let mut grid = Table::new();
    grid.set_header(export.headers());
    for row in export.rows() {
        grid.add_row(row.into_iter().map(Option::unwrap_or_default));
    }
    println!("{grid}");
    println!(
        "{} of {} records shown; {} of those with invalid timelines",
        export.records.len(),
        table.len(),
        export.invalid_timelines()
    );
    Ok(())
}
