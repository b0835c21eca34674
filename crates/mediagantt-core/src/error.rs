// crates/mediagantt-core/src/error.rs

use std::path::PathBuf;

use mediagantt_parser::ParserError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Table parsing failed: {0}")]
    Parser(#[from] ParserError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Spreadsheet export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("no records loaded; import a task table before {operation}")]
    EmptyDataset { operation: &'static str },

    #[error("unsupported export file '{}' (expected .tsv, .txt, .csv, .parquet or .xlsx)", path.display())]
    UnsupportedExport { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
