use std::path::Path;

use mediagantt_parser::{parse_record_table, RecordTable};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::{enrich, EnrichedTable};

/// Reads and parses a task table. Nothing is returned unless the whole file loads.
pub fn load_table(path: &Path) -> Result<RecordTable> {
    let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_record_table(&content)?;

    info!(
        path = %path.display(),
        format = table.format,
        columns = table.columns.len(),
        records = table.len(),
        "task table loaded"
    );
    Ok(table)
}

pub fn load_and_enrich(path: &Path, config: &PipelineConfig) -> Result<EnrichedTable> {
    let table = load_table(path)?;
    Ok(enrich(table, config))
}
