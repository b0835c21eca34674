use std::fs::File;
use std::path::Path;

use mediagantt_parser::{ColumnSlot, Field};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter};
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::pipeline::{EnrichedRecord, EnrichedTable};
use crate::timeline::INVALID_FORMAT;

pub const START_DATE_COLUMN: &str = "StartDate";
pub const END_DATE_COLUMN: &str = "EndDate";
pub const IMPORTANCE_COLUMN: &str = "Importance";
pub const LINK_COLUMN: &str = "Link";

const WORKSHEET_NAME: &str = "Tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    TabSeparated,
    CommaSeparated,
    Parquet,
    Xlsx,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("tsv") | Some("txt") => Ok(ExportFormat::TabSeparated),
            Some("csv") => Ok(ExportFormat::CommaSeparated),
            Some("parquet") => Ok(ExportFormat::Parquet),
            Some("xlsx") => Ok(ExportFormat::Xlsx),
            _ => Err(PipelineError::UnsupportedExport {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportColumnKind {
    Source(ColumnSlot),
    StartDate,
    EndDate,
    Importance,
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportColumn {
    pub name: String,
    pub kind: ExportColumnKind,
}

/// The filtered, enriched view of a table: source columns in file order followed by
/// the derived columns whose enrichment step ran.
#[derive(Debug, Clone)]
pub struct ExportTable<'a> {
    pub columns: Vec<ExportColumn>,
    pub records: Vec<&'a EnrichedRecord>,
}

impl<'a> ExportTable<'a> {
    pub fn build(table: &'a EnrichedTable, config: &PipelineConfig) -> Self {
        let steps = table.steps;
        let derived = [
            (START_DATE_COLUMN, ExportColumnKind::StartDate, steps.timeline),
            (END_DATE_COLUMN, ExportColumnKind::EndDate, steps.timeline),
            (IMPORTANCE_COLUMN, ExportColumnKind::Importance, steps.importance),
            (LINK_COLUMN, ExportColumnKind::Link, steps.link),
        ];

        let mut columns: Vec<ExportColumn> = table
            .columns
            .iter()
            // Re-imported exports carry stale derived columns; fresh values replace them.
            .filter(|column| {
                !matches!(column.slot, ColumnSlot::Extra(_))
                    || !derived
                        .iter()
                        .any(|(name, _, produced)| *produced && column.name == *name)
            })
            .map(|column| ExportColumn {
                name: column.name.clone(),
                kind: ExportColumnKind::Source(column.slot),
            })
            .collect();

        columns.extend(
            derived
                .iter()
                .filter(|(_, _, produced)| *produced)
                .map(|(name, kind, _)| ExportColumn {
                    name: name.to_string(),
                    kind: *kind,
                }),
        );

        let records = table
            .records
            .iter()
            .filter(|record| record.is_configured(config))
            .collect();

        Self { columns, records }
    }

    /// Invalid timelines among the rows kept by the category filter.
    pub fn invalid_timelines(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.schedule.is_some_and(|schedule| !schedule.is_valid()))
            .count()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|column| column.name.as_str())
    }

    pub fn cell(record: &EnrichedRecord, kind: ExportColumnKind) -> Option<String> {
        match kind {
            ExportColumnKind::Source(ColumnSlot::Field(Field::Category)) => {
                record.category_text().map(str::to_string)
            }
            ExportColumnKind::Source(slot) => record.raw.cell_text(slot),
            ExportColumnKind::StartDate => Some(
                record
                    .schedule
                    .map(|schedule| schedule.start_text())
                    .unwrap_or_else(|| INVALID_FORMAT.to_string()),
            ),
            ExportColumnKind::EndDate => Some(
                record
                    .schedule
                    .map(|schedule| schedule.end_text())
                    .unwrap_or_else(|| INVALID_FORMAT.to_string()),
            ),
            ExportColumnKind::Importance => record.importance.map(|tag| tag.to_string()),
            ExportColumnKind::Link => record.link.clone(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<String>>> + '_ {
        self.records.iter().map(|record| {
            self.columns
                .iter()
                .map(|column| Self::cell(record, column.kind))
                .collect()
        })
    }

    /// Writes a single-sheet workbook: a bold header row, then one row per record.
    /// `Count` cells are numeric, absent cells are left blank.
    pub fn write_xlsx(&self, file: &mut File) -> Result<()> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(WORKSHEET_NAME)?;

        for (col, column) in self.columns.iter().enumerate() {
            worksheet.write_string_with_format(
                0,
                col as u16,
                column.name.as_str(),
                &header_format,
            )?;
        }

        for (row, record) in self.records.iter().enumerate() {
            let row = row as u32 + 1;
            for (col, column) in self.columns.iter().enumerate() {
                let col = col as u16;
                if column.kind == ExportColumnKind::Source(ColumnSlot::Field(Field::Count)) {
                    if let Some(count) = record.raw.count {
                        worksheet.write_number(row, col, count as f64)?;
                    }
                } else if let Some(text) = Self::cell(record, column.kind) {
                    worksheet.write_string(row, col, text.as_str())?;
                }
            }
        }

        workbook.save_to_writer(file)?;
        Ok(())
    }

    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let mut cols: Vec<Column> = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            if column.kind == ExportColumnKind::Source(ColumnSlot::Field(Field::Count)) {
                let values: Vec<Option<i64>> =
                    self.records.iter().map(|record| record.raw.count).collect();
                cols.push(Series::new(column.name.as_str().into(), values).into());
            } else {
                let values: Vec<Option<String>> = self
                    .records
                    .iter()
                    .map(|record| Self::cell(record, column.kind))
                    .collect();
                let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
                cols.push(Series::new(column.name.as_str().into(), utf8).into());
            }
        }
        DataFrame::new(cols)
    }
}

/// Writes the filtered enriched table to `path`, choosing the format from its extension.
/// Returns the number of rows written.
pub fn export_table(table: &EnrichedTable, config: &PipelineConfig, path: &Path) -> Result<usize> {
    let format = ExportFormat::from_path(path)?;
    if table.is_empty() {
        return Err(PipelineError::EmptyDataset { operation: "export" });
    }
    let export = ExportTable::build(table, config);

    let mut file = File::create(path).map_err(|source| PipelineError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        ExportFormat::TabSeparated => {
            write_delimited(&mut file, &mut export.to_dataframe()?, b'\t')?
        }
        ExportFormat::CommaSeparated => {
            write_delimited(&mut file, &mut export.to_dataframe()?, b',')?
        }
        ExportFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Zstd(None))
                .finish(&mut export.to_dataframe()?)?;
        }
        ExportFormat::Xlsx => export.write_xlsx(&mut file)?,
    }

    info!(
        path = %path.display(),
        rows = export.records.len(),
        columns = export.columns.len(),
        ?format,
        "enriched table exported"
    );
    Ok(export.records.len())
}

fn write_delimited(file: &mut File, df: &mut DataFrame, separator: u8) -> PolarsResult<()> {
    CsvWriter::new(file)
        .include_header(true)
        .with_separator(separator)
        .finish(df)
}
