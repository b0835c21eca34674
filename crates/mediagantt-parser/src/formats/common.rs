use std::collections::HashSet;

use csv::{ReaderBuilder, StringRecord};

use crate::errors::ParserError;
use crate::model::{ColumnSlot, Field, RawRecord, RecordTable, TableColumn};

const UTF8_BOM: char = '\u{feff}';

pub(crate) fn parse_delimited(
    parser: &'static str,
    delimiter: u8,
    content: &str,
) -> Result<RecordTable, ParserError> {
    let content = content.strip_prefix(UTF8_BOM).unwrap_or(content);

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows = reader.records();
    let header = match rows.next() {
        Some(row) => row.map_err(|source| ParserError::Csv { parser, source })?,
        None => {
            return Err(ParserError::FormatMismatch {
                parser,
                reason: "table has no header row".to_string(),
            })
        }
    };
    let columns = classify_header(parser, &header)?;

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|source| ParserError::Csv { parser, source })?;
        records.push(build_record(parser, &columns, &row)?);
    }

    Ok(RecordTable {
        format: parser,
        columns,
        records,
    })
}

fn classify_header(
    parser: &'static str,
    header: &StringRecord,
) -> Result<Vec<TableColumn>, ParserError> {
    let mut columns = Vec::with_capacity(header.len());
    let mut seen = HashSet::new();
    let mut extras = 0;

    for (column_index, name) in header.iter().enumerate() {
        let name = name.trim();
        match Field::from_column_name(name) {
            Some(field) => {
                if !seen.insert(field) {
                    return Err(ParserError::InvalidHeader {
                        parser,
                        column_index,
                        message: format!("duplicate column '{field}'"),
                    });
                }
                columns.push(TableColumn::field(field));
            }
            None => {
                columns.push(TableColumn::extra(name, extras));
                extras += 1;
            }
        }
    }

    if seen.is_empty() {
        let preview: Vec<&str> = header.iter().take(3).collect();
        return Err(ParserError::FormatMismatch {
            parser,
            reason: format!(
                "no recognized column among {} header fields (starting with {:?})",
                header.len(),
                preview
            ),
        });
    }

    Ok(columns)
}

fn build_record(
    parser: &'static str,
    columns: &[TableColumn],
    row: &StringRecord,
) -> Result<RawRecord, ParserError> {
    let line = row.position().map(|pos| pos.line()).unwrap_or_default();

    if row.len() > columns.len() {
        return Err(ParserError::DataRow {
            parser,
            line,
            message: format!(
                "expected at most {} cells, found {}",
                columns.len(),
                row.len()
            ),
        });
    }

    let extra_len = columns
        .iter()
        .filter(|column| matches!(column.slot, ColumnSlot::Extra(_)))
        .count();
    let mut record = RawRecord {
        extra: vec![None; extra_len],
        ..RawRecord::default()
    };

    for (column, cell) in columns.iter().zip(row.iter()) {
        let value = clean_optional(cell);
        match column.slot {
            ColumnSlot::Field(Field::Timeline) => record.timeline = value,
            ColumnSlot::Field(Field::Category) => record.category = value,
            ColumnSlot::Field(Field::Count) => {
                record.count = parse_optional_count(value.as_deref()).map_err(|message| {
                    ParserError::DataRow {
                        parser,
                        line,
                        message,
                    }
                })?;
            }
            ColumnSlot::Field(Field::CodeMemo) => record.code_memo = value,
            ColumnSlot::Field(Field::CodeName) => record.code_name = value,
            ColumnSlot::Extra(position) => record.extra[position] = value,
        }
    }

    Ok(record)
}

fn clean_optional(cell: &str) -> Option<String> {
    if cell.trim().is_empty() {
        None
    } else {
        Some(cell.to_string())
    }
}

fn parse_optional_count(value: Option<&str>) -> Result<Option<i64>, String> {
    let Some(raw) = value else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if let Ok(count) = trimmed.parse::<i64>() {
        return Ok(Some(count));
    }
    // Whole-number floats such as `5.0` are accepted.
    match trimmed.parse::<f64>() {
        Ok(float) if float.is_finite() && float.fract() == 0.0 => Ok(Some(float as i64)),
        _ => Err(format!("Count '{trimmed}' is not an integer")),
    }
}
