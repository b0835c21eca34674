use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{CommaSeparatedParser, TabSeparatedParser};
use crate::model::RecordTable;

pub trait TableParser {
    fn name(&self) -> &'static str;
    fn delimiter(&self) -> u8;
    fn parse(&self, content: &str) -> Result<RecordTable, ParserError>;
}

/// Loads a task table, trying tab-separated text before comma-separated text.
pub fn parse_record_table(content: &str) -> Result<RecordTable, ParserError> {
    let tab_separated = TabSeparatedParser;
    let comma_separated = CommaSeparatedParser;
    let parsers: [&dyn TableParser; 2] = [&tab_separated, &comma_separated];
    parse_with_parsers(content, &parsers)
}

/// Tries each parser in order. A format mismatch moves on to the next parser; any
/// other error means the format was recognized but the table is malformed.
pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn TableParser],
) -> Result<RecordTable, ParserError> {
    let mut attempts = Vec::new();

    for parser in parsers {
        match parser.parse(content) {
            Ok(parsed) => return Ok(parsed),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                attempts.push(ParserAttempt::new(parser.name(), parser.delimiter(), reason));
            }
            Err(err) => return Err(err),
        }
    }

    Err(ParserError::NoMatchingParser { attempts })
}
