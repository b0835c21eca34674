use crate::errors::ParserError;
use crate::model::RecordTable;
use crate::registry::TableParser;

use super::parse_delimited;

pub struct CommaSeparatedParser;

impl Default for CommaSeparatedParser {
    fn default() -> Self {
        Self
    }
}

impl CommaSeparatedParser {
    const NAME: &'static str = "COMMA_SEPARATED";
    const DELIMITER: u8 = b',';
}

impl TableParser for CommaSeparatedParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn delimiter(&self) -> u8 {
        Self::DELIMITER
    }

    fn parse(&self, content: &str) -> Result<RecordTable, ParserError> {
        parse_delimited(Self::NAME, Self::DELIMITER, content)
    }
}
