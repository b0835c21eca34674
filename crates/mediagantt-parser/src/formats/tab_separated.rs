use crate::errors::ParserError;
use crate::model::RecordTable;
use crate::registry::TableParser;

use super::parse_delimited;

/// Tab-separated task sheets, the layout spreadsheet tools produce on copy/export.
pub struct TabSeparatedParser;

impl Default for TabSeparatedParser {
    fn default() -> Self {
        Self
    }
}

impl TabSeparatedParser {
    const NAME: &'static str = "TAB_SEPARATED";
    const DELIMITER: u8 = b'\t';
}

impl TableParser for TabSeparatedParser {
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
