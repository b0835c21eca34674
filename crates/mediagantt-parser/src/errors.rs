use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ParserAttempt {
    pub parser: &'static str,
    /// Cell delimiter the parser split rows on.
    pub delimiter: char,
    pub message: String,
}

impl ParserAttempt {
    pub fn new(parser: &'static str, delimiter: u8, message: impl Into<String>) -> Self {
        Self {
            parser,
            delimiter: char::from(delimiter),
            message: message.into(),
        }
    }
}

impl fmt::Display for ParserAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}): {}", self.parser, self.delimiter, self.message)
    }
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("{parser} format mismatch: {reason}")]
    FormatMismatch {
        parser: &'static str,
        reason: String,
    },

    #[error("{parser} header column {column_index} invalid: {message}")]
    InvalidHeader {
        parser: &'static str,
        column_index: usize,
        message: String,
    },

    #[error("{parser} CSV error: {source}")]
    Csv {
        parser: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("{parser} data row on line {line} invalid: {message}")]
    DataRow {
        parser: &'static str,
        line: u64,
        message: String,
    },

    #[error("no parser recognized this table; attempts: {attempts:?}")]
    NoMatchingParser { attempts: Vec<ParserAttempt> },
}
