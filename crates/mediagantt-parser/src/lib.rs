pub mod errors;
pub mod formats;
pub mod model;
mod registry;

pub use errors::{ParserAttempt, ParserError};
pub use model::{ColumnSlot, Field, RawRecord, RecordTable, TableColumn};
pub use registry::{parse_record_table, parse_with_parsers, TableParser};
