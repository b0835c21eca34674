mod comma_separated;
mod common;
mod tab_separated;

pub use comma_separated::CommaSeparatedParser;
pub use tab_separated::TabSeparatedParser;

pub(crate) use common::parse_delimited;
