pub mod categorizer;
pub mod config;
pub mod diagram;
pub mod error;
pub mod export;
pub mod importance;
pub mod ingestion;
pub mod links;
pub mod pipeline;
pub mod timeline;

pub use config::{PipelineConfig, RawConfig};
pub use error::{PipelineError, Result};
pub use pipeline::{enrich, EnrichedRecord, EnrichedTable};
