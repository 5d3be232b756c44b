//! Pipeline configuration
//!
//! Provides:
//! - The YAML pipeline format (enumerations, namespaces, tables, sources)
//! - Parsing with validation
//! - JSON pointer extraction of source values from snapshot documents

mod format;
mod parser;
mod sources;

pub use format::{
    EnumerationSection, NamespaceSection, PipelineConfig, SourceSpec, TableSection,
};
pub use parser::{parse_pipeline_file, parse_pipeline_str};
pub use sources::extract_values;
