//! Pipeline parser with validation
//!
//! Parses YAML and checks name uniqueness, bit widths, column names, and
//! source pointers before anything touches the snapshot.

use crate::errors::{config_invalid, io_error, Result};
use crate::pipeline::format::{PipelineConfig, SourceSpec};
use snaptab_core::ids::DEFAULT_BITS;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Parse a pipeline file from a path
///
/// # Errors
///
/// `Io` if the file cannot be read, `InvalidConfig` otherwise.
pub fn parse_pipeline_file(path: &Path) -> Result<PipelineConfig> {
    let content = fs::read_to_string(path).map_err(|e| io_error("pipeline_config", path, e))?;
    parse_pipeline_str(&content).map_err(|e| e.with_path(path.display().to_string()))
}

/// Parse a pipeline from a string
///
/// # Errors
///
/// `InvalidConfig` for YAML errors and failed validation.
pub fn parse_pipeline_str(content: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = serde_yaml::from_str(content)
        .map_err(|e| config_invalid(format!("YAML parse error: {}", e)))?;

    validate_pipeline(&config)?;

    Ok(config)
}

fn validate_pipeline(config: &PipelineConfig) -> Result<()> {
    // Enumeration tables and declared tables share the output namespace
    let mut tables = HashSet::new();
    for e in &config.enumerations {
        require_name("enumeration table", &e.table)?;
        if !tables.insert(e.table.as_str()) {
            return Err(config_invalid(format!("Duplicate table name: {}", e.table)));
        }
        if !(1..=DEFAULT_BITS).contains(&e.bits) {
            return Err(config_invalid(format!(
                "Enumeration {}: bits must be in 1..={}, got {}",
                e.table, DEFAULT_BITS, e.bits
            )));
        }
        require_columns(&e.table, &e.id_column, &e.value_column)?;
        validate_sources(&e.table, &e.sources)?;
    }
    for t in &config.tables {
        require_name("table", &t.name)?;
        if !tables.insert(t.name.as_str()) {
            return Err(config_invalid(format!("Duplicate table name: {}", t.name)));
        }
        t.to_spec()
            .validate()
            .map_err(|e| config_invalid(e.to_string()))?;
    }

    let mut namespaces = HashSet::new();
    let mut filenames: HashSet<String> = config
        .enumerations
        .iter()
        .map(|e| e.to_config().reference_filename())
        .collect();
    for n in &config.namespaces {
        require_name("namespace", &n.namespace)?;
        if !namespaces.insert(n.namespace.as_str()) {
            return Err(config_invalid(format!(
                "Duplicate namespace: {}",
                n.namespace
            )));
        }
        require_columns(&n.namespace, &n.id_column, &n.value_column)?;
        if !filenames.insert(n.filename()) {
            return Err(config_invalid(format!(
                "Namespace {}: reference file {} is already in use",
                n.namespace,
                n.filename()
            )));
        }
        validate_sources(&n.namespace, &n.sources)?;
    }

    Ok(())
}

fn require_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(config_invalid(format!("{} name must be non-empty", what)));
    }
    Ok(())
}

fn require_columns(owner: &str, id_column: &str, value_column: &str) -> Result<()> {
    if id_column.trim().is_empty() || value_column.trim().is_empty() {
        return Err(config_invalid(format!(
            "{}: id_column and value_column must be non-empty",
            owner
        )));
    }
    if id_column == value_column {
        return Err(config_invalid(format!(
            "{}: id_column and value_column must differ",
            owner
        )));
    }
    Ok(())
}

fn validate_sources(owner: &str, sources: &[SourceSpec]) -> Result<()> {
    for source in sources {
        if source.entity.trim().is_empty() {
            return Err(config_invalid(format!("{}: source entity is empty", owner)));
        }
        if !source.pointer.starts_with('/') {
            return Err(config_invalid(format!(
                "{}: source pointer '{}' must start with '/'",
                owner, source.pointer
            )));
        }
    }
    Ok(())
}
