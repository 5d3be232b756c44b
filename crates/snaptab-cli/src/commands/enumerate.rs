//! Enumerate command
//!
//! Second pass: every source value resolves through the registry, and each
//! newly seen member lands in its enumeration table. Tables declared under
//! `tables:` are created alongside with their headers.

use super::pass::{visit_sources, Target};
use super::CapArgs;
use clap::Args;
use snaptab_core::TableEmitter;
use snaptab_store::pipeline::parse_pipeline_file;
use snaptab_store::{EnumerationRegistry, SnapshotReader, TsvTableSink};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct EnumerateArgs {
    /// Pipeline configuration (YAML)
    #[arg(long)]
    pub config: PathBuf,

    /// Snapshot root directory
    #[arg(long)]
    pub root: PathBuf,

    /// Output directory for table files
    #[arg(long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub caps: CapArgs,
}

pub fn execute(args: EnumerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_pipeline_file(&args.config)?;
    let reader = SnapshotReader::open(&args.root)?;

    let specs = config.table_specs();
    let sink = TsvTableSink::create(&args.out, &specs)?;
    let mut emitter = TableEmitter::new(sink, specs)?;

    let reference_dir = config
        .reference_dir
        .as_ref()
        .map(|dir| relative_to_config(&args.config, dir));
    let mut registry = EnumerationRegistry::new(reference_dir);
    for enum_config in config.enumeration_configs() {
        let loaded = registry.register(enum_config, &mut emitter)?;
        tracing::debug!(loaded, "registered enumeration");
    }

    let documents = visit_sources(&reader, &config, &args.caps, |target, value| {
        if let Target::Enumeration(table) = target {
            registry.id_for(&mut emitter, table, Some(value))?;
        }
        Ok(())
    })?;

    let mut sink = emitter.into_sink();
    sink.flush()?;
    for (table, rows) in sink.row_counts() {
        tracing::info!(table, rows, "table written");
    }

    println!("documents: {}", documents);
    let mut tables: Vec<&str> = registry.tables().collect();
    tables.sort_unstable();
    for table in tables {
        println!("{}\t{}", table, registry.len(table));
    }
    Ok(())
}

/// Relative reference directories are resolved against the config file
fn relative_to_config(config_path: &Path, dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    config_path
        .parent()
        .map_or_else(|| dir.to_path_buf(), |parent| parent.join(dir))
}
