//! Reference catalog build and check commands

use super::pass::{visit_sources, Target};
use super::CapArgs;
use clap::{Args, Subcommand};
use snaptab_store::pipeline::parse_pipeline_file;
use snaptab_store::{IdCatalog, SnapshotReader};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Debug, Subcommand)]
pub enum CatalogCommand {
    /// Record every source value and write dense reference files
    Build(BuildArgs),
    /// Load existing reference files and report their sizes
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Pipeline configuration (YAML)
    #[arg(long)]
    pub config: PathBuf,

    /// Snapshot root directory
    #[arg(long)]
    pub root: PathBuf,

    /// Output directory for reference files
    #[arg(long)]
    pub out: PathBuf,

    #[command(flatten)]
    pub caps: CapArgs,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    #[arg(long)]
    pub config: PathBuf,

    /// Directory holding reference files
    #[arg(long)]
    pub dir: PathBuf,
}

pub fn execute(args: CatalogArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        CatalogCommand::Build(build_args) => execute_build(build_args),
        CatalogCommand::Check(check_args) => execute_check(check_args),
    }
}

fn execute_build(args: BuildArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_pipeline_file(&args.config)?;
    let reader = SnapshotReader::open(&args.root)?;
    let mut catalog = IdCatalog::new(config.enumeration_configs(), config.namespace_configs());

    let documents = visit_sources(&reader, &config, &args.caps, |target, value| {
        match target {
            Target::Enumeration(table) => catalog.record_enum(table, value)?,
            Target::Namespace(namespace) => catalog.record_namespace(namespace, value)?,
        }
        Ok(())
    })?;

    catalog.finalize(&args.out)?;

    println!("documents: {}", documents);
    print_sizes(&catalog);
    Ok(())
}

fn execute_check(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = parse_pipeline_file(&args.config)?;
    let mut catalog = IdCatalog::new(config.enumeration_configs(), config.namespace_configs());

    if !catalog.load_existing(&args.dir)? {
        return Err(format!("reference catalog not available in {}", args.dir.display()).into());
    }

    print_sizes(&catalog);
    Ok(())
}

fn print_sizes(catalog: &IdCatalog) {
    for (name, assignment) in catalog.assignments() {
        println!("{}\t{}", name, assignment.len());
    }
}
