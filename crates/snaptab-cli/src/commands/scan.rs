//! Scan command

use super::CapArgs;
use clap::Args;
use snaptab_store::snapshot::DEFAULT_INTERVAL;
use snaptab_store::{ProgressReporter, SnapshotReader};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Snapshot root directory
    pub root: PathBuf,

    /// Entity directory under the root, e.g. works
    #[arg(long)]
    pub entity: String,

    /// Restrict to these updated_date partitions (YYYY-MM-DD)
    #[arg(long = "date")]
    pub dates: Vec<String>,

    #[command(flatten)]
    pub caps: CapArgs,

    #[arg(long, default_value_t = DEFAULT_INTERVAL)]
    pub progress_interval: u64,
}

pub fn execute(args: ScanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let reader = SnapshotReader::open(&args.root)?;

    let reporter = ProgressReporter::with_interval(&args.entity, args.progress_interval);
    let observer = reporter.clone();

    let mut options = args.caps.options().with_progress(reporter);
    if !args.dates.is_empty() {
        options = options.with_dates(args.dates.iter().cloned());
    }

    let mut documents = reader.iter_entity(&args.entity, options)?;
    for document in documents.by_ref() {
        document?;
    }

    println!("{}", observer.summary());
    println!("files: {}", documents.files_opened());
    Ok(())
}
