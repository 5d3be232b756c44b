pub mod catalog;
pub mod enumerate;
pub mod pass;
pub mod scan;

use clap::Args;
use snaptab_store::IterOptions;

/// Caps applied to every entity pass
#[derive(Debug, Clone, Args)]
pub struct CapArgs {
    /// Stop before opening more than N files per entity
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Stop after N documents per entity
    #[arg(long)]
    pub max_records: Option<u64>,
}

impl CapArgs {
    pub fn options<'a>(&self) -> IterOptions<'a> {
        let mut options = IterOptions::new();
        options.max_files = self.max_files;
        options.max_records = self.max_records;
        options
    }
}
