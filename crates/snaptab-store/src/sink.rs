//! Tab-delimited table output
//!
//! One `<table>.tsv` per table under an output directory. The header comes
//! from the table's declared columns, or from the first row's field names
//! when none were declared.

use crate::errors::{from_csv, io_error, Result};
use snaptab_core::errors::SnapTabError;
use snaptab_core::{Row, RowSink, TableSpec};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

struct TableFile {
    path: PathBuf,
    columns: Vec<String>,
    writer: csv::Writer<BufWriter<File>>,
    rows: u64,
}

/// `RowSink` writing one TSV file per table
pub struct TsvTableSink {
    out_dir: PathBuf,
    open: BTreeMap<String, TableFile>,
}

impl TsvTableSink {
    /// Create the output directory and a sink over it
    ///
    /// Every spec with declared columns gets its file up front, so a
    /// declared table that never receives a row still exists with its
    /// header.
    ///
    /// # Errors
    ///
    /// Fails if the directory or a declared table file cannot be created.
    pub fn create(out_dir: impl Into<PathBuf>, specs: &[TableSpec]) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir).map_err(|e| io_error("tsv_sink", &out_dir, e))?;
        let mut open = BTreeMap::new();
        for spec in specs.iter().filter(|spec| !spec.columns.is_empty()) {
            if let Entry::Vacant(entry) = open.entry(spec.name.clone()) {
                entry.insert(open_file(&out_dir, &spec.name, spec.columns.clone())?);
            }
        }
        Ok(Self { out_dir, open })
    }

    /// Rows written per table so far
    pub fn row_counts(&self) -> BTreeMap<&str, u64> {
        self.open
            .iter()
            .map(|(name, file)| (name.as_str(), file.rows))
            .collect()
    }

    /// Flush every open table file
    ///
    /// # Errors
    ///
    /// The first flush failure.
    pub fn flush(&mut self) -> Result<()> {
        for file in self.open.values_mut() {
            file.writer
                .flush()
                .map_err(|e| io_error("tsv_flush", &file.path, e))?;
        }
        Ok(())
    }

    /// Undeclared tables take their columns from the first row
    fn open_table(&mut self, table: &str, row: &Row) -> Result<&mut TableFile> {
        match self.open.entry(table.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let columns = row.field_names().map(str::to_string).collect();
                Ok(entry.insert(open_file(&self.out_dir, table, columns)?))
            }
        }
    }
}

fn open_file(out_dir: &Path, table: &str, columns: Vec<String>) -> Result<TableFile> {
    let path = out_dir.join(format!("{}.tsv", table));
    let file = File::create(&path).map_err(|e| io_error("tsv_open", &path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(BufWriter::new(file));
    writer
        .write_record(&columns)
        .map_err(|e| from_csv("tsv_open", &path, e))?;
    tracing::debug!(table, path = %path.display(), "opened table file");

    Ok(TableFile {
        path,
        columns,
        writer,
        rows: 0,
    })
}

impl RowSink for TsvTableSink {
    fn write_row(&mut self, table: &str, row: &Row) -> snaptab_core::Result<()> {
        let sink_error = |message: String| SnapTabError::Sink {
            table: table.to_string(),
            message,
        };

        let file = self
            .open_table(table, row)
            .map_err(|e| sink_error(e.to_string()))?;

        if let Some(extra) = row
            .field_names()
            .find(|name| !file.columns.iter().any(|c| c == name))
        {
            return Err(sink_error(format!("field {} is not a column", extra)));
        }

        let record: Vec<String> = file
            .columns
            .iter()
            .map(|column| row.get(column).map(ToString::to_string).unwrap_or_default())
            .collect();
        file.writer
            .write_record(&record)
            .map_err(|e| sink_error(e.to_string()))?;
        file.rows += 1;
        Ok(())
    }
}
