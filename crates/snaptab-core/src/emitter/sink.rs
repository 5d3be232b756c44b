use std::collections::BTreeMap;

use crate::errors::Result;
use crate::model::Row;

/// Destination for emitted rows
///
/// Buffering, flushing, and file-handle lifecycle belong to the sink.
pub trait RowSink {
    /// Write one row of named fields to a named table
    fn write_row(&mut self, table: &str, row: &Row) -> Result<()>;
}

impl<S: RowSink + ?Sized> RowSink for &mut S {
    fn write_row(&mut self, table: &str, row: &Row) -> Result<()> {
        (**self).write_row(table, row)
    }
}

impl<S: RowSink + ?Sized> RowSink for Box<S> {
    fn write_row(&mut self, table: &str, row: &Row) -> Result<()> {
        (**self).write_row(table, row)
    }
}

/// In-memory sink keyed by table name
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    tables: BTreeMap<String, Vec<Row>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows written to `table`, in write order
    pub fn rows(&self, table: &str) -> &[Row] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

impl RowSink for MemorySink {
    fn write_row(&mut self, table: &str, row: &Row) -> Result<()> {
        self.tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(())
    }
}
