use std::collections::{HashMap, HashSet};

use crate::emitter::RowSink;
use crate::errors::{Result, SnapTabError};
use crate::model::{KeyValue, Row, TableSpec};

type DedupKey = Vec<KeyValue>;

#[derive(Debug, Default, Clone, Copy)]
struct TableCounters {
    written: u64,
    skipped: u64,
}

/// Emits rows to a sink while suppressing duplicate dimension rows
///
/// The seen-key sets live only as long as the emitter: dedup is a
/// single-session guarantee, never persisted.
pub struct TableEmitter<S: RowSink> {
    sink: S,
    dedup_keys: HashMap<String, Vec<String>>,
    seen: HashMap<String, HashSet<DedupKey>>,
    counters: HashMap<String, TableCounters>,
}

impl<S: RowSink> TableEmitter<S> {
    /// Build an emitter over `sink` for the given table specs
    ///
    /// Tables not listed here may still be emitted to; they are append-only.
    ///
    /// # Errors
    ///
    /// Returns `InvalidTableSpec` if a spec fails validation or a table name
    /// is declared twice.
    pub fn new(sink: S, specs: impl IntoIterator<Item = TableSpec>) -> Result<Self> {
        let mut dedup_keys = HashMap::new();
        for spec in specs {
            spec.validate()?;
            if dedup_keys.contains_key(&spec.name) {
                return Err(SnapTabError::InvalidTableSpec {
                    table: spec.name,
                    reason: "table declared twice".to_string(),
                });
            }
            dedup_keys.insert(spec.name, spec.dedup_key);
        }

        Ok(Self {
            sink,
            dedup_keys,
            seen: HashMap::new(),
            counters: HashMap::new(),
        })
    }

    /// Write `row` to `table` unless its dedup key was already emitted
    ///
    /// Returns `true` when the row reached the sink and `false` when it was
    /// suppressed as a duplicate.
    ///
    /// # Errors
    ///
    /// Returns `MissingKeyValue` if a dedup key field is absent or null in
    /// the row; nothing is written and the key is not recorded. Sink errors
    /// propagate unchanged.
    pub fn emit(&mut self, table: &str, row: &Row) -> Result<bool> {
        let key_fields = self.dedup_keys.get(table).filter(|k| !k.is_empty());

        let Some(key_fields) = key_fields else {
            self.sink.write_row(table, row)?;
            self.counters.entry(table.to_string()).or_default().written += 1;
            return Ok(true);
        };

        let key = build_key(table, row, key_fields)?;
        let seen = self.seen.entry(table.to_string()).or_default();
        if seen.contains(&key) {
            self.counters.entry(table.to_string()).or_default().skipped += 1;
            return Ok(false);
        }

        // The key is recorded only once the sink accepted the row, so a
        // failed write can be retried by the caller.
        self.sink.write_row(table, row)?;
        seen.insert(key);
        self.counters.entry(table.to_string()).or_default().written += 1;
        Ok(true)
    }

    /// Emit each row in order; returns how many were written
    ///
    /// # Errors
    ///
    /// Stops at the first failing row and returns its error. Rows before it
    /// have already been written.
    pub fn emit_many<'a, I>(&mut self, table: &str, rows: I) -> Result<usize>
    where
        I: IntoIterator<Item = &'a Row>,
    {
        let mut written = 0;
        for row in rows {
            if self.emit(table, row)? {
                written += 1;
            }
        }
        Ok(written)
    }

    /// Rows written to `table` this session
    pub fn written(&self, table: &str) -> u64 {
        self.counters.get(table).map_or(0, |c| c.written)
    }

    /// Rows suppressed as duplicates for `table` this session
    pub fn skipped(&self, table: &str) -> u64 {
        self.counters.get(table).map_or(0, |c| c.skipped)
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

fn build_key(table: &str, row: &Row, fields: &[String]) -> Result<DedupKey> {
    fields
        .iter()
        .map(|field| {
            row.get(field)
                .and_then(|value| value.key_value())
                .ok_or_else(|| SnapTabError::MissingKeyValue {
                    table: table.to_string(),
                    field: field.clone(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::MemorySink;

    fn emitter() -> TableEmitter<MemorySink> {
        TableEmitter::new(
            MemorySink::new(),
            [TableSpec::new("country").with_dedup_key(["country_id"])],
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_key_suppressed() {
        let mut emitter = emitter();
        let row = Row::new().with("country_id", 1u64).with("code", "fr");

        assert!(emitter.emit("country", &row).unwrap());
        assert!(!emitter.emit("country", &row).unwrap());

        assert_eq!(emitter.sink().rows("country").len(), 1);
        assert_eq!(emitter.written("country"), 1);
        assert_eq!(emitter.skipped("country"), 1);
    }

    #[test]
    fn test_null_key_field_is_an_error() {
        let mut emitter = emitter();
        let row = Row::new().with("country_id", None::<u64>).with("code", "fr");

        let err = emitter.emit("country", &row).unwrap_err();
        assert!(matches!(err, SnapTabError::MissingKeyValue { ref field, .. } if field == "country_id"));
        assert!(emitter.sink().rows("country").is_empty());
    }

    #[test]
    fn test_table_declared_twice_rejected() {
        let result = TableEmitter::new(
            MemorySink::new(),
            [TableSpec::new("country"), TableSpec::new("country")],
        );
        assert!(result.is_err());
    }
}
