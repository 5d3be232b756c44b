//! Two-column reference table codec
//!
//! Files carry a header naming the id column and the value column. Reads
//! accept tab or comma delimiters (tab wins if one appears in the first
//! 2 KiB) and tolerate a UTF-8 byte-order mark. Writes always use tabs.

use crate::errors::{from_csv, io_error, Result};
use crate::reference::atomic::atomic_write;
use snaptab_core::SurrogateId;
use std::fs;
use std::path::Path;

const SNIFF_BYTES: usize = 2048;
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Rows read from a reference file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceRows {
    /// `(id, value)` pairs in file order
    pub pairs: Vec<(SurrogateId, String)>,
    /// Rows dropped because a cell was empty, non-numeric, or zero
    pub skipped: usize,
}

/// Pick the delimiter from a leading sample of the file
pub fn detect_delimiter(sample: &[u8]) -> u8 {
    let window = &sample[..sample.len().min(SNIFF_BYTES)];
    if window.contains(&b'\t') {
        b'\t'
    } else {
        b','
    }
}

/// Read `(id, value)` pairs from `path`
///
/// Malformed rows are skipped and counted, never raised. A header missing
/// either column yields no pairs.
///
/// # Errors
///
/// Only filesystem errors (the file cannot be read).
pub fn read_reference_rows(path: &Path, id_column: &str, value_column: &str) -> Result<ReferenceRows> {
    let raw = fs::read(path).map_err(|e| io_error("read_reference", path, e))?;
    let content = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .flexible(true)
        .from_reader(content);

    let mut rows = ReferenceRows::default();
    let headers = match reader.byte_headers() {
        Ok(headers) => headers.clone(),
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "unreadable reference header");
            return Ok(rows);
        }
    };
    let position = |name: &str| headers.iter().position(|h| h == name.as_bytes());
    let (Some(id_index), Some(value_index)) = (position(id_column), position(value_column)) else {
        tracing::warn!(
            path = %path.display(),
            id_column,
            value_column,
            "reference header lacks expected columns"
        );
        return Ok(rows);
    };

    for record in reader.byte_records() {
        let parsed = record.ok().and_then(|record| {
            let id = std::str::from_utf8(record.get(id_index)?).ok()?;
            let value = std::str::from_utf8(record.get(value_index)?).ok()?;
            let id: SurrogateId = id.trim().parse().ok()?;
            (id != 0 && !value.is_empty()).then(|| (id, value.to_string()))
        });
        match parsed {
            Some(pair) => rows.pairs.push(pair),
            None => rows.skipped += 1,
        }
    }

    if rows.skipped > 0 {
        tracing::warn!(
            path = %path.display(),
            skipped = rows.skipped,
            "skipped malformed reference rows"
        );
    }
    Ok(rows)
}

/// Write a tab-delimited reference file atomically
///
/// # Errors
///
/// Propagates serialization and filesystem failures.
pub fn write_reference_rows<'a, I>(
    path: &Path,
    id_column: &str,
    value_column: &str,
    pairs: I,
) -> Result<()>
where
    I: IntoIterator<Item = (SurrogateId, &'a str)>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_writer(Vec::new());

    writer
        .write_record([id_column, value_column])
        .map_err(|e| from_csv("write_reference", path, e))?;
    for (id, value) in pairs {
        writer
            .write_record([id.to_string().as_str(), value])
            .map_err(|e| from_csv("write_reference", path, e))?;
    }

    let content = writer
        .into_inner()
        .map_err(|e| io_error("write_reference", path, e.into_error()))?;
    atomic_write(path, &content)
}
