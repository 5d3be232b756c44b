//! Streaming reader over a partitioned snapshot tree
//!
//! Layout: `<root>/<entity>/updated_date=<YYYY-MM-DD>/*.gz`, each file
//! holding one JSON document per line. Documents are yielded in partition
//! order, then file name order, then line order, one line at a time.

use crate::errors::{invalid_input, io_error, malformed_document, not_found, Result};
use crate::snapshot::progress::ProgressSink;
use chrono::NaiveDate;
use flate2::read::GzDecoder;
use serde_json::Value;
use snaptab_core::{log_op_end, log_op_error, log_op_start};
use std::collections::{BTreeSet, VecDeque};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Lines};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};
use std::time::Instant;

const PARTITION_PREFIX: &str = "updated_date=";

/// Filters and caps for one entity pass
#[derive(Default)]
pub struct IterOptions<'a> {
    /// Restrict to these partitions; `None` or an empty list means every partition
    pub updated_dates: Option<Vec<String>>,
    /// Stop before opening more than this many files
    pub max_files: Option<usize>,
    /// Stop once this many documents have been yielded
    pub max_records: Option<u64>,
    /// Notified once per yielded document
    pub progress: Option<Box<dyn ProgressSink + 'a>>,
}

impl<'a> IterOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dates<I, S>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.updated_dates = Some(dates.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = Some(max_files);
        self
    }

    pub fn with_max_records(mut self, max_records: u64) -> Self {
        self.max_records = Some(max_records);
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressSink + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }
}

/// Entry point for iterating snapshot entities
#[derive(Debug, Clone)]
pub struct SnapshotReader {
    root: PathBuf,
}

impl SnapshotReader {
    /// Open a snapshot rooted at `root`
    ///
    /// # Errors
    ///
    /// `NotFound` if the root directory does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(not_found("open_snapshot", &root, "snapshot root"));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one entity's partitions
    ///
    /// # Errors
    ///
    /// `NotFound` if the entity directory does not exist.
    pub fn entity_root(&self, entity: &str) -> Result<PathBuf> {
        let path = self.root.join(entity);
        if !path.is_dir() {
            return Err(not_found("resolve_entity", &path, "entity"));
        }
        Ok(path)
    }

    /// Partition dates available for `entity`, ascending
    pub fn partitions(&self, entity: &str) -> Result<Vec<String>> {
        let entity_root = self.entity_root(entity)?;
        Ok(list_partitions(&entity_root)?
            .iter()
            .filter_map(|p| p.file_name()?.to_str()?.strip_prefix(PARTITION_PREFIX))
            .map(str::to_string)
            .collect())
    }

    /// Lazily stream documents of `entity`
    ///
    /// # Errors
    ///
    /// - `NotFound` if the entity directory is absent
    /// - `InvalidInput` if an explicit date is not `YYYY-MM-DD`
    /// - `Io` if the partition listing fails
    pub fn iter_entity<'a>(
        &self,
        entity: &str,
        options: IterOptions<'a>,
    ) -> Result<EntityDocuments<'a>> {
        let entity_root = self.entity_root(entity)?;

        let partitions: Vec<PathBuf> = match &options.updated_dates {
            Some(dates) if !dates.is_empty() => {
                let mut unique = BTreeSet::new();
                for date in dates {
                    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                        invalid_input("iter_entity", format!("bad partition date '{}': {}", date, e))
                    })?;
                    unique.insert(date.as_str());
                }
                unique
                    .into_iter()
                    .map(|date| entity_root.join(format!("{}{}", PARTITION_PREFIX, date)))
                    .collect()
            }
            _ => list_partitions(&entity_root)?,
        };

        log_op_start!(
            "iter_entity",
            entity = entity,
            partitions = partitions.len() as u64
        );

        Ok(EntityDocuments {
            entity: entity.to_string(),
            partitions: partitions.into(),
            files: VecDeque::new(),
            current: None,
            max_files: options.max_files,
            max_records: options.max_records,
            progress: options.progress,
            files_opened: 0,
            records_yielded: 0,
            finished: false,
            started: Instant::now(),
        })
    }
}

fn list_partitions(entity_root: &Path) -> Result<Vec<PathBuf>> {
    let mut partitions = Vec::new();
    for entry in fs::read_dir(entity_root).map_err(|e| io_error("list_partitions", entity_root, e))? {
        let path = entry
            .map_err(|e| io_error("list_partitions", entity_root, e))?
            .path();
        let is_partition = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(PARTITION_PREFIX));
        if is_partition && path.is_dir() {
            partitions.push(path);
        }
    }
    partitions.sort();
    Ok(partitions)
}

fn list_part_files(partition: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(partition).map_err(|e| io_error("list_part_files", partition, e))? {
        let path = entry
            .map_err(|e| io_error("list_part_files", partition, e))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "gz") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

struct OpenFile {
    path: PathBuf,
    lines: Lines<BufReader<GzDecoder<File>>>,
    line_no: u64,
}

/// Pull-based stream of one entity's documents
///
/// Finite and non-restartable. After an error is yielded the stream is
/// exhausted.
pub struct EntityDocuments<'a> {
    entity: String,
    partitions: VecDeque<PathBuf>,
    files: VecDeque<PathBuf>,
    current: Option<OpenFile>,
    max_files: Option<usize>,
    max_records: Option<u64>,
    progress: Option<Box<dyn ProgressSink + 'a>>,
    files_opened: usize,
    records_yielded: u64,
    finished: bool,
    started: Instant,
}

impl EntityDocuments<'_> {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn files_opened(&self) -> usize {
        self.files_opened
    }

    pub fn records_yielded(&self) -> u64 {
        self.records_yielded
    }

    fn record_cap_reached(&self) -> bool {
        self.max_records.is_some_and(|max| self.records_yielded >= max)
    }

    fn file_cap_reached(&self) -> bool {
        self.max_files.is_some_and(|max| self.files_opened >= max)
    }

    fn next_file(&mut self) -> Result<Option<PathBuf>> {
        loop {
            if let Some(path) = self.files.pop_front() {
                return Ok(Some(path));
            }
            let Some(partition) = self.partitions.pop_front() else {
                return Ok(None);
            };
            // Explicitly requested partitions may not exist.
            if partition.is_dir() {
                self.files = list_part_files(&partition)?.into();
            }
        }
    }

    fn open(&mut self, path: PathBuf) -> Result<()> {
        let file = File::open(&path).map_err(|e| io_error("open_part_file", &path, e))?;
        self.files_opened += 1;
        tracing::debug!(entity = self.entity.as_str(), path = %path.display(), "opened partition file");
        self.current = Some(OpenFile {
            path,
            lines: BufReader::new(GzDecoder::new(file)).lines(),
            line_no: 0,
        });
        Ok(())
    }

    fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.current = None;
        log_op_end!(
            "iter_entity",
            duration_ms = self.elapsed_ms(),
            entity = self.entity.as_str(),
            files = self.files_opened as u64,
            records = self.records_yielded
        );
    }

    fn fail(&mut self, err: &snaptab_core::ExError) {
        self.finished = true;
        self.current = None;
        log_op_error!(
            "iter_entity",
            err.clone(),
            duration_ms = self.elapsed_ms(),
            entity = self.entity.as_str()
        );
    }
}

impl Iterator for EntityDocuments<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.finished {
                return None;
            }
            if self.record_cap_reached() {
                self.finish();
                return None;
            }

            if let Some(file) = self.current.as_mut() {
                match file.lines.next() {
                    Some(Ok(line)) => {
                        file.line_no += 1;
                        if line.trim().is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<Value>(&line) {
                            Ok(document) => {
                                self.records_yielded += 1;
                                if let Some(progress) = self.progress.as_mut() {
                                    progress.record(1);
                                }
                                return Some(Ok(document));
                            }
                            Err(e) => {
                                let err = malformed_document(&file.path, file.line_no, &e);
                                self.fail(&err);
                                return Some(Err(err));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        let err = io_error("read_part_file", &file.path, e);
                        self.fail(&err);
                        return Some(Err(err));
                    }
                    None => {
                        self.current = None;
                        continue;
                    }
                }
            }

            if self.file_cap_reached() {
                self.finish();
                return None;
            }
            match self.next_file() {
                Ok(Some(path)) => {
                    if let Err(err) = self.open(path) {
                        self.fail(&err);
                        return Some(Err(err));
                    }
                }
                Ok(None) => {
                    self.finish();
                    return None;
                }
                Err(err) => {
                    self.fail(&err);
                    return Some(Err(err));
                }
            }
        }
    }
}

impl FusedIterator for EntityDocuments<'_> {}
