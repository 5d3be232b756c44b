use crate::enumeration::{EnumerationConfig, IdStrategy};
use crate::errors::{invalid_input, not_found, Result};
use crate::reference::read_reference_rows;
use snaptab_core::errors::SnapTabError;
use snaptab_core::ids::{Assignment, CatalogAssigner, HashedAssigner, IdentifierAssigner};
use snaptab_core::{log_op_end, log_op_start, Row, RowSink, SurrogateId, TableEmitter};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// Enumeration lookups for one pipeline run
///
/// Owns the per-table caches and the minting state. The emitter is passed
/// in by reference so every new member goes through the shared write path.
#[derive(Debug, Default)]
pub struct EnumerationRegistry {
    reference_dir: Option<PathBuf>,
    configs: HashMap<String, EnumerationConfig>,
    caches: HashMap<String, Assignment>,
    hashed: HashedAssigner,
    catalog: CatalogAssigner,
}

impl EnumerationRegistry {
    /// Registry that loads reference files from `reference_dir`, if given
    pub fn new(reference_dir: Option<PathBuf>) -> Self {
        Self {
            reference_dir,
            ..Self::default()
        }
    }

    /// Declare an enumeration and preload its reference file
    ///
    /// When the reference file exists every loaded pair is emitted, so the
    /// enumeration table always contains every value ever known. Returns
    /// the number of pairs loaded.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the table is already registered
    /// - `NotFound` for a catalog-strategy table without a reference file
    /// - filesystem and emission errors propagate
    pub fn register<S: RowSink>(
        &mut self,
        config: EnumerationConfig,
        emitter: &mut TableEmitter<S>,
    ) -> Result<usize> {
        if self.configs.contains_key(&config.table) {
            return Err(invalid_input(
                "register_enumeration",
                format!("enumeration {} registered twice", config.table),
            ));
        }
        let started = Instant::now();
        log_op_start!("register_enumeration", table = config.table.as_str());

        let reference_path = self
            .reference_dir
            .as_ref()
            .map(|dir| dir.join(config.reference_filename()))
            .filter(|path| path.is_file());

        let mut cache = Assignment::new();
        if let Some(path) = &reference_path {
            let rows = read_reference_rows(path, &config.id_column, &config.value_column)?;
            for (id, raw_value) in rows.pairs {
                let value = config.normalize(&raw_value);
                if value.is_empty() {
                    continue;
                }
                if let Err(err) = cache.bind(&config.table, &value, id) {
                    tracing::warn!(
                        table = config.table.as_str(),
                        path = %path.display(),
                        error = %err,
                        "skipped conflicting reference row"
                    );
                    continue;
                }
                if config.strategy == IdStrategy::Hashed {
                    self.hashed.reserve(&config.table, &value, id)?;
                }
                emitter.emit(&config.table, &enumeration_row(&config, id, &value))?;
            }
        } else if config.strategy == IdStrategy::Catalog {
            let expected = self
                .reference_dir
                .clone()
                .unwrap_or_default()
                .join(config.reference_filename());
            return Err(not_found(
                "register_enumeration",
                &expected,
                "catalog reference file",
            ));
        }

        if config.strategy == IdStrategy::Catalog {
            self.catalog.insert_namespace(config.table.clone(), cache.clone());
        }

        let loaded = cache.len();
        log_op_end!(
            "register_enumeration",
            duration_ms = started.elapsed().as_millis() as u64,
            table = config.table.as_str(),
            values = loaded as u64
        );
        self.caches.insert(config.table.clone(), cache);
        self.configs.insert(config.table.clone(), config);
        Ok(loaded)
    }

    /// Resolve a raw value to its surrogate ID
    ///
    /// `None` and values that normalize to an empty string resolve to
    /// `None`. A first-seen value is minted and its row emitted immediately;
    /// it is cached in both directions only after the sink accepts the row.
    ///
    /// # Errors
    ///
    /// - `UnknownNamespace` if `table` was never registered
    /// - `MissingAssignment` for a catalog-strategy miss
    /// - minting and emission errors propagate
    pub fn id_for<S: RowSink>(
        &mut self,
        emitter: &mut TableEmitter<S>,
        table: &str,
        raw_value: Option<&str>,
    ) -> Result<Option<SurrogateId>> {
        let config = self
            .configs
            .get(table)
            .ok_or_else(|| SnapTabError::UnknownNamespace {
                namespace: table.to_string(),
            })?;
        let Some(raw_value) = raw_value else {
            return Ok(None);
        };
        let value = config.normalize(raw_value);
        if value.is_empty() {
            return Ok(None);
        }

        let cache = self.caches.entry(table.to_string()).or_default();
        if let Some(id) = cache.get(&value) {
            return Ok(Some(id));
        }

        let id = match config.strategy {
            IdStrategy::Hashed => self.hashed.assign(table, &value, config.bits)?,
            IdStrategy::Catalog => self.catalog.assign(table, &value, config.bits)?,
        };
        // Cached only once the row is written; a failed emit is retried on the next lookup
        emitter.emit(&config.table, &enumeration_row(config, id, &value))?;
        cache.bind(table, &value, id)?;
        Ok(Some(id))
    }

    pub fn value_for(&self, table: &str, id: SurrogateId) -> Option<&str> {
        self.caches.get(table).and_then(|cache| cache.value_for(id))
    }

    /// Number of known values for `table`
    pub fn len(&self, table: &str) -> usize {
        self.caches.get(table).map_or(0, Assignment::len)
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn config(&self, table: &str) -> Option<&EnumerationConfig> {
        self.configs.get(table)
    }
}

fn enumeration_row(config: &EnumerationConfig, id: SurrogateId, value: &str) -> Row {
    Row::new()
        .with(config.id_column.as_str(), id)
        .with(config.value_column.as_str(), value)
}
