use crate::enumeration::EnumerationConfig;
use crate::errors::Result;
use crate::reference::{read_reference_rows, write_reference_rows};
use snaptab_core::errors::SnapTabError;
use snaptab_core::ids::{assign_dense, Assignment, IdentifierAssigner};
use snaptab_core::{log_op_end, log_op_start, SurrogateId, PENDING_ID};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// An auxiliary ID space that is not an enumeration table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceConfig {
    pub namespace: String,
    pub filename: String,
    pub id_column: String,
    pub value_column: String,
}

impl NamespaceConfig {
    pub fn new(
        namespace: impl Into<String>,
        filename: impl Into<String>,
        id_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            filename: filename.into(),
            id_column: id_column.into(),
            value_column: value_column.into(),
        }
    }
}

struct Target<'a> {
    name: &'a str,
    filename: String,
    id_column: &'a str,
    value_column: &'a str,
}

/// Collects distinct values and assigns stable sequential IDs
///
/// The assignment of a namespace depends only on the set of values
/// recorded into it, so re-running over the same logical corpus yields the
/// same IDs even if partitions are visited in a different order.
#[derive(Debug, Default)]
pub struct IdCatalog {
    enum_configs: BTreeMap<String, EnumerationConfig>,
    namespace_configs: BTreeMap<String, NamespaceConfig>,
    enum_values: HashMap<String, HashSet<String>>,
    namespace_values: HashMap<String, HashSet<String>>,
    enum_assignments: HashMap<String, Assignment>,
    namespace_assignments: HashMap<String, Assignment>,
}

impl IdCatalog {
    pub fn new(
        enum_configs: impl IntoIterator<Item = EnumerationConfig>,
        namespace_configs: impl IntoIterator<Item = NamespaceConfig>,
    ) -> Self {
        Self {
            enum_configs: enum_configs
                .into_iter()
                .map(|c| (c.table.clone(), c))
                .collect(),
            namespace_configs: namespace_configs
                .into_iter()
                .map(|c| (c.namespace.clone(), c))
                .collect(),
            ..Self::default()
        }
    }

    /// Record a value seen for an enumeration table
    ///
    /// The value is normalized with the table's normalizer first; empty
    /// results are ignored.
    ///
    /// # Errors
    ///
    /// `UnknownNamespace` if the table is not configured.
    pub fn record_enum(&mut self, table: &str, value: &str) -> snaptab_core::Result<()> {
        let config = self
            .enum_configs
            .get(table)
            .ok_or_else(|| SnapTabError::UnknownNamespace {
                namespace: table.to_string(),
            })?;
        let value = config.normalize(value);
        if !value.is_empty() {
            self.enum_values
                .entry(table.to_string())
                .or_default()
                .insert(value);
        }
        Ok(())
    }

    /// Record a value seen for an auxiliary namespace
    ///
    /// Surrounding whitespace is trimmed; case is kept. Blank values are
    /// ignored.
    ///
    /// # Errors
    ///
    /// `UnknownNamespace` if the namespace is not configured.
    pub fn record_namespace(&mut self, namespace: &str, value: &str) -> snaptab_core::Result<()> {
        if !self.namespace_configs.contains_key(namespace) {
            return Err(SnapTabError::UnknownNamespace {
                namespace: namespace.to_string(),
            });
        }
        let value = value.trim();
        if !value.is_empty() {
            self.namespace_values
                .entry(namespace.to_string())
                .or_default()
                .insert(value.to_string());
        }
        Ok(())
    }

    /// Distinct values recorded so far for a table or namespace
    pub fn recorded_count(&self, name: &str) -> usize {
        self.enum_values
            .get(name)
            .or_else(|| self.namespace_values.get(name))
            .map_or(0, HashSet::len)
    }

    /// Assign IDs to everything recorded and write the reference files
    ///
    /// Every configured table and namespace gets a file, empty or not.
    ///
    /// # Errors
    ///
    /// Directory creation and file write failures propagate.
    pub fn finalize(&mut self, reference_dir: &Path) -> Result<()> {
        let started = Instant::now();
        log_op_start!(
            "catalog_finalize",
            dir = %reference_dir.display(),
            namespaces = (self.enum_configs.len() + self.namespace_configs.len()) as u64
        );
        fs::create_dir_all(reference_dir)
            .map_err(|e| crate::errors::io_error("catalog_finalize", reference_dir, e))?;

        let mut enum_assignments = HashMap::new();
        for config in self.enum_configs.values() {
            let values = self.enum_values.get(&config.table);
            let assignment = assign_dense(values.into_iter().flatten().map(String::as_str));
            let target = enum_target(config);
            write_assignment(reference_dir, &target, &assignment)?;
            enum_assignments.insert(config.table.clone(), assignment);
        }

        let mut namespace_assignments = HashMap::new();
        for config in self.namespace_configs.values() {
            let values = self.namespace_values.get(&config.namespace);
            let assignment = assign_dense(values.into_iter().flatten().map(String::as_str));
            let target = namespace_target(config);
            write_assignment(reference_dir, &target, &assignment)?;
            namespace_assignments.insert(config.namespace.clone(), assignment);
        }

        self.enum_assignments = enum_assignments;
        self.namespace_assignments = namespace_assignments;

        log_op_end!(
            "catalog_finalize",
            duration_ms = started.elapsed().as_millis() as u64,
            values = self.assigned_total() as u64
        );
        Ok(())
    }

    /// Rebuild all assignments from a previously finalized directory
    ///
    /// Returns `false` when the directory or any required file is missing;
    /// in-memory assignments are left untouched in that case so the caller
    /// can regenerate. Malformed rows are skipped.
    ///
    /// # Errors
    ///
    /// Only filesystem errors unrelated to row parsing.
    pub fn load_existing(&mut self, reference_dir: &Path) -> Result<bool> {
        let started = Instant::now();
        log_op_start!("catalog_load", dir = %reference_dir.display());

        if !reference_dir.is_dir() {
            log_op_end!(
                "catalog_load",
                duration_ms = started.elapsed().as_millis() as u64,
                available = false
            );
            return Ok(false);
        }

        let targets: Vec<(bool, Target<'_>)> = self
            .enum_configs
            .values()
            .map(|c| (true, enum_target(c)))
            .chain(self.namespace_configs.values().map(|c| (false, namespace_target(c))))
            .collect();

        let mut missing: Option<PathBuf> = None;
        for (_, target) in &targets {
            let path = reference_dir.join(&target.filename);
            if !path.is_file() {
                missing = Some(path);
                break;
            }
        }
        if let Some(path) = missing {
            tracing::info!(path = %path.display(), "reference catalog incomplete");
            log_op_end!(
                "catalog_load",
                duration_ms = started.elapsed().as_millis() as u64,
                available = false
            );
            return Ok(false);
        }

        let mut enum_assignments = HashMap::new();
        let mut namespace_assignments = HashMap::new();
        for (is_enum, target) in &targets {
            let path = reference_dir.join(&target.filename);
            let rows = read_reference_rows(&path, target.id_column, target.value_column)?;
            let mut assignment = Assignment::new();
            for (id, value) in rows.pairs {
                if let Err(err) = assignment.bind(target.name, &value, id) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %err,
                        "skipped conflicting reference row"
                    );
                }
            }
            if *is_enum {
                enum_assignments.insert(target.name.to_string(), assignment);
            } else {
                namespace_assignments.insert(target.name.to_string(), assignment);
            }
        }

        self.enum_assignments = enum_assignments;
        self.namespace_assignments = namespace_assignments;

        log_op_end!(
            "catalog_load",
            duration_ms = started.elapsed().as_millis() as u64,
            available = true,
            values = self.assigned_total() as u64
        );
        Ok(true)
    }

    pub fn enum_assignments(&self, table: &str) -> Option<&Assignment> {
        self.enum_assignments.get(table)
    }

    pub fn namespace_assignments(&self, namespace: &str) -> Option<&Assignment> {
        self.namespace_assignments.get(namespace)
    }

    /// Every finalized or loaded assignment, keyed by table or namespace
    pub fn assignments(&self) -> BTreeMap<&str, &Assignment> {
        self.enum_assignments
            .iter()
            .chain(self.namespace_assignments.iter())
            .map(|(name, assignment)| (name.as_str(), assignment))
            .collect()
    }

    fn assigned_total(&self) -> usize {
        self.enum_assignments
            .values()
            .chain(self.namespace_assignments.values())
            .map(Assignment::len)
            .sum()
    }
}

/// Collecting mode: a first pass can run transformers against the catalog
/// itself. Values are recorded and the pending sentinel is returned.
impl IdentifierAssigner for IdCatalog {
    fn assign(&mut self, namespace: &str, value: &str, _bits: u32) -> snaptab_core::Result<SurrogateId> {
        if value.trim().is_empty() {
            return Err(SnapTabError::EmptyValue {
                namespace: namespace.to_string(),
            });
        }
        self.record_namespace(namespace, value)?;
        Ok(PENDING_ID)
    }

    fn lookup(&self, namespace: &str, value: &str) -> Option<SurrogateId> {
        self.namespace_assignments
            .get(namespace)
            .and_then(|a| a.get(value.trim()))
    }
}

fn enum_target(config: &EnumerationConfig) -> Target<'_> {
    Target {
        name: &config.table,
        filename: config.reference_filename(),
        id_column: &config.id_column,
        value_column: &config.value_column,
    }
}

fn namespace_target(config: &NamespaceConfig) -> Target<'_> {
    Target {
        name: &config.namespace,
        filename: config.filename.clone(),
        id_column: &config.id_column,
        value_column: &config.value_column,
    }
}

fn write_assignment(reference_dir: &Path, target: &Target<'_>, assignment: &Assignment) -> Result<()> {
    let path = reference_dir.join(&target.filename);
    tracing::debug!(
        name = target.name,
        path = %path.display(),
        values = assignment.len() as u64,
        "writing reference file"
    );
    write_reference_rows(&path, target.id_column, target.value_column, assignment.iter())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snaptab_core::Normalizer;
    use tempfile::TempDir;

    fn catalog() -> IdCatalog {
        IdCatalog::new(
            [EnumerationConfig::new("country", "country_id", "country")
                .with_normalizer(Normalizer::lowercase())],
            [NamespaceConfig::new(
                "scopus_author",
                "scopus_author.tsv",
                "scopus_author_id",
                "scopus_author",
            )],
        )
    }

    #[test]
    fn test_record_is_idempotent_and_normalized() {
        let mut catalog = catalog();
        catalog.record_enum("country", "US").unwrap();
        catalog.record_enum("country", "us").unwrap();
        catalog.record_enum("country", " ").unwrap();

        assert_eq!(catalog.recorded_count("country"), 1);
    }

    #[test]
    fn test_namespace_values_trimmed_but_case_kept() {
        let dir = TempDir::new().unwrap();
        let mut catalog = catalog();
        catalog.record_namespace("scopus_author", " 123 ").unwrap();
        catalog.record_namespace("scopus_author", "123").unwrap();
        catalog.record_namespace("scopus_author", "\t").unwrap();
        catalog.record_namespace("scopus_author", "Ab").unwrap();
        assert_eq!(catalog.recorded_count("scopus_author"), 2);

        catalog.finalize(dir.path()).unwrap();
        let assigned = catalog.namespace_assignments("scopus_author").unwrap();
        assert_eq!(assigned.get("123"), Some(1));
        assert_eq!(assigned.get("Ab"), Some(2));
        assert_eq!(catalog.lookup("scopus_author", " 123"), Some(1));
    }

    #[test]
    fn test_whitespace_value_is_rejected_by_assigner() {
        let mut catalog = catalog();
        let err = catalog.assign("scopus_author", "  ", 63).unwrap_err();
        assert!(matches!(err, SnapTabError::EmptyValue { .. }));
        assert_eq!(catalog.recorded_count("scopus_author"), 0);
    }

    #[test]
    fn test_unknown_names_rejected() {
        let mut catalog = catalog();
        assert!(catalog.record_enum("language", "en").is_err());
        assert!(catalog.record_namespace("orcid", "0000").is_err());
    }

    #[test]
    fn test_collecting_assigner_returns_sentinel() {
        let mut catalog = catalog();
        let id = catalog.assign("scopus_author", "12345", 63).unwrap();

        assert_eq!(id, PENDING_ID);
        assert_eq!(catalog.recorded_count("scopus_author"), 1);
    }

    #[test]
    fn test_finalize_writes_every_configured_file() {
        let dir = TempDir::new().unwrap();
        let mut catalog = catalog();
        catalog.record_enum("country", "FR").unwrap();

        catalog.finalize(dir.path()).unwrap();

        assert!(dir.path().join("country.tsv").is_file());
        assert!(dir.path().join("scopus_author.tsv").is_file());
        assert_eq!(catalog.enum_assignments("country").unwrap().get("fr"), Some(1));
        assert!(catalog.namespace_assignments("scopus_author").unwrap().is_empty());
    }
}
