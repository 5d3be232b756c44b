//! Pipeline file schema
//!
//! ```yaml
//! reference_dir: reference
//! progress_interval: 10000
//! enumerations:
//!   - table: country
//!     id_column: country_id
//!     value_column: country_code
//!     normalize: uppercase
//!     sources:
//!       - entity: institutions
//!         pointer: /country_code
//! namespaces:
//!   - namespace: scopus_author
//!     filename: scopus_author.tsv
//!     id_column: scopus_author_id
//!     value_column: scopus_author
//!     sources:
//!       - entity: authors
//!         pointer: /ids/scopus
//! tables:
//!   - name: work
//!     columns: [work_id, title]
//!     dedup_key: [work_id]
//! ```

use crate::catalog::NamespaceConfig;
use crate::enumeration::{EnumerationConfig, IdStrategy};
use serde::{Deserialize, Serialize};
use snaptab_core::ids::DEFAULT_BITS;
use snaptab_core::{NormalizeKind, TableSpec};
use std::path::PathBuf;

/// Top-level pipeline file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Directory holding reference catalog files
    #[serde(default)]
    pub reference_dir: Option<PathBuf>,

    /// Records between progress log lines
    #[serde(default)]
    pub progress_interval: Option<u64>,

    #[serde(default)]
    pub enumerations: Vec<EnumerationSection>,

    #[serde(default)]
    pub namespaces: Vec<NamespaceSection>,

    #[serde(default)]
    pub tables: Vec<TableSection>,
}

/// Where values for a table or namespace come from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    /// Snapshot entity directory, e.g. `works`
    pub entity: String,
    /// JSON pointer into each document; a `*` segment fans out over arrays
    pub pointer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumerationSection {
    pub table: String,
    pub id_column: String,
    pub value_column: String,
    #[serde(default = "default_bits")]
    pub bits: u32,
    #[serde(default)]
    pub reference_filename: Option<String>,
    #[serde(default)]
    pub normalize: NormalizeKind,
    #[serde(default)]
    pub strategy: IdStrategy,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceSection {
    pub namespace: String,
    /// Defaults to `<namespace>.tsv`
    #[serde(default)]
    pub filename: Option<String>,
    pub id_column: String,
    pub value_column: String,
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSection {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub dedup_key: Vec<String>,
}

fn default_bits() -> u32 {
    DEFAULT_BITS
}

impl EnumerationSection {
    pub fn to_config(&self) -> EnumerationConfig {
        let mut config = EnumerationConfig::new(&self.table, &self.id_column, &self.value_column)
            .with_bits(self.bits)
            .with_normalizer(self.normalize.into())
            .with_strategy(self.strategy);
        if let Some(filename) = &self.reference_filename {
            config = config.with_reference_filename(filename);
        }
        config
    }
}

impl NamespaceSection {
    pub fn filename(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| format!("{}.tsv", self.namespace))
    }

    pub fn to_config(&self) -> NamespaceConfig {
        NamespaceConfig::new(
            &self.namespace,
            self.filename(),
            &self.id_column,
            &self.value_column,
        )
    }
}

impl TableSection {
    pub fn to_spec(&self) -> TableSpec {
        TableSpec::new(&self.name)
            .with_columns(self.columns.iter().cloned())
            .with_dedup_key(self.dedup_key.iter().cloned())
    }
}

impl PipelineConfig {
    pub fn enumeration_configs(&self) -> Vec<EnumerationConfig> {
        self.enumerations.iter().map(EnumerationSection::to_config).collect()
    }

    pub fn namespace_configs(&self) -> Vec<NamespaceConfig> {
        self.namespaces.iter().map(NamespaceSection::to_config).collect()
    }

    /// Specs for every declared table plus one per enumeration table
    pub fn table_specs(&self) -> Vec<TableSpec> {
        self.tables
            .iter()
            .map(TableSection::to_spec)
            .chain(self.enumerations.iter().map(|e| e.to_config().table_spec()))
            .collect()
    }

    /// Entities referenced by any source, sorted and deduplicated
    pub fn source_entities(&self) -> Vec<&str> {
        let mut entities: Vec<&str> = self
            .enumerations
            .iter()
            .flat_map(|e| e.sources.iter())
            .chain(self.namespaces.iter().flat_map(|n| n.sources.iter()))
            .map(|s| s.entity.as_str())
            .collect();
        entities.sort_unstable();
        entities.dedup();
        entities
    }
}
