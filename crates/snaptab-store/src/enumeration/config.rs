use serde::{Deserialize, Serialize};
use snaptab_core::ids::DEFAULT_BITS;
use snaptab_core::{Normalizer, TableSpec};

/// How misses are resolved for one enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdStrategy {
    /// Mint with the keyed-hash generator on first sight
    #[default]
    Hashed,
    /// Only values already in the reference catalog resolve
    Catalog,
}

/// Declaration of one enumeration table
#[derive(Debug, Clone)]
pub struct EnumerationConfig {
    pub table: String,
    pub id_column: String,
    pub value_column: String,
    pub bits: u32,
    /// File name inside the reference directory; defaults to `<table>.tsv`
    pub reference_filename: Option<String>,
    pub normalizer: Normalizer,
    pub strategy: IdStrategy,
}

impl EnumerationConfig {
    pub fn new(
        table: impl Into<String>,
        id_column: impl Into<String>,
        value_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            id_column: id_column.into(),
            value_column: value_column.into(),
            bits: DEFAULT_BITS,
            reference_filename: None,
            normalizer: Normalizer::default(),
            strategy: IdStrategy::default(),
        }
    }

    pub fn with_bits(mut self, bits: u32) -> Self {
        self.bits = bits;
        self
    }

    pub fn with_reference_filename(mut self, filename: impl Into<String>) -> Self {
        self.reference_filename = Some(filename.into());
        self
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_strategy(mut self, strategy: IdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn reference_filename(&self) -> String {
        self.reference_filename
            .clone()
            .unwrap_or_else(|| format!("{}.tsv", self.table))
    }

    pub fn normalize(&self, value: &str) -> String {
        self.normalizer.apply(value)
    }

    /// Output table shape: `(id, value)` deduplicated on the id column
    pub fn table_spec(&self) -> TableSpec {
        TableSpec::new(self.table.clone())
            .with_columns([self.id_column.clone(), self.value_column.clone()])
            .with_dedup_key([self.id_column.clone()])
    }
}
