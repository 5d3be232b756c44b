use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::errors::{Result, SnapTabError};

/// Declared shape of one output table
///
/// `columns` may be left empty when the sink derives the header from the
/// first row. `dedup_key` lists the fields whose combined values must be
/// unique within one emission session; an empty key means append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSpec {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub dedup_key: Vec<String>,
}

impl TableSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            dedup_key: Vec::new(),
        }
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dedup_key<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dedup_key = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Check the spec is internally consistent
    ///
    /// # Errors
    ///
    /// Returns `InvalidTableSpec` for an empty name, repeated columns or key
    /// fields, or a key field that is not a declared column.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| SnapTabError::InvalidTableSpec {
            table: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("table name is empty".to_string()));
        }

        let mut columns = HashSet::new();
        for column in &self.columns {
            if column.is_empty() {
                return Err(invalid("empty column name".to_string()));
            }
            if !columns.insert(column.as_str()) {
                return Err(invalid(format!("duplicate column {}", column)));
            }
        }

        let mut key_fields = HashSet::new();
        for field in &self.dedup_key {
            if !key_fields.insert(field.as_str()) {
                return Err(invalid(format!("duplicate dedup key field {}", field)));
            }
            if !self.columns.is_empty() && !columns.contains(field.as_str()) {
                return Err(invalid(format!(
                    "dedup key field {} is not a declared column",
                    field
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_outside_columns_rejected() {
        let spec = TableSpec::new("country")
            .with_columns(["country_id", "country_iso_alpha2_code"])
            .with_dedup_key(["country_code"]);

        let err = spec.validate().unwrap_err();
        assert!(matches!(err, SnapTabError::InvalidTableSpec { .. }));
    }

    #[test]
    fn test_key_without_columns_accepted() {
        let spec = TableSpec::new("funder").with_dedup_key(["funder_id"]);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_duplicate_key_field_rejected() {
        let spec = TableSpec::new("work_author").with_dedup_key(["work_id", "work_id"]);
        assert!(spec.validate().is_err());
    }
}
