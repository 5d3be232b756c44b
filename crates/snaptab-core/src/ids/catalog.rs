use std::collections::{BTreeMap, HashMap};

use crate::errors::{Result, SnapTabError};
use crate::ids::IdentifierAssigner;
use crate::model::{SurrogateId, PENDING_ID};

/// Bidirectional value ↔ ID mapping for one namespace
///
/// Injective in both directions: [`Assignment::bind`] refuses to give an ID
/// a second value or a value a second ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    by_value: HashMap<String, SurrogateId>,
    by_id: BTreeMap<SurrogateId, String>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` to `id`. Re-binding the identical pair is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `IdConflict` if either side is already bound elsewhere, and
    /// `InvalidInput` for the zero ID or an empty value.
    pub fn bind(&mut self, namespace: &str, value: &str, id: SurrogateId) -> Result<()> {
        if id == PENDING_ID || value.is_empty() {
            return Err(SnapTabError::InvalidInput {
                reason: format!("cannot bind '{}' -> {} in {}", value, id, namespace),
            });
        }
        match (self.by_value.get(value), self.by_id.get(&id)) {
            (Some(&existing), _) if existing == id => Ok(()),
            (Some(&existing), _) => Err(SnapTabError::IdConflict {
                namespace: namespace.to_string(),
                id: existing,
                existing: value.to_string(),
                value: value.to_string(),
            }),
            (None, Some(holder)) => Err(SnapTabError::IdConflict {
                namespace: namespace.to_string(),
                id,
                existing: holder.clone(),
                value: value.to_string(),
            }),
            (None, None) => {
                self.by_value.insert(value.to_string(), id);
                self.by_id.insert(id, value.to_string());
                Ok(())
            }
        }
    }

    pub fn get(&self, value: &str) -> Option<SurrogateId> {
        self.by_value.get(value).copied()
    }

    pub fn value_for(&self, id: SurrogateId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Pairs in ascending ID order
    pub fn iter(&self) -> impl Iterator<Item = (SurrogateId, &str)> {
        self.by_id.iter().map(|(id, value)| (*id, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// Sort values by the canonical key: lowercase form first, original
/// string as tiebreak
///
/// The key is `str::to_lowercase`, not full Unicode case folding, so `ß`
/// keys as itself rather than as `ss`. Dense IDs already written to
/// reference files depend on this key.
pub fn canonical_order<'a, I>(values: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut ordered: Vec<(String, &str)> = values
        .into_iter()
        .map(|value| (value.to_lowercase(), value))
        .collect();
    ordered.sort_unstable();
    ordered.dedup_by(|a, b| a.1 == b.1);
    ordered.into_iter().map(|(_, value)| value).collect()
}

/// Assign dense IDs `1..=N` to the distinct values in canonical order
///
/// The result depends only on the set of values, never on their arrival
/// order.
pub fn assign_dense<'a, I>(values: I) -> Assignment
where
    I: IntoIterator<Item = &'a str>,
{
    let mut assignment = Assignment::new();
    for (index, value) in canonical_order(values)
        .into_iter()
        .filter(|v| !v.is_empty())
        .enumerate()
    {
        let id = index as SurrogateId + 1;
        assignment.by_value.insert(value.to_string(), id);
        assignment.by_id.insert(id, value.to_string());
    }
    assignment
}

/// Replays a previously fixed catalog
///
/// Never mints: a value absent from the catalog is an error, which tells the
/// caller the catalog must be rebuilt.
#[derive(Debug, Clone, Default)]
pub struct CatalogAssigner {
    namespaces: HashMap<String, Assignment>,
}

impl CatalogAssigner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_assignments(namespaces: HashMap<String, Assignment>) -> Self {
        Self { namespaces }
    }

    /// Install or replace the assignment of one namespace
    pub fn insert_namespace(&mut self, namespace: impl Into<String>, assignment: Assignment) {
        self.namespaces.insert(namespace.into(), assignment);
    }

    pub fn namespace(&self, namespace: &str) -> Option<&Assignment> {
        self.namespaces.get(namespace)
    }

    /// Resolve `value`; the bit width is fixed by the catalog
    ///
    /// # Errors
    ///
    /// `UnknownNamespace` if the namespace has no assignment loaded, and
    /// `MissingAssignment` if the value is not in it.
    pub fn resolve(&self, namespace: &str, value: &str) -> Result<SurrogateId> {
        let assignment =
            self.namespaces
                .get(namespace)
                .ok_or_else(|| SnapTabError::UnknownNamespace {
                    namespace: namespace.to_string(),
                })?;
        assignment
            .get(value)
            .ok_or_else(|| SnapTabError::MissingAssignment {
                namespace: namespace.to_string(),
                value: value.to_string(),
            })
    }
}

impl IdentifierAssigner for CatalogAssigner {
    fn assign(&mut self, namespace: &str, value: &str, _bits: u32) -> Result<SurrogateId> {
        if value.is_empty() {
            return Err(SnapTabError::EmptyValue {
                namespace: namespace.to_string(),
            });
        }
        self.resolve(namespace, value)
    }

    fn lookup(&self, namespace: &str, value: &str) -> Option<SurrogateId> {
        self.namespaces.get(namespace).and_then(|a| a.get(value))
    }
}
