//! Value normalization applied before cache lookups and catalog recording

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Named normalizations available from configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeKind {
    /// Strip surrounding whitespace
    #[default]
    Trim,
    /// Trim, then lowercase
    Lowercase,
    /// Trim, then uppercase
    Uppercase,
}

/// A namespace's normalization function
///
/// Must be applied identically when loading a reference file and when
/// looking values up, otherwise the cache and fresh lookups diverge.
#[derive(Clone)]
pub struct Normalizer {
    label: &'static str,
    func: Arc<dyn Fn(&str) -> String + Send + Sync>,
}

impl Normalizer {
    pub fn trim() -> Self {
        Self::custom("trim", |value| value.trim().to_string())
    }

    pub fn lowercase() -> Self {
        Self::custom("lowercase", |value| value.trim().to_lowercase())
    }

    pub fn uppercase() -> Self {
        Self::custom("uppercase", |value| value.trim().to_uppercase())
    }

    pub fn custom<F>(label: &'static str, func: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            label,
            func: Arc::new(func),
        }
    }

    pub fn apply(&self, value: &str) -> String {
        (self.func)(value)
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::trim()
    }
}

impl From<NormalizeKind> for Normalizer {
    fn from(kind: NormalizeKind) -> Self {
        match kind {
            NormalizeKind::Trim => Normalizer::trim(),
            NormalizeKind::Lowercase => Normalizer::lowercase(),
            NormalizeKind::Uppercase => Normalizer::uppercase(),
        }
    }
}

impl fmt::Debug for Normalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Normalizer").field(&self.label).finish()
    }
}
