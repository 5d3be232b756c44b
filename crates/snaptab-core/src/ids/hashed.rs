use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::errors::{Result, SnapTabError};
use crate::ids::IdentifierAssigner;
use crate::model::{SurrogateId, PENDING_ID};

/// Default bit width for minted IDs; keeps every ID inside a signed 64-bit
/// column.
pub const DEFAULT_BITS: u32 = 63;

/// Upper bound on collision probes for one value
pub const MAX_ATTEMPTS: u64 = 4096;

const DEFAULT_KEY: &[u8] = b"snaptab/stable-id/v1";

#[derive(Debug, Default, Clone)]
struct NamespaceIds {
    by_value: HashMap<String, SurrogateId>,
    by_id: HashMap<SurrogateId, String>,
}

/// Hash-based ID minting with collision probing
///
/// `id = first_8_bytes(SHA256(key, namespace, value, attempt)) & mask(bits)`,
/// retrying with the next attempt while the result is zero or already bound
/// to another value in the namespace. Accepted IDs are memoized in both
/// directions.
#[derive(Debug, Clone)]
pub struct HashedAssigner {
    key: Vec<u8>,
    namespaces: HashMap<String, NamespaceIds>,
}

impl Default for HashedAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl HashedAssigner {
    pub fn new() -> Self {
        Self::with_key(DEFAULT_KEY)
    }

    /// Use a caller-chosen digest key
    pub fn with_key(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
            namespaces: HashMap::new(),
        }
    }

    /// Return the ID for `value`, minting one on first sight
    ///
    /// # Errors
    ///
    /// - `EmptyValue` if `value` is empty
    /// - `InvalidBits` if `bits` is outside `1..=63`
    /// - `IdSpaceExhausted` if no free ID was found within `MAX_ATTEMPTS`
    pub fn generate(&mut self, namespace: &str, value: &str, bits: u32) -> Result<SurrogateId> {
        if value.is_empty() {
            return Err(SnapTabError::EmptyValue {
                namespace: namespace.to_string(),
            });
        }
        if !(1..=DEFAULT_BITS).contains(&bits) {
            return Err(SnapTabError::InvalidBits { bits });
        }

        let ids = self.namespaces.entry(namespace.to_string()).or_default();
        if let Some(&id) = ids.by_value.get(value) {
            return Ok(id);
        }

        let mask = (1u64 << bits) - 1;
        for attempt in 0..MAX_ATTEMPTS {
            let candidate = digest_u64(&self.key, namespace, value, attempt) & mask;
            if candidate == PENDING_ID {
                continue;
            }
            if let Some(holder) = ids.by_id.get(&candidate) {
                tracing::debug!(
                    namespace,
                    id = candidate,
                    holder = holder.as_str(),
                    attempt,
                    "surrogate id collision, probing"
                );
                continue;
            }
            ids.by_value.insert(value.to_string(), candidate);
            ids.by_id.insert(candidate, value.to_string());
            return Ok(candidate);
        }

        Err(SnapTabError::IdSpaceExhausted {
            namespace: namespace.to_string(),
            bits,
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Bind an externally known pair so fresh minting never reuses its ID
    ///
    /// Re-reserving an identical pair is a no-op.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty value or the zero ID
    /// - `IdConflict` if the ID is bound to another value, or the value is
    ///   bound to another ID
    pub fn reserve(&mut self, namespace: &str, value: &str, id: SurrogateId) -> Result<()> {
        if value.is_empty() || id == PENDING_ID {
            return Err(SnapTabError::InvalidInput {
                reason: format!("cannot reserve '{}' -> {} in {}", value, id, namespace),
            });
        }

        let ids = self.namespaces.entry(namespace.to_string()).or_default();
        if let Some(holder) = ids.by_id.get(&id) {
            if holder == value {
                return Ok(());
            }
            return Err(SnapTabError::IdConflict {
                namespace: namespace.to_string(),
                id,
                existing: holder.clone(),
                value: value.to_string(),
            });
        }
        if let Some(&existing) = ids.by_value.get(value) {
            return Err(SnapTabError::IdConflict {
                namespace: namespace.to_string(),
                id: existing,
                existing: value.to_string(),
                value: value.to_string(),
            });
        }

        ids.by_value.insert(value.to_string(), id);
        ids.by_id.insert(id, value.to_string());
        Ok(())
    }

    pub fn value_for(&self, namespace: &str, id: SurrogateId) -> Option<&str> {
        self.namespaces
            .get(namespace)
            .and_then(|ids| ids.by_id.get(&id))
            .map(String::as_str)
    }

    /// Number of bound values in `namespace`
    pub fn len(&self, namespace: &str) -> usize {
        self.namespaces
            .get(namespace)
            .map_or(0, |ids| ids.by_value.len())
    }
}

impl IdentifierAssigner for HashedAssigner {
    fn assign(&mut self, namespace: &str, value: &str, bits: u32) -> Result<SurrogateId> {
        self.generate(namespace, value, bits)
    }

    fn lookup(&self, namespace: &str, value: &str) -> Option<SurrogateId> {
        self.namespaces
            .get(namespace)
            .and_then(|ids| ids.by_value.get(value).copied())
    }
}

// Length prefixes keep ("ab", "c") and ("a", "bc") apart.
fn digest_u64(key: &[u8], namespace: &str, value: &str, attempt: u64) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update((key.len() as u64).to_be_bytes());
    hasher.update(key);
    hasher.update((namespace.len() as u64).to_be_bytes());
    hasher.update(namespace.as_bytes());
    hasher.update((value.len() as u64).to_be_bytes());
    hasher.update(value.as_bytes());
    hasher.update(attempt.to_be_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(head)
}
