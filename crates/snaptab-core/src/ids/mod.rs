//! Surrogate ID assignment strategies
//!
//! Two strategies sit behind [`IdentifierAssigner`]:
//!
//! - [`HashedAssigner`] mints IDs online from a keyed digest with collision
//!   probing. No persisted state; stable across runs only when values are
//!   minted in the same order.
//! - [`CatalogAssigner`] replays dense sequential IDs fixed by a previous
//!   full pass. Stable across runs for the same value set.
//!
//! Callers choose per namespace based on whether cross-run stability is
//! required.

mod catalog;
mod hashed;

pub use catalog::{assign_dense, canonical_order, Assignment, CatalogAssigner};
pub use hashed::{HashedAssigner, DEFAULT_BITS, MAX_ATTEMPTS};

use crate::errors::Result;
use crate::model::SurrogateId;

/// Resolves (namespace, value) pairs to surrogate IDs
pub trait IdentifierAssigner {
    /// Resolve or mint the ID for `value` in `namespace`
    ///
    /// # Errors
    ///
    /// Strategy-specific: see the implementing type.
    fn assign(&mut self, namespace: &str, value: &str, bits: u32) -> Result<SurrogateId>;

    /// ID already bound to `value`, without minting
    fn lookup(&self, namespace: &str, value: &str) -> Option<SurrogateId>;
}
