pub mod memory;

pub use memory::MemoryStore;

use crate::core::{IdentityKey, Result};
use crate::entity::EntityRef;

/// Narrow lookup contract consumed from the persistence layer.
///
/// Transactions, persist and flush stay on the caller's side of this
/// boundary; the instantiator only ever reads through it. Failures
/// surface opaquely as `HydrateError::StorageLookupFailed` and are never
/// retried here.
pub trait EntityStore {
    /// Find the entity of `type_name` matching `key`, if any.
    fn find_one_by_key(&self, type_name: &str, key: &IdentityKey) -> Result<Option<EntityRef>>;
}
