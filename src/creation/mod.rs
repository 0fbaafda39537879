mod simple;

pub use simple::SimpleStrategy;

use crate::core::{IdentityKey, Result};
use crate::entity::EntityRef;
use crate::metadata::TypeDescriptor;

/// Where a resolved instance came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Cache,
    Store,
    Candidate,
    Fresh,
}

/// Outcome of identity resolution.
pub struct Resolved {
    pub entity: EntityRef,
    pub source: Source,
}

/// Decides which concrete instance represents "the" entity for a
/// (type, key) pair.
///
/// Precedence: identity-map hit, then store lookup, then the caller's
/// candidate, then a fresh blank instance. Resolution never mutates the
/// instance's fields.
pub trait CreationStrategy {
    fn create(
        &mut self,
        meta: &TypeDescriptor,
        key: Option<&IdentityKey>,
        candidate: Option<EntityRef>,
    ) -> Result<Resolved>;

    /// Drop identity-map state at a unit-of-work boundary. Idempotent.
    fn clear_state(&mut self);
}
