use std::cell::RefCell;
use std::collections::HashMap;

use super::EntityStore;
use crate::core::{IdentityKey, Result};
use crate::entity::EntityRef;

/// In-memory reference store, keyed by type name and identity key.
///
/// Stands in for a real persistence layer in tests and small tools. The
/// caller plays the transaction/flush role by calling `persist` itself.
#[derive(Default)]
pub struct MemoryStore {
    entities: RefCell<HashMap<String, HashMap<IdentityKey, EntityRef>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity under its key, replacing any previous entry.
    pub fn persist(&self, type_name: &str, key: IdentityKey, entity: EntityRef) {
        self.entities
            .borrow_mut()
            .entry(type_name.to_string())
            .or_default()
            .insert(key, entity);
    }

    pub fn remove(&self, type_name: &str, key: &IdentityKey) -> Option<EntityRef> {
        self.entities
            .borrow_mut()
            .get_mut(type_name)
            .and_then(|m| m.remove(key))
    }

    pub fn len(&self) -> usize {
        self.entities.borrow().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entities.borrow_mut().clear();
    }
}

impl EntityStore for MemoryStore {
    fn find_one_by_key(&self, type_name: &str, key: &IdentityKey) -> Result<Option<EntityRef>> {
        Ok(self
            .entities
            .borrow()
            .get(type_name)
            .and_then(|m| m.get(key))
            .cloned())
    }
}
