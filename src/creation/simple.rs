use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, trace};

use super::{CreationStrategy, Resolved, Source};
use crate::clock::Clock;
use crate::core::{IdentityKey, Result};
use crate::entity::EntityRef;
use crate::metadata::TypeDescriptor;
use crate::storage::EntityStore;

/// Identity-map-backed resolution.
///
/// The map is scoped to this strategy's lifetime, i.e. one unit of work:
/// for a given (type, usable key) pair at most one live instance is ever
/// handed out until `clear_state`. An unusable key (absent or containing
/// a NULL component) bypasses the map entirely, so such calls may yield
/// distinct instances.
pub struct SimpleStrategy {
    store: Rc<dyn EntityStore>,
    clock: Clock,
    id_map: HashMap<String, HashMap<IdentityKey, EntityRef>>,
}

impl SimpleStrategy {
    pub fn new(store: Rc<dyn EntityStore>, clock: Clock) -> Self {
        Self {
            store,
            clock,
            id_map: HashMap::new(),
        }
    }

    fn cached(&self, type_name: &str, key: &IdentityKey) -> Option<EntityRef> {
        self.id_map.get(type_name).and_then(|m| m.get(key)).cloned()
    }
}

impl CreationStrategy for SimpleStrategy {
    fn create(
        &mut self,
        meta: &TypeDescriptor,
        key: Option<&IdentityKey>,
        candidate: Option<EntityRef>,
    ) -> Result<Resolved> {
        let usable = key.filter(|k| k.is_usable());

        if let Some(key) = usable {
            if let Some(entity) = self.cached(meta.name(), key) {
                trace!("identity map hit: {}[{}]", meta.name(), key);
                return Ok(Resolved {
                    entity,
                    source: Source::Cache,
                });
            }
        }

        let stored = match usable {
            Some(key) => self.store.find_one_by_key(meta.name(), key)?,
            None => None,
        };

        let (entity, source) = if let Some(entity) = stored {
            (entity, Source::Store)
        } else if let Some(entity) = candidate {
            (entity, Source::Candidate)
        } else {
            debug!("allocating blank {}", meta.name());
            (meta.allocate_blank(&self.clock), Source::Fresh)
        };

        if let Some(key) = usable {
            // additive only: an entry is never replaced once set
            self.id_map
                .entry(meta.name().to_string())
                .or_default()
                .entry(key.clone())
                .or_insert_with(|| entity.clone());
        }

        Ok(Resolved { entity, source })
    }

    fn clear_state(&mut self) {
        debug!("clearing identity map ({} type(s))", self.id_map.len());
        self.id_map.clear();
    }
}
