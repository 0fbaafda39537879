mod data;

pub use data::{DataMap, Raw};

use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use crate::assign::strategy_for;
use crate::clock::Clock;
use crate::core::{DataType, HydrateError, IdentityKey, Result, Value};
use crate::creation::{CreationStrategy, SimpleStrategy, Source};
use crate::entity::{EntityRef, FieldValue};
use crate::metadata::{FieldKind, FieldSpec, MetadataRegistry, TypeDescriptor};
use crate::storage::EntityStore;

/// Relation chains deeper than this abort with `RelationResolutionFailed`
/// instead of recursing forever on self-referential input.
const MAX_RESOLVE_DEPTH: usize = 32;

/// Hydrates entities from raw field data.
///
/// Obtains the canonical instance for the data's identifying key through
/// the creation strategy (which owns the identity map), then assigns every
/// field through the mechanism the type declares for it. Relation-typed
/// fields are resolved recursively through the same strategy, so an entity
/// referenced by key from several records within one unit of work resolves
/// to the identical instance.
pub struct EntityInstantiator {
    registry: Rc<MetadataRegistry>,
    strategy: RefCell<Box<dyn CreationStrategy>>,
}

impl EntityInstantiator {
    pub fn new(registry: Rc<MetadataRegistry>, store: Rc<dyn EntityStore>) -> Self {
        Self::with_clock(registry, store, Clock::live())
    }

    pub fn with_clock(
        registry: Rc<MetadataRegistry>,
        store: Rc<dyn EntityStore>,
        clock: Clock,
    ) -> Self {
        Self::with_strategy(registry, Box::new(SimpleStrategy::new(store, clock)))
    }

    pub fn with_strategy(
        registry: Rc<MetadataRegistry>,
        strategy: Box<dyn CreationStrategy>,
    ) -> Self {
        Self {
            registry,
            strategy: RefCell::new(strategy),
        }
    }

    /// Resolve the canonical instance for `data`'s identifying key and
    /// apply every field of `data` onto it, identifying fields included.
    pub fn instantiate(&self, type_name: &str, data: &DataMap) -> Result<EntityRef> {
        self.get(type_name, data, 0)
    }

    /// Assign `data` onto an already-resolved instance.
    pub fn apply_data(&self, entity: &EntityRef, data: &DataMap) -> Result<()> {
        let type_name = entity.borrow().type_name().to_string();
        let meta = self.registry.describe(&type_name)?;
        self.set_data(&meta, entity, data, 0)
    }

    /// Drop all identity-map entries. Call at unit-of-work boundaries.
    pub fn clear_identity_cache(&self) {
        self.strategy.borrow_mut().clear_state();
    }

    fn get(&self, type_name: &str, data: &DataMap, depth: usize) -> Result<EntityRef> {
        let meta = self.registry.describe(type_name)?;
        let key = self.extract_identity(&meta, data, depth)?;
        let resolved = self
            .strategy
            .borrow_mut()
            .create(&meta, key.as_ref(), None)?;
        debug!("resolved {} from {:?}", meta.name(), resolved.source);
        self.set_data(&meta, &resolved.entity, data, depth)?;
        Ok(resolved.entity)
    }

    /// Extract the identifying key from `data`, if every key field is
    /// present. Relation-typed key components are resolved to instances
    /// first and flattened to that instance's own identity scalars; an
    /// unsaved instance contributes NULL, leaving the key unusable.
    fn extract_identity(
        &self,
        meta: &TypeDescriptor,
        data: &DataMap,
        depth: usize,
    ) -> Result<Option<IdentityKey>> {
        let mut components = Vec::new();
        for name in meta.identity_fields() {
            let Some(raw) = data.get(name) else {
                return Ok(None);
            };
            let spec = meta.field(name).ok_or_else(|| HydrateError::UnknownField {
                entity: meta.name().to_string(),
                field: name.clone(),
            })?;
            match &spec.kind {
                FieldKind::Scalar(dt) => {
                    components.push(self.coerce_scalar(meta, spec, raw, dt)?);
                }
                FieldKind::DateTime => {
                    components.push(self.coerce_scalar(meta, spec, raw, &DataType::Timestamp)?);
                }
                FieldKind::Date => {
                    components.push(self.coerce_scalar(meta, spec, raw, &DataType::Date)?);
                }
                FieldKind::ManyToOne { target } => {
                    let related = self.resolve_relation(meta, spec, target, raw, depth)?;
                    match self.identity_of_entity(target, &related)? {
                        Some(key) => components.extend(key.into_components()),
                        None => components.push(Value::Null),
                    }
                }
                FieldKind::OneToMany { .. } => {
                    return Err(HydrateError::Unsupported(format!(
                        "collection field '{}' cannot be part of the identity of '{}'",
                        name,
                        meta.name()
                    )));
                }
            }
        }
        if components.is_empty() {
            Ok(None)
        } else {
            Ok(Some(IdentityKey::new(components)))
        }
    }

    /// Read an already-hydrated instance's own identity scalars. `None`
    /// when any component is unset or NULL (not yet persisted).
    fn identity_of_entity(
        &self,
        type_name: &str,
        entity: &EntityRef,
    ) -> Result<Option<IdentityKey>> {
        let meta = self.registry.describe(type_name)?;
        let entity = entity.borrow();
        let mut components = Vec::new();
        for name in meta.identity_fields() {
            match entity.field(name) {
                Some(FieldValue::Scalar(v)) if !v.is_null() => components.push(v),
                _ => return Ok(None),
            }
        }
        if components.is_empty() {
            Ok(None)
        } else {
            Ok(Some(IdentityKey::new(components)))
        }
    }

    fn set_data(
        &self,
        meta: &TypeDescriptor,
        entity: &EntityRef,
        data: &DataMap,
        depth: usize,
    ) -> Result<()> {
        for (name, raw) in data.iter() {
            let spec = meta.field(name).ok_or_else(|| HydrateError::UnknownField {
                entity: meta.name().to_string(),
                field: name.to_string(),
            })?;

            let value = match &spec.kind {
                FieldKind::Scalar(dt) => {
                    FieldValue::Scalar(self.coerce_scalar(meta, spec, raw, dt)?)
                }
                FieldKind::DateTime => FieldValue::Scalar(self.coerce_scalar(
                    meta,
                    spec,
                    raw,
                    &DataType::Timestamp,
                )?),
                FieldKind::Date => {
                    FieldValue::Scalar(self.coerce_scalar(meta, spec, raw, &DataType::Date)?)
                }
                FieldKind::ManyToOne { target } => {
                    FieldValue::One(self.resolve_relation(meta, spec, target, raw, depth)?)
                }
                FieldKind::OneToMany { target, inverse } => {
                    let elements = match raw {
                        Raw::List(items) => items
                            .iter()
                            .map(|item| self.resolve_relation(meta, spec, target, item, depth))
                            .collect::<Result<Vec<_>>>()?,
                        other => {
                            return Err(HydrateError::CoercionFailed {
                                entity: meta.name().to_string(),
                                field: spec.name.clone(),
                                reason: format!(
                                    "expected a list for a collection field, got {}",
                                    other.kind_name()
                                ),
                            });
                        }
                    };
                    if let Some(inverse) = inverse {
                        let related_meta = self.registry.describe(target)?;
                        for element in &elements {
                            self.assign_field(
                                &related_meta,
                                element,
                                inverse,
                                FieldValue::One(entity.clone()),
                            )?;
                        }
                    }
                    FieldValue::Many(elements)
                }
            };

            self.assign_field(meta, entity, name, value)?;
        }
        Ok(())
    }

    fn assign_field(
        &self,
        meta: &TypeDescriptor,
        entity: &EntityRef,
        name: &str,
        value: FieldValue,
    ) -> Result<()> {
        let spec = meta.field(name).ok_or_else(|| HydrateError::UnknownField {
            entity: meta.name().to_string(),
            field: name.to_string(),
        })?;
        let mut entity = entity.borrow_mut();
        strategy_for(spec.access).assign(&mut *entity, name, value)
    }

    fn coerce_scalar(
        &self,
        meta: &TypeDescriptor,
        spec: &FieldSpec,
        raw: &Raw,
        dt: &DataType,
    ) -> Result<Value> {
        let value = match raw {
            Raw::Value(value) => value.clone(),
            other => {
                return Err(HydrateError::CoercionFailed {
                    entity: meta.name().to_string(),
                    field: spec.name.clone(),
                    reason: format!("expected a scalar, got {}", other.kind_name()),
                });
            }
        };
        dt.coerce(value)
            .map_err(|reason| HydrateError::CoercionFailed {
                entity: meta.name().to_string(),
                field: spec.name.clone(),
                reason,
            })
    }

    /// Resolve a relation-typed raw value to an instance of `target`.
    ///
    /// An instance passes through as-is (after a type check); a nested map
    /// hydrates recursively; a scalar or list is treated as the related
    /// type's identifying key, resolved with no other data.
    fn resolve_relation(
        &self,
        meta: &TypeDescriptor,
        spec: &FieldSpec,
        target: &str,
        raw: &Raw,
        depth: usize,
    ) -> Result<EntityRef> {
        if depth >= MAX_RESOLVE_DEPTH {
            return Err(HydrateError::RelationResolutionFailed {
                entity: meta.name().to_string(),
                field: spec.name.clone(),
                reason: format!("relation chain deeper than {}", MAX_RESOLVE_DEPTH),
            });
        }

        let related_meta = self.registry.describe(target)?;
        match raw {
            Raw::Entity(entity) => {
                let actual = entity.borrow().type_name().to_string();
                if actual != target {
                    return Err(HydrateError::RelationResolutionFailed {
                        entity: meta.name().to_string(),
                        field: spec.name.clone(),
                        reason: format!("expected an instance of '{}', got '{}'", target, actual),
                    });
                }
                Ok(entity.clone())
            }
            Raw::Map(data) => self.get(target, data, depth + 1),
            Raw::Value(_) | Raw::List(_) => {
                let key = self.relation_key(meta, spec, &related_meta, raw)?;
                let resolved = self
                    .strategy
                    .borrow_mut()
                    .create(&related_meta, Some(&key), None)?;
                if resolved.source == Source::Fresh {
                    if !related_meta.implicit_create() {
                        return Err(HydrateError::RelationResolutionFailed {
                            entity: meta.name().to_string(),
                            field: spec.name.clone(),
                            reason: format!(
                                "no '{}' with key [{}] and implicit creation is disabled",
                                target, key
                            ),
                        });
                    }
                    // write the key onto the fresh instance so it reads
                    // back as the entity it stands for
                    let key_data = identity_data(&related_meta, &key);
                    self.set_data(&related_meta, &resolved.entity, &key_data, depth + 1)?;
                }
                Ok(resolved.entity)
            }
        }
    }

    /// Build the related type's identity key from a scalar or a list of
    /// scalars, coercing each component against the declared kind of the
    /// corresponding identity field.
    fn relation_key(
        &self,
        owner: &TypeDescriptor,
        spec: &FieldSpec,
        related: &TypeDescriptor,
        raw: &Raw,
    ) -> Result<IdentityKey> {
        let raws: Vec<&Raw> = match raw {
            Raw::List(items) => items.iter().collect(),
            single => vec![single],
        };
        let id_fields = related.identity_fields();
        if raws.len() != id_fields.len() {
            return Err(HydrateError::RelationResolutionFailed {
                entity: owner.name().to_string(),
                field: spec.name.clone(),
                reason: format!(
                    "key has {} component(s) but the identity of '{}' needs {}",
                    raws.len(),
                    related.name(),
                    id_fields.len()
                ),
            });
        }

        let mut components = Vec::new();
        for (raw, name) in raws.into_iter().zip(id_fields) {
            let id_spec = related.field(name).ok_or_else(|| HydrateError::UnknownField {
                entity: related.name().to_string(),
                field: name.clone(),
            })?;
            let dt = match &id_spec.kind {
                FieldKind::Scalar(dt) => dt.clone(),
                FieldKind::DateTime => DataType::Timestamp,
                FieldKind::Date => DataType::Date,
                _ => {
                    return Err(HydrateError::Unsupported(format!(
                        "relation-typed identity field '{}' of '{}' cannot be keyed by scalar",
                        name,
                        related.name()
                    )));
                }
            };
            components.push(self.coerce_scalar(related, id_spec, raw, &dt)?);
        }
        Ok(IdentityKey::new(components))
    }
}

/// Turn a key back into field data for the identity fields.
fn identity_data(meta: &TypeDescriptor, key: &IdentityKey) -> DataMap {
    meta.identity_fields()
        .iter()
        .zip(key.components())
        .map(|(name, value)| (name.clone(), Raw::Value(value.clone())))
        .collect()
}
