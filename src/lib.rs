// ============================================================================
// Hydrator Library
// ============================================================================

//! Identity-map-aware entity hydrator.
//!
//! Builds domain objects from loosely-typed field data while guaranteeing
//! that hydrating the same logical entity (same type + same identifying
//! key) twice within a unit of work yields the *same* instance — whether
//! it was already cached, already persisted, or freshly allocated.
//!
//! Two components cooperate: [`SimpleStrategy`] resolves identity (cache
//! over store over candidate over a fresh blank instance) and owns the
//! identity map; [`EntityInstantiator`] extracts the identifying key from
//! the data, obtains the resolved instance, and assigns every field
//! through whichever mechanism the type declares for it (direct field,
//! mutator method, or catch-all hook).
//!
//! # Examples
//!
//! ```
//! use std::any::Any;
//! use std::rc::Rc;
//!
//! use hydrator::{
//!     DataMap, DataType, DirectFields, Entity, EntityInstantiator, FieldKind, FieldValue,
//!     MemoryStore, MetadataRegistry, TypeDescriptor, Value, entity_ref,
//! };
//!
//! #[derive(Default)]
//! struct Tag {
//!     id: Option<i64>,
//!     label: String,
//! }
//!
//! impl Entity for Tag {
//!     fn type_name(&self) -> &str {
//!         "Tag"
//!     }
//!     fn as_any(&self) -> &dyn Any {
//!         self
//!     }
//!     fn as_any_mut(&mut self) -> &mut dyn Any {
//!         self
//!     }
//!     fn direct_fields(&mut self) -> Option<&mut dyn DirectFields> {
//!         Some(self)
//!     }
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "id" => self.id.map(|id| FieldValue::Scalar(Value::Integer(id))),
//!             "label" => Some(FieldValue::Scalar(Value::Text(self.label.clone()))),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl DirectFields for Tag {
//!     fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
//!         match (name, value) {
//!             ("id", FieldValue::Scalar(v)) => self.id = v.as_i64(),
//!             ("label", FieldValue::Scalar(Value::Text(label))) => self.label = label,
//!             (name, _) => return Err(format!("no writable field '{}'", name)),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> hydrator::Result<()> {
//! let mut registry = MetadataRegistry::new();
//! registry.register(
//!     TypeDescriptor::builder("Tag")
//!         .identity(&["id"])
//!         .field("id", FieldKind::Scalar(DataType::Integer))
//!         .field("label", FieldKind::Scalar(DataType::Text))
//!         .factory(|_| entity_ref(Tag::default()))
//!         .build()?,
//! );
//!
//! let svc = EntityInstantiator::new(Rc::new(registry), Rc::new(MemoryStore::new()));
//!
//! let tag = svc.instantiate("Tag", &DataMap::new().set("id", 1).set("label", "rust"))?;
//! let again = svc.instantiate("Tag", &DataMap::new().set("id", 1))?;
//!
//! // same key, same unit of work: the identical instance
//! assert!(Rc::ptr_eq(&tag, &again));
//! # Ok(())
//! # }
//! ```

pub mod assign;
pub mod clock;
pub mod core;
pub mod creation;
pub mod entity;
pub mod instantiate;
pub mod json;
pub mod metadata;
pub mod storage;

// Re-export main types for convenience
pub use clock::Clock;
pub use crate::core::{DataType, HydrateError, IdentityKey, Result, Value};
pub use creation::{CreationStrategy, Resolved, SimpleStrategy, Source};
pub use entity::{
    AssignInterceptor, DirectFields, Entity, EntityRef, FieldAccessors, FieldValue, entity_ref,
};
pub use instantiate::{DataMap, EntityInstantiator, Raw};
pub use metadata::{
    AssignMode, FieldKind, FieldSpec, MetadataRegistry, TypeDescriptor, TypeDescriptorBuilder,
};
pub use storage::{EntityStore, MemoryStore};
