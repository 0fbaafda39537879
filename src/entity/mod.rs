use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::core::Value;

/// Shared handle to a hydrated domain object.
///
/// The core is single-threaded (one instantiator per unit of work), so
/// instances are reference-counted without atomics. Reference equality of
/// two `EntityRef`s (`Rc::ptr_eq`) is the identity-map guarantee.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Wrap a concrete entity into a shared handle.
pub fn entity_ref<T: Entity>(entity: T) -> EntityRef {
    Rc::new(RefCell::new(entity))
}

/// Value delivered to an entity by field assignment.
#[derive(Clone)]
pub enum FieldValue {
    Scalar(Value),
    One(EntityRef),
    Many(Vec<EntityRef>),
}

impl FieldValue {
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Self::One(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(v) => f.debug_tuple("Scalar").field(v).finish(),
            Self::One(e) => match e.try_borrow() {
                Ok(e) => write!(f, "One({})", e.type_name()),
                Err(_) => write!(f, "One(<borrowed>)"),
            },
            Self::Many(entities) => write!(f, "Many(len={})", entities.len()),
        }
    }
}

/// A hydratable domain object.
///
/// Entities opt into one or more assignment capabilities; the descriptor's
/// `AssignMode` decides which one is used for each field, so none of the
/// capability accessors is probed at assignment time.
pub trait Entity: Any {
    /// Qualified type name, matching the descriptor registered for it.
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Publicly writable fields, if the type exposes them.
    fn direct_fields(&mut self) -> Option<&mut dyn DirectFields> {
        None
    }

    /// Explicit mutator methods, if the type exposes them.
    fn accessors(&mut self) -> Option<&mut dyn FieldAccessors> {
        None
    }

    /// Catch-all assignment hook, if the type exposes one.
    fn interceptor(&mut self) -> Option<&mut dyn AssignInterceptor> {
        None
    }

    /// Read a field back, if the entity exposes it. Used to extract the
    /// identity of an already-hydrated instance referenced as a key
    /// component.
    fn field(&self, name: &str) -> Option<FieldValue>;
}

impl fmt::Debug for dyn Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.type_name())
    }
}

/// Plain writes into public fields.
pub trait DirectFields {
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), String>;
}

/// Explicit mutator methods; these may normalize values on the way in.
pub trait FieldAccessors {
    fn call_mutator(&mut self, name: &str, value: FieldValue) -> Result<(), String>;
}

/// Catch-all assignment hook.
pub trait AssignInterceptor {
    fn intercept(&mut self, name: &str, value: FieldValue) -> Result<(), String>;
}
