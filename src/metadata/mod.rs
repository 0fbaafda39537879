mod descriptor;

pub use descriptor::{
    AssignMode, Factory, FieldKind, FieldSpec, TypeDescriptor, TypeDescriptorBuilder,
};

use std::collections::HashMap;
use std::rc::Rc;

use crate::core::{HydrateError, Result};

/// Holds the type descriptors known to the instantiator, looked up by
/// qualified type name. Descriptors are registered once at startup and
/// immutable afterwards.
#[derive(Default)]
pub struct MetadataRegistry {
    types: HashMap<String, Rc<TypeDescriptor>>,
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.types
            .insert(descriptor.name().to_string(), Rc::new(descriptor));
    }

    pub fn describe(&self, name: &str) -> Result<Rc<TypeDescriptor>> {
        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| HydrateError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }
}
