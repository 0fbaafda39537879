use std::fmt;

use crate::clock::Clock;
use crate::core::{DataType, HydrateError, Result};
use crate::entity::EntityRef;

/// How values reach a field: explicit mutator method, catch-all
/// interception hook, or plain field write. Resolved once per (type,
/// field) when the descriptor is built, never probed at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignMode {
    Direct,
    Accessor,
    Intercept,
}

/// Declared kind of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(DataType),
    DateTime,
    Date,
    ManyToOne {
        target: String,
    },
    OneToMany {
        target: String,
        /// Field on the element type wired back to the owner, for
        /// bidirectional relations.
        inverse: Option<String>,
    },
}

impl FieldKind {
    pub fn related_type(&self) -> Option<&str> {
        match self {
            Self::ManyToOne { target } | Self::OneToMany { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        self.related_type().is_some()
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub kind: FieldKind,
    pub access: AssignMode,
}

pub type Factory = Box<dyn Fn(&Clock) -> EntityRef>;

/// Immutable description of a domain type: qualified name, identifying key
/// fields, declared fields and a blank-instance factory.
///
/// The factory receives the active clock so "now" defaults on fresh
/// instances are deterministic under a frozen clock.
pub struct TypeDescriptor {
    name: String,
    identity: Vec<String>,
    fields: Vec<FieldSpec>,
    factory: Factory,
    implicit_create: bool,
}

impl TypeDescriptor {
    pub fn builder(name: impl Into<String>) -> TypeDescriptorBuilder {
        TypeDescriptorBuilder {
            name: name.into(),
            identity: Vec::new(),
            fields: Vec::new(),
            factory: None,
            has_accessors: false,
            has_interceptor: false,
            implicit_create: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity_fields(&self) -> &[String] {
        &self.identity
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Allocate a blank instance without running caller-visible
    /// initialization logic.
    pub fn allocate_blank(&self, clock: &Clock) -> EntityRef {
        (self.factory)(clock)
    }

    /// Whether resolving a relation key that matches no stored entity may
    /// allocate a blank instance. `false` turns such a miss into a
    /// `RelationResolutionFailed`.
    pub fn implicit_create(&self) -> bool {
        self.implicit_create
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("identity", &self.identity)
            .field("fields", &self.fields)
            .field("implicit_create", &self.implicit_create)
            .finish_non_exhaustive()
    }
}

pub struct TypeDescriptorBuilder {
    name: String,
    identity: Vec<String>,
    fields: Vec<(String, FieldKind, Option<AssignMode>)>,
    factory: Option<Factory>,
    has_accessors: bool,
    has_interceptor: bool,
    implicit_create: bool,
}

impl TypeDescriptorBuilder {
    /// Name the identifying key field(s), in key order.
    pub fn identity(mut self, fields: &[&str]) -> Self {
        self.identity = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Declare a field using the type's default access mode.
    pub fn field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.push((name.into(), kind, None));
        self
    }

    /// Declare a field with an explicit access mode override.
    pub fn field_access(
        mut self,
        name: impl Into<String>,
        kind: FieldKind,
        access: AssignMode,
    ) -> Self {
        self.fields.push((name.into(), kind, Some(access)));
        self
    }

    /// The type exposes explicit mutator methods.
    pub fn accessors(mut self) -> Self {
        self.has_accessors = true;
        self
    }

    /// The type exposes a catch-all assignment hook.
    pub fn interceptor(mut self) -> Self {
        self.has_interceptor = true;
        self
    }

    /// Forbid allocating blank instances when a relation key misses the
    /// store.
    pub fn no_implicit_create(mut self) -> Self {
        self.implicit_create = false;
        self
    }

    pub fn factory(mut self, factory: impl Fn(&Clock) -> EntityRef + 'static) -> Self {
        self.factory = Some(Box::new(factory));
        self
    }

    pub fn build(self) -> Result<TypeDescriptor> {
        let factory = self.factory.ok_or_else(|| {
            HydrateError::Unsupported(format!(
                "type '{}' has no blank-instance factory",
                self.name
            ))
        })?;

        // Most specific mechanism wins: mutators over interception over
        // direct field writes.
        let default_access = if self.has_accessors {
            AssignMode::Accessor
        } else if self.has_interceptor {
            AssignMode::Intercept
        } else {
            AssignMode::Direct
        };

        let fields: Vec<FieldSpec> = self
            .fields
            .into_iter()
            .map(|(name, kind, access)| FieldSpec {
                name,
                kind,
                access: access.unwrap_or(default_access),
            })
            .collect();

        for name in &self.identity {
            if !fields.iter().any(|f| &f.name == name) {
                return Err(HydrateError::Unsupported(format!(
                    "identity field '{}' is not declared on '{}'",
                    name, self.name
                )));
            }
        }

        Ok(TypeDescriptor {
            name: self.name,
            identity: self.identity,
            fields,
            factory,
            implicit_create: self.implicit_create,
        })
    }
}
