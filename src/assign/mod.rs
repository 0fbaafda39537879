use crate::core::{HydrateError, Result};
use crate::entity::{Entity, FieldValue};
use crate::metadata::AssignMode;

/// One way of pushing a value into an entity field. The concrete strategy
/// for a field is fixed by its `AssignMode` in the type descriptor.
pub trait AssignStrategy {
    fn assign(&self, entity: &mut dyn Entity, field: &str, value: FieldValue) -> Result<()>;
}

/// Plain write into a public field.
pub struct DirectWrite;

/// Call through an explicit mutator method.
pub struct AccessorCall;

/// Route through the entity's catch-all assignment hook.
pub struct InterceptHook;

pub fn strategy_for(mode: AssignMode) -> &'static dyn AssignStrategy {
    match mode {
        AssignMode::Direct => &DirectWrite,
        AssignMode::Accessor => &AccessorCall,
        AssignMode::Intercept => &InterceptHook,
    }
}

fn rejection(entity: &str, field: &str, reason: String) -> HydrateError {
    HydrateError::CoercionFailed {
        entity: entity.to_string(),
        field: field.to_string(),
        reason,
    }
}

impl AssignStrategy for DirectWrite {
    fn assign(&self, entity: &mut dyn Entity, field: &str, value: FieldValue) -> Result<()> {
        let type_name = entity.type_name().to_string();
        let target = entity.direct_fields().ok_or_else(|| {
            HydrateError::Unsupported(format!(
                "type '{}' declares direct access but exposes no writable fields",
                type_name
            ))
        })?;
        target
            .write_field(field, value)
            .map_err(|reason| rejection(&type_name, field, reason))
    }
}

impl AssignStrategy for AccessorCall {
    fn assign(&self, entity: &mut dyn Entity, field: &str, value: FieldValue) -> Result<()> {
        let type_name = entity.type_name().to_string();
        let target = entity.accessors().ok_or_else(|| {
            HydrateError::Unsupported(format!(
                "type '{}' declares accessor access but exposes no mutators",
                type_name
            ))
        })?;
        target
            .call_mutator(field, value)
            .map_err(|reason| rejection(&type_name, field, reason))
    }
}

impl AssignStrategy for InterceptHook {
    fn assign(&self, entity: &mut dyn Entity, field: &str, value: FieldValue) -> Result<()> {
        let type_name = entity.type_name().to_string();
        let target = entity.interceptor().ok_or_else(|| {
            HydrateError::Unsupported(format!(
                "type '{}' declares intercepted access but exposes no hook",
                type_name
            ))
        })?;
        target
            .intercept(field, value)
            .map_err(|reason| rejection(&type_name, field, reason))
    }
}
