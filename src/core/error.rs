use thiserror::Error;

#[derive(Error, Debug)]
pub enum HydrateError {
    #[error("Storage lookup failed: {0}")]
    StorageLookupFailed(String),

    #[error("Type '{0}' is not described by the metadata registry")]
    UnknownType(String),

    #[error("Field '{field}' is not declared on type '{entity}'")]
    UnknownField { entity: String, field: String },

    #[error("Cannot coerce value for field '{field}' on type '{entity}': {reason}")]
    CoercionFailed {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("Relation '{field}' on type '{entity}' could not be resolved: {reason}")]
    RelationResolutionFailed {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("Unsupported operation: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, HydrateError>;
