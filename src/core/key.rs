use std::fmt;

use crate::core::Value;

/// Composite identifying key: an ordered sequence of scalar values.
///
/// Used directly as a map key, so component values that happen to contain
/// a separator character cannot collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(Vec<Value>);

impl IdentityKey {
    pub fn new(components: Vec<Value>) -> Self {
        Self(components)
    }

    pub fn single(value: impl Into<Value>) -> Self {
        Self(vec![value.into()])
    }

    pub fn components(&self) -> &[Value] {
        &self.0
    }

    pub fn into_components(self) -> Vec<Value> {
        self.0
    }

    /// A key can be used for cache and store lookups only when it is
    /// non-empty and contains no NULL component.
    pub fn is_usable(&self) -> bool {
        !self.0.is_empty() && !self.0.iter().any(Value::is_null)
    }
}

impl From<Vec<Value>> for IdentityKey {
    fn from(components: Vec<Value>) -> Self {
        Self(components)
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", component)?;
        }
        Ok(())
    }
}
