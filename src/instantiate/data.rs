use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};

use crate::core::Value;
use crate::entity::EntityRef;

/// Caller-supplied raw value for one field.
#[derive(Clone)]
pub enum Raw {
    /// Scalar or string-encoded date.
    Value(Value),
    /// Already-hydrated instance of the related type.
    Entity(EntityRef),
    /// Nested data for a relation, hydrated recursively.
    Map(DataMap),
    /// Ordered elements of a to-many relation, or the components of a
    /// composite relation key.
    List(Vec<Raw>),
}

impl Raw {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Value(_) => "a scalar",
            Self::Entity(_) => "an entity",
            Self::Map(_) => "a data map",
            Self::List(_) => "a list",
        }
    }

    pub fn null() -> Self {
        Self::Value(Value::Null)
    }
}

impl fmt::Debug for Raw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Entity(e) => match e.try_borrow() {
                Ok(e) => write!(f, "Entity({})", e.type_name()),
                Err(_) => write!(f, "Entity(<borrowed>)"),
            },
            Self::Map(m) => f.debug_tuple("Map").field(m).finish(),
            Self::List(items) => f.debug_list().entries(items).finish(),
        }
    }
}

impl From<Value> for Raw {
    fn from(v: Value) -> Self {
        Self::Value(v)
    }
}

impl From<i64> for Raw {
    fn from(i: i64) -> Self {
        Self::Value(Value::Integer(i))
    }
}

impl From<i32> for Raw {
    fn from(i: i32) -> Self {
        Self::Value(Value::Integer(i64::from(i)))
    }
}

impl From<f64> for Raw {
    fn from(f: f64) -> Self {
        Self::Value(Value::Float(f))
    }
}

impl From<&str> for Raw {
    fn from(s: &str) -> Self {
        Self::Value(Value::Text(s.to_string()))
    }
}

impl From<String> for Raw {
    fn from(s: String) -> Self {
        Self::Value(Value::Text(s))
    }
}

impl From<bool> for Raw {
    fn from(b: bool) -> Self {
        Self::Value(Value::Boolean(b))
    }
}

impl From<DateTime<Utc>> for Raw {
    fn from(t: DateTime<Utc>) -> Self {
        Self::Value(Value::Timestamp(t))
    }
}

impl From<NaiveDate> for Raw {
    fn from(d: NaiveDate) -> Self {
        Self::Value(Value::Date(d))
    }
}

impl From<EntityRef> for Raw {
    fn from(e: EntityRef) -> Self {
        Self::Entity(e)
    }
}

impl From<DataMap> for Raw {
    fn from(m: DataMap) -> Self {
        Self::Map(m)
    }
}

impl From<Vec<Raw>> for Raw {
    fn from(items: Vec<Raw>) -> Self {
        Self::List(items)
    }
}

/// Insertion-ordered field data.
///
/// Assignment follows this order, so a failure partway through leaves
/// every earlier field already applied (no rollback).
#[derive(Debug, Clone, Default)]
pub struct DataMap {
    entries: Vec<(String, Raw)>,
}

impl DataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<Raw>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert a field; a repeated name replaces the value in place,
    /// keeping the original position.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Raw>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Raw> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Raw)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Raw)> for DataMap {
    fn from_iter<I: IntoIterator<Item = (String, Raw)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}
