#![allow(dead_code)]

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use hydrator::{
    AssignInterceptor, AssignMode, Clock, DataType, DirectFields, Entity, EntityInstantiator,
    EntityRef, EntityStore, FieldAccessors, FieldKind, FieldValue, HydrateError, IdentityKey,
    MemoryStore, MetadataRegistry, TypeDescriptor, Value, entity_ref,
};

pub const NOW: &str = "2019-05-15 15:00:00";

pub fn now() -> DateTime<Utc> {
    NaiveDateTime::parse_from_str(NOW, "%Y-%m-%d %H:%M:%S")
        .unwrap()
        .and_utc()
}

pub fn frozen_clock() -> Clock {
    Clock::frozen(now())
}

/// Instantiator over a fresh in-memory store, clock frozen at `NOW`.
pub fn service() -> (EntityInstantiator, Rc<MemoryStore>) {
    let store = Rc::new(MemoryStore::new());
    let svc = EntityInstantiator::with_clock(registry(), store.clone(), frozen_clock());
    (svc, store)
}

/// Store whose every lookup fails, for error-propagation tests.
pub struct FailingStore;

impl EntityStore for FailingStore {
    fn find_one_by_key(
        &self,
        _type_name: &str,
        _key: &IdentityKey,
    ) -> hydrator::Result<Option<EntityRef>> {
        Err(HydrateError::StorageLookupFailed("connection refused".into()))
    }
}

// ----------------------------------------------------------------------------
// Shape demos: one entity per assignment mechanism
// ----------------------------------------------------------------------------

/// Directly settable public fields.
#[derive(Default)]
pub struct PublicProps {
    pub id: Option<i64>,
    pub title: Option<String>,
}

impl Entity for PublicProps {
    fn type_name(&self) -> &str {
        "PublicProps"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn direct_fields(&mut self) -> Option<&mut dyn DirectFields> {
        Some(self)
    }
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|v| FieldValue::Scalar(Value::Integer(v))),
            "title" => self
                .title
                .clone()
                .map(|v| FieldValue::Scalar(Value::Text(v))),
            _ => None,
        }
    }
}

impl DirectFields for PublicProps {
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            ("id", FieldValue::Scalar(v)) => self.id = v.as_i64(),
            ("title", FieldValue::Scalar(Value::Text(s))) => self.title = Some(s),
            ("title", FieldValue::Scalar(Value::Null)) => self.title = None,
            (name, _) => return Err(format!("no writable field '{}'", name)),
        }
        Ok(())
    }
}

/// Paired accessor/mutator methods.
#[derive(Default)]
pub struct GetSetProps {
    id: Option<i64>,
    title: Option<String>,
}

impl GetSetProps {
    pub fn id(&self) -> Option<i64> {
        self.id
    }
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }
    pub fn set_title(&mut self, title: String) {
        self.title = Some(title);
    }
}

impl Entity for GetSetProps {
    fn type_name(&self) -> &str {
        "GetSetProps"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn accessors(&mut self) -> Option<&mut dyn FieldAccessors> {
        Some(self)
    }
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|v| FieldValue::Scalar(Value::Integer(v))),
            "title" => self
                .title
                .clone()
                .map(|v| FieldValue::Scalar(Value::Text(v))),
            _ => None,
        }
    }
}

impl FieldAccessors for GetSetProps {
    fn call_mutator(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            ("id", FieldValue::Scalar(v)) => self.id = v.as_i64(),
            ("title", FieldValue::Scalar(Value::Text(s))) => self.set_title(s),
            (name, _) => return Err(format!("no mutator for '{}'", name)),
        }
        Ok(())
    }
}

/// Catch-all assignment hook; values land in an internal map.
#[derive(Default)]
pub struct MagicProps {
    values: HashMap<String, Value>,
}

impl MagicProps {
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

impl Entity for MagicProps {
    fn type_name(&self) -> &str {
        "MagicProps"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn interceptor(&mut self) -> Option<&mut dyn AssignInterceptor> {
        Some(self)
    }
    fn field(&self, name: &str) -> Option<FieldValue> {
        self.values.get(name).cloned().map(FieldValue::Scalar)
    }
}

impl AssignInterceptor for MagicProps {
    fn intercept(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match value {
            FieldValue::Scalar(v) => {
                self.values.insert(name.to_string(), v);
                Ok(())
            }
            _ => Err("only scalar values are intercepted".into()),
        }
    }
}

// ----------------------------------------------------------------------------
// Library domain: Author 1--N Book, plus a Publisher that may not be
// created implicitly
// ----------------------------------------------------------------------------

#[derive(Default)]
pub struct Author {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub books: Vec<EntityRef>,
}

impl Entity for Author {
    fn type_name(&self) -> &str {
        "Author"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn direct_fields(&mut self) -> Option<&mut dyn DirectFields> {
        Some(self)
    }
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|v| FieldValue::Scalar(Value::Integer(v))),
            "title" => self
                .title
                .clone()
                .map(|v| FieldValue::Scalar(Value::Text(v))),
            "books" => Some(FieldValue::Many(self.books.clone())),
            _ => None,
        }
    }
}

impl DirectFields for Author {
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            ("id", FieldValue::Scalar(v)) => self.id = v.as_i64(),
            ("title", FieldValue::Scalar(Value::Text(s))) => self.title = Some(s),
            ("books", FieldValue::Many(books)) => self.books = books,
            (name, _) => return Err(format!("no writable field '{}'", name)),
        }
        Ok(())
    }
}

pub struct Book {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub author: Option<EntityRef>,
    pub publisher: Option<EntityRef>,
    pub created_at: DateTime<Utc>,
    pub written_at: Option<NaiveDate>,
}

impl Book {
    pub fn blank(clock: &Clock) -> Self {
        Self {
            id: None,
            title: None,
            description: None,
            author: None,
            publisher: None,
            created_at: clock.now(),
            written_at: None,
        }
    }
}

impl Entity for Book {
    fn type_name(&self) -> &str {
        "Book"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn direct_fields(&mut self) -> Option<&mut dyn DirectFields> {
        Some(self)
    }
    fn accessors(&mut self) -> Option<&mut dyn FieldAccessors> {
        Some(self)
    }
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|v| FieldValue::Scalar(Value::Integer(v))),
            "title" => self
                .title
                .clone()
                .map(|v| FieldValue::Scalar(Value::Text(v))),
            "created_at" => Some(FieldValue::Scalar(Value::Timestamp(self.created_at))),
            "written_at" => self
                .written_at
                .map(|d| FieldValue::Scalar(Value::Date(d))),
            "author" => self.author.clone().map(FieldValue::One),
            "publisher" => self.publisher.clone().map(FieldValue::One),
            _ => None,
        }
    }
}

impl DirectFields for Book {
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            ("id", FieldValue::Scalar(v)) => self.id = v.as_i64(),
            ("title", FieldValue::Scalar(Value::Text(s))) => self.title = Some(s),
            ("created_at", FieldValue::Scalar(Value::Timestamp(t))) => self.created_at = t,
            ("written_at", FieldValue::Scalar(Value::Date(d))) => self.written_at = Some(d),
            ("written_at", FieldValue::Scalar(Value::Null)) => self.written_at = None,
            ("author", FieldValue::One(e)) => self.author = Some(e),
            ("publisher", FieldValue::One(e)) => self.publisher = Some(e),
            (name, _) => return Err(format!("no writable field '{}'", name)),
        }
        Ok(())
    }
}

impl FieldAccessors for Book {
    fn call_mutator(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            // the mutator normalizes: stored description is uppercased
            ("description_text", FieldValue::Scalar(Value::Text(s))) => {
                self.description = Some(s.to_uppercase());
            }
            (name, _) => return Err(format!("no mutator for '{}'", name)),
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct Publisher {
    pub id: Option<i64>,
    pub title: Option<String>,
}

impl Entity for Publisher {
    fn type_name(&self) -> &str {
        "Publisher"
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn direct_fields(&mut self) -> Option<&mut dyn DirectFields> {
        Some(self)
    }
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => self.id.map(|v| FieldValue::Scalar(Value::Integer(v))),
            "title" => self
                .title
                .clone()
                .map(|v| FieldValue::Scalar(Value::Text(v))),
            _ => None,
        }
    }
}

impl DirectFields for Publisher {
    fn write_field(&mut self, name: &str, value: FieldValue) -> Result<(), String> {
        match (name, value) {
            ("id", FieldValue::Scalar(v)) => self.id = v.as_i64(),
            ("title", FieldValue::Scalar(Value::Text(s))) => self.title = Some(s),
            (name, _) => return Err(format!("no writable field '{}'", name)),
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Metadata
// ----------------------------------------------------------------------------

pub fn registry() -> Rc<MetadataRegistry> {
    let mut registry = MetadataRegistry::new();

    registry.register(
        TypeDescriptor::builder("PublicProps")
            .identity(&["id"])
            .field("id", FieldKind::Scalar(DataType::Integer))
            .field("title", FieldKind::Scalar(DataType::Text))
            .factory(|_| entity_ref(PublicProps::default()))
            .build()
            .unwrap(),
    );

    registry.register(
        TypeDescriptor::builder("GetSetProps")
            .identity(&["id"])
            .field("id", FieldKind::Scalar(DataType::Integer))
            .field("title", FieldKind::Scalar(DataType::Text))
            .accessors()
            .factory(|_| entity_ref(GetSetProps::default()))
            .build()
            .unwrap(),
    );

    registry.register(
        TypeDescriptor::builder("MagicProps")
            .identity(&["id"])
            .field("id", FieldKind::Scalar(DataType::Integer))
            .field("title", FieldKind::Scalar(DataType::Text))
            .interceptor()
            .factory(|_| entity_ref(MagicProps::default()))
            .build()
            .unwrap(),
    );

    registry.register(
        TypeDescriptor::builder("Author")
            .identity(&["id"])
            .field("id", FieldKind::Scalar(DataType::Integer))
            .field("title", FieldKind::Scalar(DataType::Text))
            .field(
                "books",
                FieldKind::OneToMany {
                    target: "Book".into(),
                    inverse: Some("author".into()),
                },
            )
            .factory(|_| entity_ref(Author::default()))
            .build()
            .unwrap(),
    );

    registry.register(
        TypeDescriptor::builder("Book")
            .identity(&["id"])
            .field("id", FieldKind::Scalar(DataType::Integer))
            .field("title", FieldKind::Scalar(DataType::Text))
            .field_access(
                "description_text",
                FieldKind::Scalar(DataType::Text),
                AssignMode::Accessor,
            )
            .field("created_at", FieldKind::DateTime)
            .field("written_at", FieldKind::Date)
            .field(
                "author",
                FieldKind::ManyToOne {
                    target: "Author".into(),
                },
            )
            .field(
                "publisher",
                FieldKind::ManyToOne {
                    target: "Publisher".into(),
                },
            )
            .factory(|clock| entity_ref(Book::blank(clock)))
            .build()
            .unwrap(),
    );

    registry.register(
        TypeDescriptor::builder("Publisher")
            .identity(&["id"])
            .field("id", FieldKind::Scalar(DataType::Integer))
            .field("title", FieldKind::Scalar(DataType::Text))
            .no_implicit_create()
            .factory(|_| entity_ref(Publisher::default()))
            .build()
            .unwrap(),
    );

    Rc::new(registry)
}
