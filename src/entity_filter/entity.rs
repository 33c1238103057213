/// In-memory entity representation
///
/// A loose, schema-less view of one catalog entity: named property values
/// (possibly nested) plus the dynamic attribute collection. Built by the
/// caller from whatever storage row or message it holds; the evaluator
/// never touches storage itself.
use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// One property value of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Text(String),
    Integer(i64),
    Double(f64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    /// Nested structured value, addressed by further path segments.
    Complex(HashMap<String, PropertyValue>),
    Collection(Vec<PropertyValue>),
}

impl PropertyValue {
    pub fn text(value: impl Into<String>) -> PropertyValue {
        PropertyValue::Text(value.into())
    }

    pub fn complex<I>(fields: I) -> PropertyValue
    where
        I: IntoIterator<Item = (String, PropertyValue)>,
    {
        PropertyValue::Complex(fields.into_iter().collect())
    }
}

/// One entry of the dynamic attribute collection.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAttribute {
    pub name: String,
    pub value: PropertyValue,
}

/// An entity to evaluate a filter against.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    pub properties: HashMap<String, PropertyValue>,
    pub attributes: Vec<EntityAttribute>,
}

impl Entity {
    pub fn new() -> Entity {
        Entity::default()
    }

    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Entity {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: PropertyValue) -> Entity {
        self.attributes.push(EntityAttribute {
            name: name.into(),
            value,
        });
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}
