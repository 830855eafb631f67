use crate::Value;

use indexmap::{IndexMap, IndexSet};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One row of a registered model, as a bag of named attributes.
///
/// Attributes are keyed by column name and keep the order they were first
/// set in; queries built from an entity bind its attributes in that order.
/// Setting an attribute marks it modified, and updates write only modified
/// attributes. Relation-valued fields hold related entities and are never
/// written as columns.
///
/// Two entities are equal when they belong to the same model and hold equal
/// attributes. Modification flags and related entities are not compared.
#[derive(Debug, Clone, Default)]
pub struct Entity {
    model: String,
    attrs: IndexMap<String, Value>,
    modified: IndexSet<String>,
    related: IndexMap<String, Related>,
}

/// The value of a relation-valued field.
#[derive(Debug, Clone, PartialEq)]
pub enum Related {
    One(Box<Entity>),
    Many(Vec<Entity>),
}

impl Entity {
    pub fn new(model: impl Into<String>) -> Entity {
        Entity {
            model: model.into(),
            ..Entity::default()
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sets `name` and returns the entity, for building values inline.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Entity {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        self.modified.insert(name.clone());
        self.attrs.insert(name, value.into());
        self
    }

    /// Sets an attribute without marking it modified, as loaded rows are.
    pub(crate) fn put(&mut self, name: impl Into<String>, value: Value) {
        self.attrs.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.modified.shift_remove(name);
        self.attrs.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Attributes in the order they were first set.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.attrs.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn is_modified(&self, name: &str) -> bool {
        self.modified.contains(name)
    }

    pub fn modified(&self) -> impl Iterator<Item = &str> + '_ {
        self.modified.iter().map(String::as_str)
    }

    pub(crate) fn clear_modified(&mut self) {
        self.modified.clear();
    }

    pub fn with_one(mut self, field: impl Into<String>, entity: Entity) -> Entity {
        self.set_one(field, entity);
        self
    }

    pub fn with_many(mut self, field: impl Into<String>, entities: Vec<Entity>) -> Entity {
        self.set_many(field, entities);
        self
    }

    pub fn set_one(&mut self, field: impl Into<String>, entity: Entity) -> &mut Self {
        self.related
            .insert(field.into(), Related::One(Box::new(entity)));
        self
    }

    pub fn set_many(&mut self, field: impl Into<String>, entities: Vec<Entity>) -> &mut Self {
        self.related.insert(field.into(), Related::Many(entities));
        self
    }

    /// The value of a relation-valued field. `None` means unset, which
    /// cascading operations treat as "leave the association alone".
    pub fn related(&self, field: &str) -> Option<&Related> {
        self.related.get(field)
    }

    pub fn related_mut(&mut self, field: &str) -> Option<&mut Related> {
        self.related.get_mut(field)
    }

    pub fn take_related(&mut self, field: &str) -> Option<Related> {
        self.related.shift_remove(field)
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Entity) -> bool {
        self.model == other.model && self.attrs == other.attrs
    }
}

impl Related {
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        match self {
            Related::One(entity) => std::slice::from_ref(&**entity).iter(),
            Related::Many(entities) => entities.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Entity> {
        match self {
            Related::One(entity) => std::slice::from_mut(&mut **entity).iter_mut(),
            Related::Many(entities) => entities.iter_mut(),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Entity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.attrs.len() + self.related.len()))?;
        for (name, value) in &self.attrs {
            map.serialize_entry(name, value)?;
        }
        for (field, related) in &self.related {
            map.serialize_entry(field, related)?;
        }
        map.end()
    }
}

impl Serialize for Related {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Related::One(entity) => entity.serialize(serializer),
            Related::Many(entities) => entities.serialize(serializer),
        }
    }
}
