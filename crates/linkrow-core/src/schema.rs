mod builder;
pub use builder::{Builder, Resolution};

mod junction;
pub use junction::Junction;

mod model;
pub use model::Model;

mod relation;
pub use relation::{Cascade, CascadeOp, Relation, RelationKind, UpdatePolicy};

mod resolve;
pub use resolve::ResolvedRelation;

mod table;
pub use table::{Column, Table};

use crate::{Error, Result};

use indexmap::IndexMap;

/// Registered models and their resolved relation descriptors.
///
/// Built once by [`Builder::build`] and shared read-only afterwards.
#[derive(Debug, Default)]
pub struct Schema {
    models: IndexMap<String, Model>,

    /// Relations per concrete model, including inherited ones
    relations: IndexMap<String, Vec<ResolvedRelation>>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn model(&self, name: &str) -> Result<&Model> {
        self.models
            .get(name)
            .ok_or_else(|| Error::invalid_schema(format!("model `{name}` is not registered")))
    }

    /// The table descriptor of a concrete model.
    pub fn table(&self, model: &str) -> Result<&Table> {
        self.model(model)?.table.as_ref().ok_or_else(|| {
            Error::invalid_schema(format!("model `{model}` is abstract and has no table"))
        })
    }

    /// All relation descriptors of `model`, own and inherited, transient ones excluded.
    pub fn relations(&self, model: &str) -> &[ResolvedRelation] {
        self.relations
            .get(model)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn relation(&self, model: &str, field: &str) -> Result<&ResolvedRelation> {
        self.relations(model)
            .iter()
            .find(|relation| relation.field == field)
            .ok_or_else(|| {
                Error::invalid_schema(format!("model `{model}` has no relation `{field}`"))
            })
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> + '_ {
        self.models.values()
    }

    /// Every table referenced by a resolved relation's junction, deduplicated.
    pub fn junctions(&self) -> impl Iterator<Item = &Junction> + '_ {
        let mut seen = std::collections::HashSet::new();
        self.relations
            .values()
            .flatten()
            .map(|relation| &relation.junction)
            .filter(move |junction| seen.insert(junction.table.as_str()))
    }
}
