use super::{Relation, Table};

/// Declaration of an entity type.
///
/// A concrete model maps to a table. An abstract model has no table and only
/// contributes relation declarations to the models that extend it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub table: Option<Table>,

    /// Model whose relations this model inherits
    pub extends: Option<String>,

    /// Relations declared directly on this model
    pub relations: Vec<Relation>,
}

impl Model {
    pub fn new(name: impl Into<String>, table: Table) -> Model {
        Model {
            name: name.into(),
            table: Some(table),
            extends: None,
            relations: vec![],
        }
    }

    pub fn new_abstract(name: impl Into<String>) -> Model {
        Model {
            name: name.into(),
            table: None,
            extends: None,
            relations: vec![],
        }
    }

    pub fn extends(mut self, parent: impl Into<String>) -> Model {
        self.extends = Some(parent.into());
        self
    }

    pub fn relation(mut self, relation: Relation) -> Model {
        self.relations.push(relation);
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.table.is_none()
    }
}
