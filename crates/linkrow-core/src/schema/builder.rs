use super::{Junction, Model, RelationKind, ResolvedRelation, Schema};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::collections::HashSet;

/// What to do with a relation whose target cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// Abort building the schema.
    #[default]
    FailClosed,

    /// Log a warning and drop the relation. Operations on the owning model
    /// will then never cascade through it.
    FailOpen,
}

#[derive(Debug, Default)]
pub struct Builder {
    models: Vec<Model>,
    resolution: Resolution,
}

impl Builder {
    pub fn model(&mut self, model: Model) -> &mut Self {
        self.models.push(model);
        self
    }

    pub fn resolution(&mut self, resolution: Resolution) -> &mut Self {
        self.resolution = resolution;
        self
    }

    pub fn build(&self) -> Result<Schema> {
        let mut models = IndexMap::new();

        for model in &self.models {
            if let Some(table) = &model.table {
                for key in &table.primary_key {
                    if !table.has_column(key) {
                        return Err(Error::invalid_schema(format!(
                            "primary key column `{key}` of `{}` is not a column",
                            model.name
                        )));
                    }
                }
            }

            if models.insert(model.name.clone(), model.clone()).is_some() {
                return Err(Error::invalid_schema(format!(
                    "model `{}` registered twice",
                    model.name
                )));
            }
        }

        let mut relations = IndexMap::new();

        for model in models.values() {
            if model.is_abstract() {
                continue;
            }

            let resolved = self.resolve(&models, model)?;
            relations.insert(model.name.clone(), resolved);
        }

        Ok(Schema { models, relations })
    }

    /// Collects the relations of `model` and of every model it extends.
    fn resolve(
        &self,
        models: &IndexMap<String, Model>,
        model: &Model,
    ) -> Result<Vec<ResolvedRelation>> {
        let Some(table) = &model.table else {
            return Ok(vec![]);
        };

        let mut resolved = vec![];
        let mut fields = HashSet::new();
        let mut visited = HashSet::new();
        let mut current = Some(model);

        while let Some(declaring) = current {
            if !visited.insert(declaring.name.as_str()) {
                return Err(Error::invalid_schema(format!(
                    "model `{}` has a cyclic `extends` chain",
                    model.name
                )));
            }

            for relation in &declaring.relations {
                if relation.transient {
                    continue;
                }

                // A descendant's declaration shadows an ancestor's field of the same name
                if !fields.insert(relation.field.as_str()) {
                    continue;
                }

                let path = format!("{}.{}", declaring.name, relation.field);

                if relation.kind == RelationKind::ManyToOne && !relation.cascade.is_empty() {
                    self.unresolved(&path, "many-to-one relations do not cascade")?;
                    continue;
                }

                let Some(target_table) = models
                    .get(&relation.target)
                    .and_then(|target| target.table.as_ref())
                else {
                    self.unresolved(
                        &path,
                        &format!("target model `{}` is unknown or abstract", relation.target),
                    )?;
                    continue;
                };

                if target_table.name == table.name {
                    self.unresolved(&path, "a junction table cannot link a table to itself")?;
                    continue;
                }

                if target_table.id_column().is_none() || table.id_column().is_none() {
                    self.unresolved(&path, "both sides need a single-column primary key")?;
                    continue;
                }

                resolved.push(ResolvedRelation {
                    field: relation.field.clone(),
                    declared_on: declaring.name.clone(),
                    kind: relation.kind,
                    cascade: relation.cascade,
                    on_update: relation.on_update,
                    target: relation.target.clone(),
                    target_table: target_table.name.clone(),
                    junction: Junction::between(&table.name, &target_table.name),
                });
            }

            current = match &declaring.extends {
                Some(parent) => Some(models.get(parent).ok_or_else(|| {
                    Error::invalid_schema(format!(
                        "model `{}` extends unknown model `{parent}`",
                        declaring.name
                    ))
                })?),
                None => None,
            };
        }

        Ok(resolved)
    }

    fn unresolved(&self, path: &str, reason: &str) -> Result<()> {
        match self.resolution {
            Resolution::FailClosed => Err(Error::invalid_schema(format!(
                "relation `{path}`: {reason}"
            ))),
            Resolution::FailOpen => {
                tracing::warn!(relation = path, reason, "skipping unresolved relation");
                Ok(())
            }
        }
    }
}
