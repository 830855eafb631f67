use super::{primary_key, Engine};
use crate::{db::PoolConnection, Entity, Error, Result};

use linkrow_core::{schema::CascadeOp, stmt::Value, PersistOp};

impl Engine {
    /// Deletes the linked entities of every relation that cascades deletes,
    /// then the entity's own row.
    ///
    /// Junction rows are not deleted here: the foreign keys of the junction
    /// tables remove them along with the rows they reference.
    pub(crate) async fn delete(&self, connection: &mut PoolConnection, entity: &Entity) -> Result<()> {
        let model = entity.model();
        let table = self.table(model)?;
        let key = primary_key(table, entity, PersistOp::Delete)?;

        if let Some(id) = table.id_column() {
            if let Some((_, master_id)) = key.iter().find(|(column, _)| column == id) {
                self.delete_related(connection, model, master_id).await?;
            }
        }

        self.delete_key(connection, model, table, key, PersistOp::Delete)
            .await
    }

    pub(crate) async fn delete_by_id(
        &self,
        connection: &mut PoolConnection,
        model: &str,
        id: Value,
    ) -> Result<()> {
        let table = self.table(model)?;
        let Some(id_column) = table.id_column() else {
            return Err(Error::usage(format!(
                "`{model}` has a composite primary key; delete it by entity"
            )));
        };

        self.delete_related(connection, model, &id).await?;

        let key = vec![(id_column.to_string(), id)];
        self.delete_key(connection, model, table, key, PersistOp::Delete)
            .await
    }

    async fn delete_related(
        &self,
        connection: &mut PoolConnection,
        model: &str,
        master_id: &Value,
    ) -> Result<()> {
        for relation in self.schema.relations(model) {
            if !relation.cascades(CascadeOp::Delete) {
                continue;
            }

            let mut deleted: Vec<Value> = vec![];

            for slave in self.find_linked(connection, relation, master_id).await? {
                let slave_id = self.master_id(&slave)?;

                // A slave linked more than once comes back once per link
                if deleted.contains(&slave_id) {
                    continue;
                }

                self.delete_row(connection, &slave, PersistOp::CascadeDelete)
                    .await?;
                deleted.push(slave_id);
            }

            tracing::trace!(
                field = %relation.field,
                count = deleted.len(),
                "deleted related entities"
            );
        }

        Ok(())
    }
}
