use super::{id_of, Engine};
use crate::{db::PoolConnection, Entity, Related, Result};

use linkrow_core::{
    schema::{CascadeOp, ResolvedRelation, UpdatePolicy},
    stmt::Value,
    PersistOp,
};

impl Engine {
    /// Updates the entity's own row, then replaces the associations of each
    /// relation that cascades updates and has a value set.
    ///
    /// `policy` overrides every relation's own [`UpdatePolicy`].
    pub(crate) async fn update(
        &self,
        connection: &mut PoolConnection,
        entity: &mut Entity,
        policy: Option<UpdatePolicy>,
    ) -> Result<()> {
        self.check_related(entity, CascadeOp::Update)?;
        self.update_row(connection, entity, PersistOp::Update, true)
            .await?;

        let model = entity.model().to_string();
        let master_id = self.master_id(entity);

        for relation in self.schema.relations(&model) {
            if !relation.cascades(CascadeOp::Update) {
                continue;
            }

            // An unset relation keeps its current associations
            if entity.related(&relation.field).is_none() {
                continue;
            }

            let master_id = master_id.clone()?;

            match policy.unwrap_or(relation.on_update) {
                UpdatePolicy::UnlinkOnly => {
                    self.unlink_all(connection, relation, &master_id, PersistOp::CascadeUpdate)
                        .await?;
                }
                UpdatePolicy::DeleteRelated => {
                    // Junction rows go with the deleted rows
                    let mut deleted = vec![];
                    for slave in self.find_linked(connection, relation, &master_id).await? {
                        self.delete_row(connection, &slave, PersistOp::CascadeUpdate)
                            .await?;
                        deleted.extend(self.master_id(&slave).ok());
                    }

                    if let Some(related) = entity.related_mut(&relation.field) {
                        self.reinsert_deleted(connection, relation, related, &deleted)
                            .await?;
                    }
                }
            }

            let Some(related) = entity.related_mut(&relation.field) else {
                continue;
            };

            self.link_related(
                connection,
                relation,
                &master_id,
                related,
                PersistOp::CascadeUpdate,
            )
            .await?;
        }

        Ok(())
    }

    /// Writes back the entities of `related` whose rows were just deleted,
    /// under the id they had, so re-linking finds them.
    async fn reinsert_deleted(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        related: &mut Related,
        deleted: &[Value],
    ) -> Result<()> {
        let table = self.table(&relation.target)?;

        for slave in related.iter_mut() {
            if slave.model() != relation.target {
                continue;
            }

            if id_of(table, slave).is_some_and(|id| deleted.contains(id)) {
                self.insert_row(connection, slave, PersistOp::CascadeUpdate)
                    .await?;
            }
        }

        Ok(())
    }

    pub(crate) async fn update_without_cascade(
        &self,
        connection: &mut PoolConnection,
        entity: &mut Entity,
    ) -> Result<()> {
        self.update_row(connection, entity, PersistOp::Update, true)
            .await?;
        Ok(())
    }
}
