use super::{id_of, Engine};
use crate::{db::PoolConnection, Entity, Error, Related, Result};

use linkrow_core::{
    schema::{CascadeOp, ResolvedRelation},
    stmt::Value,
    PersistOp,
};

impl Engine {
    pub(crate) async fn save(
        &self,
        connection: &mut PoolConnection,
        entity: &mut Entity,
    ) -> Result<()> {
        self.check_related(entity, CascadeOp::Insert)?;
        self.insert_row(connection, entity, PersistOp::Insert)
            .await?;

        let model = entity.model().to_string();
        let master_id = self.master_id(entity);

        for relation in self.schema.relations(&model) {
            if !relation.cascades(CascadeOp::Insert) {
                continue;
            }

            let Some(related) = entity.related_mut(&relation.field) else {
                continue;
            };

            let master_id = master_id.clone()?;
            self.link_related(
                connection,
                relation,
                &master_id,
                related,
                PersistOp::CascadeInsert,
            )
            .await?;
        }

        Ok(())
    }

    /// Persists every entity of `related`, then links each to `master_id`.
    ///
    /// An entity without an id is inserted, one with an id is updated.
    pub(super) async fn link_related(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        master_id: &Value,
        related: &mut Related,
        op: PersistOp,
    ) -> Result<()> {
        for slave in related.iter_mut() {
            self.check_target(relation, slave)?;
            self.persist_related(connection, slave, op).await?;

            let slave_id = self.master_id(slave)?;
            self.link(connection, relation, master_id.clone(), slave_id, op)
                .await?;
        }

        tracing::trace!(
            field = %relation.field,
            count = related.len(),
            ?op,
            "persisted related entities"
        );
        Ok(())
    }

    /// Checks the value of every relation `op` cascades through before
    /// anything is written.
    pub(super) fn check_related(&self, entity: &Entity, op: CascadeOp) -> Result<()> {
        for relation in self.schema.relations(entity.model()) {
            if !relation.cascades(op) {
                continue;
            }

            let Some(related) = entity.related(&relation.field) else {
                continue;
            };

            self.check_shape(relation, related.len())?;
            for slave in related.iter() {
                self.check_target(relation, slave)?;
            }
        }

        Ok(())
    }

    /// A single-valued relation holds at most one entity.
    pub(crate) fn check_shape(&self, relation: &ResolvedRelation, count: usize) -> Result<()> {
        if relation.kind.is_collection() || count <= 1 {
            return Ok(());
        }

        Err(Error::usage(format!(
            "relation `{}` holds a single `{}` entity, found {count}",
            relation.field, relation.target
        )))
    }

    pub(crate) fn check_target(&self, relation: &ResolvedRelation, slave: &Entity) -> Result<()> {
        if slave.model() == relation.target {
            return Ok(());
        }

        Err(Error::usage(format!(
            "relation `{}` holds `{}` entities, found a `{}`",
            relation.field,
            relation.target,
            slave.model()
        )))
    }

    pub(crate) async fn persist_related(
        &self,
        connection: &mut PoolConnection,
        slave: &mut Entity,
        op: PersistOp,
    ) -> Result<()> {
        let table = self.table(slave.model())?;

        if id_of(table, slave).is_none() {
            self.insert_row(connection, slave, op).await
        } else {
            self.update_row(connection, slave, op, false).await?;
            Ok(())
        }
    }
}
