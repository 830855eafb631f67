use crate::{
    engine::{check_columns, id_of, primary_key},
    reconcile, Db, Entity, Error, Result,
};

use linkrow_core::{
    driver::RowCount,
    stmt::{self, Expr, Statement, Value},
    PersistOp,
};

impl Db {
    /// Inserts `entities` in one batch. Relations are not cascaded,
    /// timestamps are not stamped and generated keys are not read back.
    ///
    /// Every entity must belong to the same model.
    pub async fn insert_all(&mut self, entities: &mut [Entity]) -> Result<()> {
        let Some(model) = single_model(entities)? else {
            return Ok(());
        };

        let (shared, connection) = self.split().await?;
        let table = shared.engine.table(&model)?;

        let mut stmts = Vec::with_capacity(entities.len());
        for entity in entities.iter() {
            check_columns(table, entity)?;

            let (columns, values): (Vec<_>, Vec<_>) = entity
                .attrs()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .unzip();
            stmts.push(Statement::from(
                stmt::Insert::new(&table.name, columns).row(values),
            ));
        }

        let counts = shared.engine.exec_batch(connection, stmts).await?;
        check_batch(&model, PersistOp::BatchInsert, &counts)?;

        for entity in entities {
            entity.clear_modified();
        }
        Ok(())
    }

    /// Links `slaves` to `master` through `field`, inserting any slave that
    /// has no id yet. Junction rows are written in one batch.
    pub async fn link_all(&mut self, master: &Entity, field: &str, slaves: &mut [Entity]) -> Result<()> {
        let (shared, connection) = self.split().await?;
        let engine = &shared.engine;

        let relation = engine.schema.relation(master.model(), field)?;
        let master_id = engine.master_id(master)?;
        engine.check_shape(relation, slaves.len())?;

        let mut stmts = Vec::with_capacity(slaves.len());
        for slave in slaves.iter_mut() {
            engine.check_target(relation, slave)?;

            let table = engine.table(slave.model())?;
            if id_of(table, slave).is_none() {
                engine
                    .insert_row(connection, slave, PersistOp::BatchInsert)
                    .await?;
            }

            let junction = &relation.junction;
            let insert = stmt::Insert::new(
                &junction.table,
                vec![junction.master_column.clone(), junction.slave_column.clone()],
            )
            .row(vec![master_id.clone(), engine.master_id(slave)?]);
            stmts.push(Statement::from(insert));
        }

        if stmts.is_empty() {
            return Ok(());
        }

        let counts = engine.exec_batch(connection, stmts).await?;
        check_batch(&relation.target, PersistOp::BatchInsert, &counts)
    }

    /// Deletes `entities` by primary key in one batch. Composite keys are
    /// supported; relations are not cascaded.
    pub async fn delete_all(&mut self, entities: &[Entity]) -> Result<()> {
        let Some(model) = single_model(entities)? else {
            return Ok(());
        };

        let (shared, connection) = self.split().await?;
        let table = shared.engine.table(&model)?;

        let mut stmts = Vec::with_capacity(entities.len());
        for entity in entities {
            let mut delete = stmt::Delete::new(&table.name);
            for (column, value) in primary_key(table, entity, PersistOp::BatchDelete)? {
                delete = delete.filter(Expr::eq(column, value));
            }
            stmts.push(Statement::from(delete));
        }

        let counts = shared.engine.exec_batch(connection, stmts).await?;
        check_batch(&model, PersistOp::BatchDelete, &counts)
    }

    /// Deletes each of `slaves`, then removes their junction rows to
    /// `master` in one batch.
    pub async fn unlink_and_delete_all(
        &mut self,
        master: &Entity,
        field: &str,
        slaves: &[Entity],
    ) -> Result<()> {
        let (shared, connection) = self.split().await?;
        let engine = &shared.engine;

        let relation = engine.schema.relation(master.model(), field)?;
        let master_id = engine.master_id(master)?;
        let junction = &relation.junction;

        let mut stmts = Vec::with_capacity(slaves.len());
        for slave in slaves {
            engine
                .delete_row(connection, slave, PersistOp::BatchDelete)
                .await?;

            let delete = stmt::Delete::new(&junction.table)
                .filter(Expr::eq(&junction.master_column, master_id.clone()))
                .filter(Expr::eq(&junction.slave_column, engine.master_id(slave)?));
            stmts.push(Statement::from(delete));
        }

        if stmts.is_empty() {
            return Ok(());
        }

        // Rows the foreign key cascade already removed report zero and pass
        let counts = engine.exec_batch(connection, stmts).await?;
        check_batch(&relation.target, PersistOp::BatchDelete, &counts)
    }

    /// Makes the entities linked to `master` through `field` exactly
    /// `desired`.
    ///
    /// Desired entities without an id are inserted first. Associations not
    /// in `desired` are unlinked and new ones linked; the related rows
    /// themselves are left in place.
    pub async fn sync_relation(
        &mut self,
        master: &Entity,
        field: &str,
        desired: &mut [Entity],
    ) -> Result<()> {
        let (shared, connection) = self.split().await?;
        let engine = &shared.engine;

        let relation = engine.schema.relation(master.model(), field)?;
        let master_id = engine.master_id(master)?;

        let mut desired_ids = Vec::with_capacity(desired.len());
        for slave in desired.iter_mut() {
            engine.check_target(relation, slave)?;
            engine
                .persist_related(connection, slave, PersistOp::CascadeUpdate)
                .await?;
            desired_ids.push(engine.master_id(slave)?);
        }

        let persisted_ids = engine
            .find_linked(connection, relation, &master_id)
            .await?
            .iter()
            .map(|slave| engine.master_id(slave))
            .collect::<Result<Vec<Value>>>()?;

        let persisted = Some(persisted_ids.as_slice());
        let transient = Some(desired_ids.as_slice());
        let removed = reconcile::to_remove(persisted, transient).unwrap_or_default();
        let added = reconcile::to_add(persisted, transient).unwrap_or_default();

        for slave_id in &removed {
            engine
                .unlink(
                    connection,
                    relation,
                    master_id.clone(),
                    slave_id.clone(),
                    PersistOp::CascadeUpdate,
                )
                .await?;
        }

        for slave_id in &added {
            engine
                .link(
                    connection,
                    relation,
                    master_id.clone(),
                    slave_id.clone(),
                    PersistOp::CascadeUpdate,
                )
                .await?;
        }

        tracing::debug!(
            field,
            removed = removed.len(),
            added = added.len(),
            "synchronized relation"
        );
        Ok(())
    }
}

/// The model shared by every entity, `None` when there are none.
fn single_model(entities: &[Entity]) -> Result<Option<String>> {
    let Some(first) = entities.first() else {
        return Ok(None);
    };

    match entities.iter().find(|entity| entity.model() != first.model()) {
        Some(other) => Err(Error::usage(format!(
            "batch mixes `{}` and `{}` entities",
            first.model(),
            other.model()
        ))),
        None => Ok(Some(first.model().to_string())),
    }
}

/// Fails on the first failed entry. Entries that touched no rows, or whose
/// count the driver could not report, succeed.
fn check_batch(model: &str, op: PersistOp, counts: &[RowCount]) -> Result<()> {
    match counts.iter().position(|count| *count == RowCount::Failed) {
        Some(index) => Err(Error::persistence(
            model,
            op,
            format!("statement {index} of {} failed", counts.len()),
        )),
        None => Ok(()),
    }
}
