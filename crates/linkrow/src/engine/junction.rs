use super::{column_types, decode, select_all, Engine};
use crate::{db::PoolConnection, Entity, Error, Result};

use linkrow_core::{
    driver::RowCount,
    schema::ResolvedRelation,
    stmt::{self, ColumnRef, Expr, Type, Value},
    PersistOp,
};

// Aliases of the joined tables when fetching linked entities
const SLAVE: &str = "a";
const LINK: &str = "b";

impl Engine {
    /// Writes the junction row pairing `master_id` with `slave_id`.
    pub(crate) async fn link(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        master_id: Value,
        slave_id: Value,
        op: PersistOp,
    ) -> Result<()> {
        let junction = &relation.junction;
        let insert = stmt::Insert::new(
            &junction.table,
            vec![junction.master_column.clone(), junction.slave_column.clone()],
        )
        .row(vec![master_id, slave_id]);

        let count = self.exec_count(connection, insert).await.map_err(|err| {
            err.context(Error::persistence(
                &relation.target,
                op,
                format!("insert into `{}` failed", junction.table),
            ))
        })?;

        if !count.is_effective() {
            return Err(Error::persistence(
                &relation.target,
                op,
                format!("insert into `{}` affected no rows", junction.table),
            ));
        }

        tracing::trace!(junction = %junction.table, ?op, "linked");
        Ok(())
    }

    /// Removes every junction row of `master_id` for this relation.
    ///
    /// When count verification is on, the rows are counted first and a
    /// delete that removes a different number of rows fails.
    pub(crate) async fn unlink_all(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        master_id: &Value,
        op: PersistOp,
    ) -> Result<()> {
        let junction = &relation.junction;

        let expected = if self.config.verify_unlink_count {
            Some(self.count_links(connection, relation, master_id).await?)
        } else {
            None
        };

        let delete = stmt::Delete::new(&junction.table)
            .filter(Expr::eq(&junction.master_column, master_id.clone()));
        let count = self.exec_count(connection, delete).await.map_err(|err| {
            err.context(Error::persistence(
                &relation.target,
                op,
                format!("delete from `{}` failed", junction.table),
            ))
        })?;

        match (expected, count) {
            (_, RowCount::Failed) => Err(Error::persistence(
                &relation.target,
                op,
                format!("delete from `{}` failed", junction.table),
            )),
            (Some(expected), RowCount::Affected(actual)) if expected != actual => {
                Err(Error::persistence(
                    &relation.target,
                    op,
                    format!(
                        "expected to remove {expected} rows from `{}`, removed {actual}",
                        junction.table
                    ),
                ))
            }
            _ => {
                tracing::trace!(junction = %junction.table, ?count, "unlinked all");
                Ok(())
            }
        }
    }

    /// Removes the junction rows pairing `master_id` with `slave_id`.
    pub(crate) async fn unlink(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        master_id: Value,
        slave_id: Value,
        op: PersistOp,
    ) -> Result<()> {
        let junction = &relation.junction;
        let delete = stmt::Delete::new(&junction.table)
            .filter(Expr::eq(&junction.master_column, master_id))
            .filter(Expr::eq(&junction.slave_column, slave_id));

        let count = self.exec_count(connection, delete).await.map_err(|err| {
            err.context(Error::persistence(
                &relation.target,
                op,
                format!("delete from `{}` failed", junction.table),
            ))
        })?;

        if count == RowCount::Failed {
            return Err(Error::persistence(
                &relation.target,
                op,
                format!("delete from `{}` failed", junction.table),
            ));
        }

        Ok(())
    }

    async fn count_links(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        master_id: &Value,
    ) -> Result<u64> {
        let junction = &relation.junction;
        let select = stmt::Select::count(&junction.table)
            .filter(Expr::eq(&junction.master_column, master_id.clone()));

        let rows = self.exec_query(connection, select, vec![Type::I64]).await?;
        let count = rows
            .first()
            .and_then(|row| row.first())
            .and_then(Value::as_i64)
            .and_then(|count| u64::try_from(count).ok());

        count.ok_or_else(|| {
            linkrow_core::err!("count of `{}` rows returned no number", junction.table)
        })
    }

    /// The entities currently linked to `master_id` through `relation`,
    /// read by joining the target table with the junction table.
    pub(crate) async fn find_linked(
        &self,
        connection: &mut PoolConnection,
        relation: &ResolvedRelation,
        master_id: &Value,
    ) -> Result<Vec<Entity>> {
        let table = self.table(&relation.target)?;
        let junction = &relation.junction;

        let Some(id) = table.id_column() else {
            return Err(Error::invalid_schema(format!(
                "`{}` has no single-column primary key",
                relation.target
            )));
        };

        let select = select_all(table, Some(SLAVE))
            .left_join(
                &junction.table,
                LINK,
                Expr::ColumnEq(
                    ColumnRef::qualified(SLAVE, id),
                    ColumnRef::qualified(LINK, &junction.slave_column),
                ),
            )
            .filter(Expr::Eq(
                ColumnRef::qualified(LINK, &junction.master_column),
                master_id.clone(),
            ));

        let rows = self
            .exec_query(connection, select, column_types(table))
            .await?;

        Ok(rows
            .into_iter()
            .map(|record| decode(&relation.target, table.columns.keys(), record))
            .collect())
    }
}
