mod delete;
mod insert;
mod junction;
mod update;

use crate::{
    db::{Config, PoolConnection},
    Entity, Error, Result,
};

use linkrow_core::{
    driver::{
        operation::{Batch, QuerySql},
        Capability, Operation, Response, RowCount,
    },
    schema::{Schema, Table},
    stmt::{self, ColumnRef, Expr, Select, Statement, Type, Value, ValueRecord},
    PersistOp,
};

use std::sync::Arc;

/// Runs entity operations as sequences of driver operations.
///
/// The engine owns no connection. Every method runs on the connection it is
/// handed and opens no transaction, so whether a multi-statement operation is
/// atomic is decided by the caller.
#[derive(Debug, Clone)]
pub(crate) struct Engine {
    pub(crate) schema: Arc<Schema>,
    pub(crate) config: Arc<Config>,
    pub(crate) capability: &'static Capability,
}

impl Engine {
    pub(crate) async fn exec(
        &self,
        connection: &mut PoolConnection,
        op: impl Into<Operation>,
    ) -> Result<Response> {
        connection.exec(&self.schema, op.into()).await
    }

    pub(crate) async fn exec_count(
        &self,
        connection: &mut PoolConnection,
        stmt: impl Into<Statement>,
    ) -> Result<RowCount> {
        let op = QuerySql {
            stmt: stmt.into(),
            ret: None,
        };
        self.exec(connection, op).await?.rows.into_count()
    }

    pub(crate) async fn exec_query(
        &self,
        connection: &mut PoolConnection,
        select: Select,
        ret: Vec<Type>,
    ) -> Result<Vec<ValueRecord>> {
        let op = QuerySql {
            stmt: select.into(),
            ret: Some(ret),
        };
        self.exec(connection, op).await?.rows.into_values()
    }

    /// Executes `stmts` as one batch, returning one count per statement.
    pub(crate) async fn exec_batch(
        &self,
        connection: &mut PoolConnection,
        stmts: Vec<Statement>,
    ) -> Result<Vec<RowCount>> {
        let expected = stmts.len();
        let counts = self
            .exec(connection, Batch { stmts })
            .await?
            .rows
            .into_batch()?;

        if counts.len() != expected {
            linkrow_core::bail!(
                "driver reported {} batch results for {expected} statements",
                counts.len()
            );
        }

        Ok(counts)
    }

    pub(crate) fn table(&self, model: &str) -> Result<&Table> {
        self.schema.table(model)
    }

    /// The id of a persisted entity whose model has a single-column key.
    pub(crate) fn master_id(&self, entity: &Entity) -> Result<Value> {
        let table = self.table(entity.model())?;
        id_of(table, entity).cloned().ok_or_else(|| {
            Error::usage(format!(
                "`{}` entity has no id; save it before linking to it",
                entity.model()
            ))
        })
    }

    pub(crate) async fn find_by_id(
        &self,
        connection: &mut PoolConnection,
        model: &str,
        id: Value,
    ) -> Result<Option<Entity>> {
        let table = self.table(model)?;
        let Some(id_column) = table.id_column() else {
            return Err(Error::usage(format!(
                "`{model}` has a composite primary key; look it up with a query"
            )));
        };

        let select = select_all(table, None).filter(Expr::eq(id_column, id));
        let rows = self
            .exec_query(connection, select, column_types(table))
            .await?;

        Ok(rows
            .into_iter()
            .next()
            .map(|record| decode(model, table.columns.keys(), record)))
    }

    /// Inserts the entity's own row, writing a generated key back into it.
    ///
    /// Creation and modification timestamps are stamped when the table has
    /// the columns, replacing any value already set.
    pub(crate) async fn insert_row(
        &self,
        connection: &mut PoolConnection,
        entity: &mut Entity,
        op: PersistOp,
    ) -> Result<()> {
        let model = entity.model().to_string();
        let table = self.table(&model)?;

        stamp(table, entity, &self.config.create_date);
        stamp(table, entity, &self.config.modify_date);
        check_columns(table, entity)?;

        let generated = match table.id_column() {
            Some(id) if table.generates_key() && id_of(table, entity).is_none() => Some(id),
            _ => None,
        };

        let (columns, values): (Vec<_>, Vec<_>) = entity
            .attrs()
            .filter(|(name, _)| Some(*name) != generated)
            .map(|(name, value)| (name.to_string(), value.clone()))
            .unzip();
        let insert = stmt::Insert::new(&table.name, columns).row(values);

        let failed = |err: Error| {
            err.context(Error::persistence(
                &model,
                op,
                format!("insert into `{}` failed", table.name),
            ))
        };

        if let Some(id) = generated {
            if !self.capability.returning {
                return Err(Error::persistence(
                    &model,
                    op,
                    "the driver cannot return generated keys",
                ));
            }

            let ty = table.column_type(id).cloned().unwrap_or(Type::I64);
            let query = QuerySql {
                stmt: insert.returning(vec![id.to_string()]).into(),
                ret: Some(vec![ty]),
            };
            let rows = self
                .exec(connection, query)
                .await
                .map_err(failed)?
                .rows
                .into_values()?;

            let Some(key) = rows.into_iter().next().and_then(|row| row.into_iter().next()) else {
                return Err(Error::persistence(&model, op, "no generated key was returned"));
            };
            entity.put(id, key);
        } else {
            let count = self.exec_count(connection, insert).await.map_err(failed)?;
            if !count.is_effective() {
                return Err(Error::persistence(
                    &model,
                    op,
                    format!("insert into `{}` affected no rows", table.name),
                ));
            }
        }

        entity.clear_modified();
        tracing::trace!(model = %model, ?op, "inserted row");
        Ok(())
    }

    /// Writes the entity's modified attributes to its row.
    ///
    /// The modification timestamp is stamped when the table has the column;
    /// `require_stamp` turns a missing column into an error. Returns `false`
    /// without touching the database when nothing is modified.
    pub(crate) async fn update_row(
        &self,
        connection: &mut PoolConnection,
        entity: &mut Entity,
        op: PersistOp,
        require_stamp: bool,
    ) -> Result<bool> {
        let model = entity.model().to_string();
        let table = self.table(&model)?;

        let is_key = |name: &str| table.primary_key.iter().any(|column| column == name);
        if !require_stamp && entity.modified().all(is_key) {
            return Ok(false);
        }

        if !stamp(table, entity, &self.config.modify_date) && require_stamp {
            return Err(Error::invalid_schema(format!(
                "table `{}` of `{model}` has no `{}` column, which updates require",
                table.name, self.config.modify_date
            )));
        }
        check_columns(table, entity)?;

        let key = primary_key(table, entity, op)?;

        let mut update = stmt::Update::new(&table.name);
        for name in entity.modified() {
            if is_key(name) {
                continue;
            }
            let value = entity.get(name).cloned().unwrap_or_default();
            update = update.set(name, value);
        }

        if update.assignments.is_empty() {
            return Ok(false);
        }

        for (column, value) in key {
            update = update.filter(Expr::eq(column, value));
        }

        let count = self.exec_count(connection, update).await.map_err(|err| {
            err.context(Error::persistence(
                &model,
                op,
                format!("update of `{}` failed", table.name),
            ))
        })?;

        if !count.is_effective() {
            return Err(Error::persistence(
                &model,
                op,
                format!("no `{}` row matched the primary key", table.name),
            ));
        }

        entity.clear_modified();
        tracing::trace!(model = %model, ?op, "updated row");
        Ok(true)
    }

    /// Deletes the row identified by the entity's primary key.
    pub(crate) async fn delete_row(
        &self,
        connection: &mut PoolConnection,
        entity: &Entity,
        op: PersistOp,
    ) -> Result<()> {
        let table = self.table(entity.model())?;
        let key = primary_key(table, entity, op)?;
        self.delete_key(connection, entity.model(), table, key, op)
            .await
    }

    pub(crate) async fn delete_key(
        &self,
        connection: &mut PoolConnection,
        model: &str,
        table: &Table,
        key: Vec<(String, Value)>,
        op: PersistOp,
    ) -> Result<()> {
        let mut delete = stmt::Delete::new(&table.name);
        for (column, value) in key {
            delete = delete.filter(Expr::eq(column, value));
        }

        let count = self.exec_count(connection, delete).await.map_err(|err| {
            err.context(Error::persistence(
                model,
                op,
                format!("delete from `{}` failed", table.name),
            ))
        })?;

        if !count.is_effective() {
            return Err(Error::persistence(
                model,
                op,
                format!("no `{}` row matched the primary key", table.name),
            ));
        }

        tracing::trace!(model, ?op, "deleted row");
        Ok(())
    }
}

/// `SELECT` of every column of `table`, qualified by `alias` when given.
pub(crate) fn select_all(table: &Table, alias: Option<&str>) -> Select {
    let columns = table
        .columns
        .keys()
        .map(|name| match alias {
            Some(alias) => ColumnRef::qualified(alias, name),
            None => ColumnRef::new(name),
        })
        .collect();

    let select = Select::new(&table.name, columns);
    match alias {
        Some(alias) => select.alias(alias),
        None => select,
    }
}

pub(crate) fn column_types(table: &Table) -> Vec<Type> {
    table.columns.values().map(|column| column.ty.clone()).collect()
}

/// Builds an entity from a row. `columns` names the row's values in order.
pub(crate) fn decode<'a>(
    model: &str,
    columns: impl IntoIterator<Item = &'a String>,
    record: ValueRecord,
) -> Entity {
    let mut entity = Entity::new(model);
    for (name, value) in columns.into_iter().zip(record) {
        entity.put(name.as_str(), value);
    }
    entity
}

/// Sets `column` to the current time if the table has it.
fn stamp(table: &Table, entity: &mut Entity, column: &str) -> bool {
    let Some(ty) = table.column_type(column) else {
        return false;
    };
    entity.set(column, Value::now_for(ty));
    true
}

pub(crate) fn check_columns(table: &Table, entity: &Entity) -> Result<()> {
    match entity.attrs().find(|(name, _)| !table.has_column(name)) {
        Some((name, _)) => Err(Error::usage(format!(
            "`{}` has no column `{name}` in table `{}`",
            entity.model(),
            table.name
        ))),
        None => Ok(()),
    }
}

/// The non-null id of an entity whose table has a single-column key.
pub(crate) fn id_of<'a>(table: &Table, entity: &'a Entity) -> Option<&'a Value> {
    table
        .id_column()
        .and_then(|id| entity.get(id))
        .filter(|value| !value.is_null())
}

/// Column/value pairs of the entity's primary key. Every key column must
/// hold a non-null value.
pub(crate) fn primary_key(
    table: &Table,
    entity: &Entity,
    op: PersistOp,
) -> Result<Vec<(String, Value)>> {
    if table.primary_key.is_empty() {
        return Err(Error::invalid_schema(format!(
            "table `{}` has no primary key",
            table.name
        )));
    }

    table
        .primary_key
        .iter()
        .map(|column| match entity.get(column) {
            Some(value) if !value.is_null() => Ok((column.clone(), value.clone())),
            _ => Err(Error::persistence(
                entity.model(),
                op,
                format!("primary key column `{column}` has no value"),
            )),
        })
        .collect()
}
