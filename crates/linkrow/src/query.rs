use crate::{
    engine::{column_types, decode},
    Db, Entity, Error, Result,
};

use linkrow_core::{
    schema::Table,
    stmt::{Clause, ColumnRef, Expr, Limit, Select, Type},
    Schema,
};

use std::sync::Arc;

/// An in-progress `SELECT`, built by a chain of calls and consumed by a
/// terminal call.
///
/// The chain is `select → [group_by] → [having] → [order_by] → [asc|desc] →
/// fetch|first`. [`select`](QueryScope::select) starts the statement;
/// every other call fails with a usage error if nothing was selected.
/// Terminal calls clear the scope, so it can be reused for the next chain.
///
/// A scope is an ordinary value owned by whoever builds the query. Two
/// chains never share state unless they share the scope.
///
/// ```ignore
/// let mut query = db.query();
/// query.select(&Movie::entity().with("year", 1979))?.order_by("name")?.desc()?;
/// let movies = query.fetch(&mut db, 0, 10).await?;
/// ```
#[derive(Debug)]
pub struct QueryScope {
    schema: Arc<Schema>,
    state: Option<State>,
}

#[derive(Debug)]
struct State {
    model: String,
    select: Select,

    /// Names and types of the selected columns, in order
    columns: Vec<String>,
    types: Vec<Type>,
}

impl State {
    fn new(model: &str, table: &Table, columns: &[&str]) -> State {
        let (columns, types): (Vec<_>, Vec<_>) = if columns.is_empty() {
            (table.columns.keys().cloned().collect(), column_types(table))
        } else {
            columns
                .iter()
                .map(|name| {
                    let ty = table.column_type(name).cloned().unwrap_or(Type::String);
                    (name.to_string(), ty)
                })
                .unzip()
        };

        let refs = columns.iter().map(ColumnRef::new).collect();

        State {
            model: model.to_string(),
            select: Select::new(&table.name, refs).filter(Expr::True),
            columns,
            types,
        }
    }
}

impl QueryScope {
    pub fn new(schema: Arc<Schema>) -> QueryScope {
        QueryScope {
            schema,
            state: None,
        }
    }

    /// Selects every column of the entity's table, filtered by equality on
    /// each attribute the entity holds, in the order they were set.
    ///
    /// On a scope that already holds a statement for the same table the
    /// predicates are appended to it.
    pub fn select(&mut self, entity: &Entity) -> Result<&mut Self> {
        self.select_columns(entity, &[])
    }

    /// Like [`select`](QueryScope::select), returning only `columns`.
    ///
    /// The projection is fixed by the call that starts the statement; later
    /// calls only add predicates.
    pub fn select_columns(&mut self, entity: &Entity, columns: &[&str]) -> Result<&mut Self> {
        let model = entity.model();
        let table = self.schema.table(model)?;

        if let Some(name) = columns.iter().find(|name| !table.has_column(name)) {
            return Err(Error::usage(format!(
                "`{model}` has no column `{name}` to select"
            )));
        }

        if let Some((name, _)) = entity.attrs().find(|(name, _)| !table.has_column(name)) {
            return Err(Error::usage(format!(
                "`{model}` has no column `{name}` to filter on"
            )));
        }

        if let Some(state) = &self.state {
            if state.model != model {
                return Err(Error::usage(format!(
                    "query already selects `{}`; finish it with fetch() before selecting `{model}`",
                    state.model
                )));
            }
        }

        let state = self
            .state
            .get_or_insert_with(|| State::new(model, table, columns));

        for (name, value) in entity.attrs() {
            state.select.filter.push(Expr::eq(name, value.clone()));
        }

        Ok(self)
    }

    /// Appends `GROUP BY fragment`. The fragment is raw SQL.
    pub fn group_by(&mut self, fragment: &str) -> Result<&mut Self> {
        self.push("group_by", Clause::GroupBy(fragment.to_string()))
    }

    /// Appends `HAVING fragment`. The fragment is raw SQL.
    pub fn having(&mut self, fragment: &str) -> Result<&mut Self> {
        self.push("having", Clause::Having(fragment.to_string()))
    }

    /// Appends `ORDER BY fragment`. The fragment is raw SQL.
    pub fn order_by(&mut self, fragment: &str) -> Result<&mut Self> {
        self.push("order_by", Clause::OrderBy(fragment.to_string()))
    }

    pub fn asc(&mut self) -> Result<&mut Self> {
        self.push("asc", Clause::Asc)
    }

    pub fn desc(&mut self) -> Result<&mut Self> {
        self.push("desc", Clause::Desc)
    }

    /// True while a statement is being built.
    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    /// Runs the statement with `LIMIT offset, count` and clears the scope.
    ///
    /// The scope is cleared even when execution fails.
    pub async fn fetch(&mut self, db: &mut Db, offset: u64, count: u64) -> Result<Vec<Entity>> {
        let State {
            model,
            mut select,
            columns,
            types,
        } = self.take("fetch")?;

        select.limit = Some(Limit { offset, count });
        tracing::debug!(model = %model, offset, count, "fetching");

        let (shared, connection) = db.split().await?;
        let rows = shared
            .engine
            .exec_query(connection, select, types)
            .await?;

        Ok(rows
            .into_iter()
            .map(|record| decode(&model, &columns, record))
            .collect())
    }

    /// `fetch(db, 0, count)`
    pub async fn fetch_count(&mut self, db: &mut Db, count: u64) -> Result<Vec<Entity>> {
        self.fetch(db, 0, count).await
    }

    /// The first matching entity, if any.
    pub async fn first(&mut self, db: &mut Db) -> Result<Option<Entity>> {
        Ok(self.fetch(db, 0, 1).await?.into_iter().next())
    }

    fn push(&mut self, call: &str, clause: Clause) -> Result<&mut Self> {
        match &mut self.state {
            Some(state) => state.select.tail.push(clause),
            None => return Err(not_selected(call)),
        }
        Ok(self)
    }

    fn take(&mut self, call: &str) -> Result<State> {
        self.state.take().ok_or_else(|| not_selected(call))
    }
}

fn not_selected(call: &str) -> Error {
    Error::usage(format!("{call}() called before select()"))
}
