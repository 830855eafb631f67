mod value;
pub(crate) use value::Value;

use linkrow_core::{
    async_trait,
    driver::{
        operation::{Operation, QuerySql},
        Capability, Driver, Response, RowCount,
    },
    schema::Schema,
    stmt::{self, Type},
    Error, Result,
};
use linkrow_sql as sql;
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver from a connection URL, e.g.
    /// `sqlite::memory:` or `sqlite:/var/lib/app.db`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn linkrow_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }

    // Every in-memory connection is its own database
    fn max_connections(&self) -> Option<usize> {
        matches!(self, Self::InMemory).then_some(1)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection =
            RusqliteConnection::open_in_memory().map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
        Self::init(connection)
    }

    fn init(connection: RusqliteConnection) -> Result<Self> {
        // Junction rows are removed by `ON DELETE CASCADE`, which SQLite only
        // enforces when asked to.
        connection
            .execute_batch("PRAGMA foreign_keys = ON")
            .map_err(Error::driver_operation_failed)?;

        Ok(Self { connection })
    }
}

#[async_trait]
impl linkrow_core::driver::Connection for Connection {
    async fn exec(&mut self, _schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        match op {
            Operation::QuerySql(op) => self.exec_sql(op),
            Operation::Batch(op) => Ok(Response::batch(self.exec_batch(&op.stmts))),
            Operation::Transaction(op) => {
                let sql = sql::Serializer::sqlite().serialize_transaction(&op);
                tracing::debug!(sql = %sql, "executing transaction op");

                self.connection
                    .execute_batch(&sql)
                    .map_err(Error::driver_operation_failed)?;
                Ok(Response::count(0))
            }
        }
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        for stmt in sql::Statement::create_schema(schema)? {
            let mut params: Vec<stmt::Value> = vec![];
            let sql = sql::Serializer::sqlite().serialize(&stmt, &mut params);
            debug_assert!(params.is_empty());

            tracing::debug!(sql = %sql, "creating table");
            self.connection
                .execute(&sql, [])
                .map_err(Error::driver_operation_failed)?;
        }

        Ok(())
    }
}

impl Connection {
    fn exec_sql(&mut self, op: QuerySql) -> Result<Response> {
        let returns_rows = op.stmt.returns_rows();

        let mut params: Vec<stmt::Value> = vec![];
        let sql_str = sql::Serializer::sqlite().serialize(&op.stmt.into(), &mut params);
        tracing::debug!(sql = %sql_str, params = ?params, "executing SQL");

        let mut stmt = self
            .connection
            .prepare_cached(&sql_str)
            .map_err(Error::driver_operation_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        if !returns_rows {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver_operation_failed)?;

            return Ok(Response::count(count as u64));
        }

        let ret_tys: Vec<Type> = op
            .ret
            .ok_or_else(|| linkrow_core::err!("row-returning statement without column types"))?;

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut items = Vec::with_capacity(ret_tys.len());

                    for (index, ty) in ret_tys.iter().enumerate() {
                        items.push(Value::from_sql(row, index, ty)?.into_inner());
                    }

                    ret.push(stmt::ValueRecord::from_vec(items));
                }
                Ok(None) => break,
                Err(err) => return Err(Error::driver_operation_failed(err)),
            }
        }

        Ok(Response::values(ret))
    }

    /// Executes count-returning statements in order.
    ///
    /// Execution stops at the first failing statement; it and every statement
    /// after it report [`RowCount::Failed`].
    fn exec_batch(&mut self, stmts: &[stmt::Statement]) -> Vec<RowCount> {
        let mut counts = Vec::with_capacity(stmts.len());

        for stmt in stmts {
            match self.exec_one(stmt) {
                Ok(count) => counts.push(RowCount::Affected(count as u64)),
                Err(err) => {
                    tracing::debug!(error = %err, "batch statement failed");
                    counts.resize(stmts.len(), RowCount::Failed);
                    break;
                }
            }
        }

        counts
    }

    fn exec_one(&mut self, stmt: &stmt::Statement) -> rusqlite::Result<usize> {
        let mut params: Vec<stmt::Value> = vec![];
        let sql_str = sql::Serializer::sqlite().serialize(&stmt.clone().into(), &mut params);
        tracing::debug!(sql = %sql_str, params = ?params, "executing batch SQL");

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();
        self.connection
            .prepare_cached(&sql_str)?
            .execute(rusqlite::params_from_iter(params.iter()))
    }
}
