use crate::stmt::{Statement, Type};

#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Execute one SQL statement
    QuerySql(QuerySql),

    /// Execute many count-returning statements, reporting one count each
    Batch(Batch),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuerySql {
    /// The statement to execute
    pub stmt: Statement,

    /// Types of the returned columns, when the statement returns rows
    pub ret: Option<Vec<Type>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub stmts: Vec<Statement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Start a transaction
    Start,

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,
}

impl Operation {
    /// True if the operation may change stored rows.
    pub fn is_write(&self) -> bool {
        match self {
            Operation::QuerySql(op) => !op.stmt.is_query(),
            Operation::Batch(_) => true,
            Operation::Transaction(_) => false,
        }
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}

impl From<Batch> for Operation {
    fn from(value: Batch) -> Self {
        Self::Batch(value)
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
