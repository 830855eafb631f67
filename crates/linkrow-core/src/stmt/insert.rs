use super::{Statement, Value};

/// `INSERT INTO table (columns) VALUES (...), (...)`
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,

    /// Columns to return from the inserted rows (e.g. a generated key)
    pub returning: Option<Vec<String>>,
}

impl Insert {
    pub fn new(table: impl Into<String>, columns: Vec<String>) -> Insert {
        Insert {
            table: table.into(),
            columns,
            rows: vec![],
            returning: None,
        }
    }

    pub fn row(mut self, values: Vec<Value>) -> Insert {
        debug_assert_eq!(values.len(), self.columns.len());
        self.rows.push(values);
        self
    }

    pub fn returning(mut self, columns: Vec<String>) -> Insert {
        self.returning = Some(columns);
        self
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Statement {
        Statement::Insert(value)
    }
}
