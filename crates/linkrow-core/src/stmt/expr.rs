use super::Value;

/// A column, optionally qualified by a table alias.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub table: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>) -> ColumnRef {
        ColumnRef {
            table: None,
            name: name.into(),
        }
    }

    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> ColumnRef {
        ColumnRef {
            table: Some(table.into()),
            name: name.into(),
        }
    }
}

/// Filter predicate. A statement's filter is the conjunction of its predicates.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Always true (`1 = 1`)
    True,

    /// `column = value`, or `column IS NULL` when the value is null
    Eq(ColumnRef, Value),

    /// `left = right`
    ColumnEq(ColumnRef, ColumnRef),
}

impl Expr {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Expr {
        Expr::Eq(ColumnRef::new(column), value.into())
    }
}
