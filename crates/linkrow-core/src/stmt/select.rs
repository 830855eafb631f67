use super::{ColumnRef, Expr, Statement};

/// `SELECT ... FROM ... WHERE ... [tail clauses] [LIMIT]`
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub returning: Returning,
    pub source: Source,

    /// Conjunction of predicates
    pub filter: Vec<Expr>,

    /// Grouping and ordering clauses, in the order they were appended
    pub tail: Vec<Clause>,

    pub limit: Option<Limit>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    Columns(Vec<ColumnRef>),

    /// `count(*)`
    Count,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    pub table: String,
    pub alias: Option<String>,
    pub joins: Vec<Join>,
}

/// `LEFT JOIN table alias ON ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub table: String,
    pub alias: Option<String>,
    pub on: Expr,
}

/// A raw trailing clause. Fragments are caller-supplied SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    GroupBy(String),
    Having(String),
    OrderBy(String),
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: u64,
    pub count: u64,
}

impl Select {
    pub fn new(table: impl Into<String>, columns: Vec<ColumnRef>) -> Select {
        Select {
            returning: Returning::Columns(columns),
            source: Source {
                table: table.into(),
                alias: None,
                joins: vec![],
            },
            filter: vec![],
            tail: vec![],
            limit: None,
        }
    }

    pub fn count(table: impl Into<String>) -> Select {
        Select {
            returning: Returning::Count,
            ..Select::new(table, vec![])
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Select {
        self.source.alias = Some(alias.into());
        self
    }

    pub fn left_join(mut self, table: impl Into<String>, alias: impl Into<String>, on: Expr) -> Select {
        self.source.joins.push(Join {
            table: table.into(),
            alias: Some(alias.into()),
            on,
        });
        self
    }

    pub fn filter(mut self, expr: Expr) -> Select {
        self.filter.push(expr);
        self
    }

    /// Number of columns each returned row carries.
    pub fn width(&self) -> usize {
        match &self.returning {
            Returning::Columns(columns) => columns.len(),
            Returning::Count => 1,
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Statement {
        Statement::Query(value)
    }
}
