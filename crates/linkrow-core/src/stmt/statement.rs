use super::{Delete, Insert, Select, Update};

/// A data statement executed by a driver.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    /// True if executing the statement yields rows rather than a count.
    pub fn returns_rows(&self) -> bool {
        match self {
            Statement::Query(_) => true,
            Statement::Insert(insert) => insert.returning.is_some(),
            Statement::Update(_) | Statement::Delete(_) => false,
        }
    }

    /// Name of the table the statement targets.
    pub fn table(&self) -> &str {
        match self {
            Statement::Query(select) => &select.source.table,
            Statement::Insert(insert) => &insert.table,
            Statement::Update(update) => &update.table,
            Statement::Delete(delete) => &delete.table,
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }
}
