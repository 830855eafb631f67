mod create_table;
pub use create_table::{ColumnDef, CreateTable, ForeignKey};

use linkrow_core::{schema::Schema, stmt, Result};

use std::collections::HashSet;

/// A statement the serializer knows how to render.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),

    /// A data statement (query, insert, update, delete)
    Data(stmt::Statement),
}

impl Statement {
    /// `CREATE TABLE` statements for every concrete model table followed by
    /// every junction table the schema's relations use.
    ///
    /// Entity tables come first so junction foreign keys have a target.
    pub fn create_schema(schema: &Schema) -> Result<Vec<Statement>> {
        let mut ret = vec![];
        let mut seen = HashSet::new();

        for model in schema.models() {
            let Some(table) = &model.table else { continue };

            if seen.insert(table.name.as_str()) {
                ret.push(CreateTable::from_table(table).into());
            }
        }

        for junction in schema.junctions() {
            let master = find_table(schema, &junction.master_table)?;
            let slave = find_table(schema, &junction.slave_table)?;
            ret.push(CreateTable::junction(junction, master, slave)?.into());
        }

        Ok(ret)
    }
}

fn find_table<'a>(schema: &'a Schema, name: &str) -> Result<&'a linkrow_core::schema::Table> {
    schema
        .models()
        .filter_map(|model| model.table.as_ref())
        .find(|table| table.name == name)
        .ok_or_else(|| {
            linkrow_core::Error::invalid_schema(format!("no model is mapped to table `{name}`"))
        })
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Statement::CreateTable(value)
    }
}

impl From<stmt::Statement> for Statement {
    fn from(value: stmt::Statement) -> Self {
        Statement::Data(value)
    }
}

impl From<stmt::Select> for Statement {
    fn from(value: stmt::Select) -> Self {
        Statement::Data(value.into())
    }
}

impl From<stmt::Insert> for Statement {
    fn from(value: stmt::Insert) -> Self {
        Statement::Data(value.into())
    }
}

impl From<stmt::Update> for Statement {
    fn from(value: stmt::Update) -> Self {
        Statement::Data(value.into())
    }
}

impl From<stmt::Delete> for Statement {
    fn from(value: stmt::Delete) -> Self {
        Statement::Data(value.into())
    }
}
