use crate::stmt::Type;

use indexmap::IndexMap;

/// Static metadata for an entity's table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the table in the database
    pub name: String,

    /// Primary key column names, in key order
    pub primary_key: Vec<String>,

    /// Columns keyed by name, in declaration order
    pub columns: IndexMap<String, Column>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub ty: Type,
    pub nullable: bool,

    /// The database generates the value on insert
    pub auto_increment: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            primary_key: vec![],
            columns: IndexMap::new(),
        }
    }

    /// Adds a nullable column.
    pub fn column(mut self, name: impl Into<String>, ty: Type) -> Table {
        let name = name.into();
        self.columns.insert(
            name.clone(),
            Column {
                name,
                ty,
                nullable: true,
                auto_increment: false,
            },
        );
        self
    }

    /// Adds a column declared with a SQL type name, e.g. `varchar(64)`.
    pub fn sql_column(self, name: impl Into<String>, sql_type: &str) -> Table {
        self.column(name, Type::from_sql_name(sql_type))
    }

    /// Adds an auto-incrementing integer primary key column.
    pub fn id(mut self, name: impl Into<String>) -> Table {
        let name = name.into();
        self.columns.insert(
            name.clone(),
            Column {
                name: name.clone(),
                ty: Type::I64,
                nullable: false,
                auto_increment: true,
            },
        );
        self.primary_key = vec![name];
        self
    }

    /// Declares the primary key. Key columns become non-nullable.
    pub fn primary_key<I, S>(mut self, columns: I) -> Table
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key = columns.into_iter().map(Into::into).collect();
        for name in &self.primary_key {
            if let Some(column) = self.columns.get_mut(name) {
                column.nullable = false;
            }
        }
        self
    }

    pub fn column_type(&self, name: &str) -> Option<&Type> {
        self.columns.get(name).map(|column| &column.ty)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// The single primary key column. Junction rows reference this column.
    pub fn id_column(&self) -> Option<&str> {
        match self.primary_key.as_slice() {
            [id] => Some(id),
            _ => None,
        }
    }

    /// True when inserting without a key lets the database generate one.
    pub fn generates_key(&self) -> bool {
        self.id_column()
            .and_then(|id| self.columns.get(id))
            .is_some_and(|column| column.auto_increment)
    }
}
