use linkrow_core::{
    schema::{Junction, Table},
    stmt::Type,
    Error, Result,
};

/// `CREATE TABLE IF NOT EXISTS`
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    pub name: String,
    pub columns: Vec<ColumnDef>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub not_null: bool,
    pub auto_increment: bool,
}

/// `FOREIGN KEY (column) REFERENCES table (column) ON DELETE CASCADE`
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub column: String,
    pub references_table: String,
    pub references_column: String,
}

impl CreateTable {
    pub fn from_table(table: &Table) -> CreateTable {
        CreateTable {
            name: table.name.clone(),
            columns: table
                .columns
                .values()
                .map(|column| ColumnDef {
                    name: column.name.clone(),
                    ty: column.ty.clone(),
                    not_null: !column.nullable,
                    auto_increment: column.auto_increment,
                })
                .collect(),
            primary_key: table.primary_key.clone(),
            foreign_keys: vec![],
        }
    }

    /// The association table between `master` and `slave`.
    ///
    /// Both key columns reference their side's primary key and cascade on
    /// delete, so removing either row removes its association rows.
    pub fn junction(junction: &Junction, master: &Table, slave: &Table) -> Result<CreateTable> {
        let (master_id, master_ty) = id_of(master)?;
        let (slave_id, slave_ty) = id_of(slave)?;

        Ok(CreateTable {
            name: junction.table.clone(),
            columns: vec![
                ColumnDef {
                    name: junction.master_column.clone(),
                    ty: master_ty,
                    not_null: true,
                    auto_increment: false,
                },
                ColumnDef {
                    name: junction.slave_column.clone(),
                    ty: slave_ty,
                    not_null: true,
                    auto_increment: false,
                },
            ],
            primary_key: vec![],
            foreign_keys: vec![
                ForeignKey {
                    column: junction.master_column.clone(),
                    references_table: master.name.clone(),
                    references_column: master_id,
                },
                ForeignKey {
                    column: junction.slave_column.clone(),
                    references_table: slave.name.clone(),
                    references_column: slave_id,
                },
            ],
        })
    }
}

fn id_of(table: &Table) -> Result<(String, Type)> {
    let id = table.id_column().ok_or_else(|| {
        Error::invalid_schema(format!(
            "table `{}` needs a single-column primary key to be linked",
            table.name
        ))
    })?;

    // Junction columns hold plain key values, never generated ones
    let ty = table.column_type(id).cloned().unwrap_or(Type::I64);
    Ok((id.to_string(), ty))
}
