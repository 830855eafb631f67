use super::{ty::ColumnType, Comma, Flavor, Formatter, Ident, Params, ToSql};

use crate::stmt::{ColumnDef, CreateTable, ForeignKey};

impl ToSql for &CreateTable {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        // SQLite only auto-increments an `INTEGER PRIMARY KEY` declared inline,
        // so the key is not repeated as a table constraint.
        let inline_pk = f.serializer.is_sqlite()
            && self.primary_key.len() == 1
            && self.columns.iter().any(|column| column.auto_increment);

        fmt!(f, "CREATE TABLE IF NOT EXISTS " Ident(&self.name) " (" Comma(&self.columns));

        if !self.primary_key.is_empty() && !inline_pk {
            fmt!(f, ", PRIMARY KEY (" Comma(self.primary_key.iter().map(Ident)) ")");
        }

        for foreign_key in &self.foreign_keys {
            fmt!(f, ", " foreign_key);
        }

        fmt!(f, ")");
    }
}

impl ToSql for &ColumnDef {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(f, Ident(&self.name) " ");

        if !self.auto_increment {
            fmt!(f, ColumnType(&self.ty));
            if self.not_null {
                fmt!(f, " NOT NULL");
            }
            return;
        }

        match f.serializer.flavor {
            Flavor::Sqlite => fmt!(f, "INTEGER PRIMARY KEY AUTOINCREMENT"),
            Flavor::Postgresql => fmt!(f, "BIGSERIAL NOT NULL"),
            Flavor::Mysql => fmt!(f, ColumnType(&self.ty) " NOT NULL AUTO_INCREMENT"),
        }
    }
}

impl ToSql for &ForeignKey {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        fmt!(
            f,
            "FOREIGN KEY (" Ident(&self.column) ") REFERENCES "
            Ident(&self.references_table) " (" Ident(&self.references_column) ") ON DELETE CASCADE"
        );
    }
}
