use super::{Flavor, Formatter, Params, ToSql};

use linkrow_core::stmt::Type;

/// Storage type of a column in the target dialect
pub(super) struct ColumnType<'a>(pub(super) &'a Type);

impl ToSql for ColumnType<'_> {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        use Flavor::*;

        // SQLite keeps temporal and arbitrary precision values as text so they
        // read back exactly as written.
        let name = match (self.0, f.serializer.flavor) {
            (Type::String, Mysql) => "VARCHAR(255)",
            (Type::String, _) => "TEXT",
            (Type::I32, _) => "INTEGER",
            (Type::I64, Sqlite) => "INTEGER",
            (Type::I64, _) => "BIGINT",
            (Type::F64, Postgresql) => "DOUBLE PRECISION",
            (Type::F64, Mysql) => "DOUBLE",
            (Type::F64, Sqlite) => "REAL",
            (Type::F32, Mysql) => "FLOAT",
            (Type::F32, _) => "REAL",
            (Type::Decimal | Type::BigInt, Sqlite) => "TEXT",
            (Type::Decimal, Postgresql) => "NUMERIC",
            (Type::Decimal, Mysql) => "DECIMAL(65, 30)",
            (Type::BigInt, Postgresql) => "NUMERIC",
            (Type::BigInt, Mysql) => "DECIMAL(65, 0)",
            (Type::Bool, _) => "BOOLEAN",
            (Type::Date | Type::DateTime | Type::Time | Type::Timestamp, Sqlite) => "TEXT",
            (Type::Date, _) => "DATE",
            (Type::Time, _) => "TIME",
            (Type::DateTime, Mysql) => "DATETIME",
            (Type::Timestamp, Mysql) => "DATETIME(6)",
            (Type::DateTime | Type::Timestamp, Postgresql) => "TIMESTAMP",
            (Type::Bytes, Postgresql) => "BYTEA",
            (Type::Bytes, _) => "BLOB",
            (Type::Other(name), _) => &**name,
        };

        fmt!(f, name);
    }
}
